use std::collections::HashMap;

use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use prompt_core::AppError;
use prompt_models::{CoursePhaseParticipationWithStudent, MetaData};

use crate::middleware::auth::{BearerHeader, Roles};
use crate::middleware::role::CoursePhaseId;
use crate::state::AppState;

pub const COURSE_PARTICIPATION_ID_PARAM: &str = "courseParticipationID";

pub async fn get_participations(
    State(state): State<AppState>,
    CoursePhaseId(course_phase_id): CoursePhaseId,
    BearerHeader(authorization): BearerHeader,
) -> Result<Json<Vec<CoursePhaseParticipationWithStudent>>, AppError> {
    let participations = state
        .resolution
        .fetch_and_merge_participations_with_resolutions(&authorization, course_phase_id)
        .await?;
    Ok(Json(participations))
}

pub async fn get_participation(
    State(state): State<AppState>,
    CoursePhaseId(course_phase_id): CoursePhaseId,
    BearerHeader(authorization): BearerHeader,
    Path(params): Path<HashMap<String, String>>,
) -> Result<Json<CoursePhaseParticipationWithStudent>, AppError> {
    let raw = params
        .get(COURSE_PARTICIPATION_ID_PARAM)
        .ok_or_else(|| AppError::bad_request(anyhow!("courseParticipationID missing")))?;
    let course_participation_id = Uuid::parse_str(raw)
        .map_err(|e| AppError::bad_request(anyhow!("invalid courseParticipationID: {}", e)))?;

    let participation = state
        .resolution
        .fetch_and_merge_participation(&authorization, course_phase_id, course_participation_id)
        .await?;
    Ok(Json(participation))
}

/// The caller's own participation, known from the enrollment lookup the
/// student stage performed.
pub async fn get_own_participation(
    State(state): State<AppState>,
    CoursePhaseId(course_phase_id): CoursePhaseId,
    BearerHeader(authorization): BearerHeader,
    Roles(ctx): Roles,
) -> Result<Json<CoursePhaseParticipationWithStudent>, AppError> {
    let course_participation_id = ctx
        .course_participation_id()
        .ok_or_else(|| AppError::not_found(anyhow!("caller is not a student of this phase")))?;

    let participation = state
        .resolution
        .fetch_and_merge_participation(&authorization, course_phase_id, course_participation_id)
        .await?;
    Ok(Json(participation))
}

pub async fn get_course_phase_data(
    State(state): State<AppState>,
    CoursePhaseId(course_phase_id): CoursePhaseId,
    BearerHeader(authorization): BearerHeader,
) -> Result<Json<MetaData>, AppError> {
    let data = state
        .resolution
        .fetch_and_merge_course_phase_data(&authorization, course_phase_id)
        .await?;
    Ok(Json(data))
}
