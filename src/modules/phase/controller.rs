use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{error, info};

use prompt_core::AppError;
use prompt_models::{CopyRequest, PhaseConfigRequest};

use super::service::{PhaseConfigHandler, PhaseCopyHandler};
use crate::middleware::role::CoursePhaseId;

pub async fn get_phase_config(
    State(handler): State<Arc<dyn PhaseConfigHandler>>,
    CoursePhaseId(course_phase_id): CoursePhaseId,
) -> Result<Json<HashMap<String, bool>>, AppError> {
    let config = handler
        .handle_phase_config(PhaseConfigRequest { course_phase_id })
        .await
        .inspect_err(|e| error!(%course_phase_id, error = %e, "Phase config handler failed"))?;

    Ok(Json(config))
}

pub async fn copy_phase(
    State(handler): State<Arc<dyn PhaseCopyHandler>>,
    body: Result<Json<CopyRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = body.map_err(|e| AppError::bad_request(anyhow!(e.body_text())))?;

    info!(
        source = %request.source_course_phase_id,
        target = %request.target_course_phase_id,
        "Copying phase data"
    );
    handler
        .handle_phase_copy(request)
        .await
        .inspect_err(|e| error!(error = %e, "Phase copy handler failed"))?;

    Ok(StatusCode::NO_CONTENT)
}
