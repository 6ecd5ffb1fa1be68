use std::collections::HashMap;

use anyhow::anyhow;
use axum::http::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, instrument};
use uuid::Uuid;
use validator::ValidationErrors;

use prompt_core::AppError;
use prompt_models::{CoursePhaseParticipationWithStudent, MetaData, Resolution, check_resolutions};
use prompt_observability::track_resolution;

use super::paths::build_resolution_url;
use crate::core_service::{CoreClient, CoreRequestError};

/// Field of a batch element that identifies the participation it belongs to.
pub const PARTICIPANT_ID_FIELD: &str = "coursePhaseParticipationID";

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("invalid resolution descriptor: {0}")]
    InvalidDescriptor(#[from] ValidationErrors),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("response from {url} could not be decoded: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("DTO key {dto_name} not found in response from {url}")]
    DtoKeyNotFound { dto_name: String, url: String },

    #[error("element {index} of {url} has no valid coursePhaseParticipationID")]
    InvalidParticipantId { index: usize, url: String },

    #[error(transparent)]
    Core(#[from] CoreRequestError),
}

impl From<ResolutionError> for AppError {
    fn from(err: ResolutionError) -> Self {
        AppError::internal(anyhow!("{}", err))
    }
}

/// Fetches data other phase modules own and merges it into `prevData`.
///
/// Requests run one after another on the core client's connection pool and
/// inherit its timeout. Nothing is retried. Dropping a returned future
/// cancels the request in flight.
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    core: CoreClient,
}

impl ResolutionEngine {
    pub fn new(core: CoreClient) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &CoreClient {
        &self.core
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        authorization: &str,
    ) -> Result<T, ResolutionError> {
        debug!(url = %url, "Resolving");

        let mut request = self.core.http().get(url);
        if !authorization.is_empty() {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ResolutionError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ResolutionError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ResolutionError::Decode {
                url: url.to_string(),
                source,
            })
    }

    async fn fetch_value(
        &self,
        url: String,
        authorization: &str,
        dto_name: &str,
    ) -> Result<Value, ResolutionError> {
        let mut body: Map<String, Value> = self.fetch(&url, authorization).await?;
        body.remove(dto_name)
            .ok_or_else(|| ResolutionError::DtoKeyNotFound {
                dto_name: dto_name.to_string(),
                url,
            })
    }

    /// Value of `dtoName` for one participant.
    #[instrument(skip(self, authorization, resolution), fields(dto_name = %resolution.dto_name))]
    pub async fn resolve_one(
        &self,
        authorization: &str,
        resolution: &Resolution,
        participant: Uuid,
    ) -> Result<Value, ResolutionError> {
        resolution.check()?;
        let url = build_resolution_url(
            &resolution.base_url,
            resolution.course_phase_id,
            &resolution.endpoint_path,
            Some(participant),
        );
        let result = self.fetch_value(url, authorization, &resolution.dto_name).await;
        record(&result);
        result
    }

    /// Value of `dtoName` for every participant the source phase knows,
    /// keyed by participation id.
    #[instrument(skip(self, authorization, resolution), fields(dto_name = %resolution.dto_name))]
    pub async fn resolve_all(
        &self,
        authorization: &str,
        resolution: &Resolution,
    ) -> Result<HashMap<Uuid, Value>, ResolutionError> {
        resolution.check()?;
        let url = build_resolution_url(
            &resolution.base_url,
            resolution.course_phase_id,
            &resolution.endpoint_path,
            None,
        );

        let result = async {
            let items: Vec<Map<String, Value>> = self.fetch(&url, authorization).await?;
            rekey_by_participant(items, &resolution.dto_name, &url)
        }
        .await;
        record(&result);
        result
    }

    /// Phase-level value of `dtoName`, not tied to a participant.
    #[instrument(skip(self, authorization, resolution), fields(dto_name = %resolution.dto_name))]
    pub async fn resolve_phase(
        &self,
        authorization: &str,
        resolution: &Resolution,
    ) -> Result<Value, ResolutionError> {
        resolution.check()?;
        let url = build_resolution_url(
            &resolution.base_url,
            resolution.course_phase_id,
            &resolution.endpoint_path,
            None,
        );
        let result = self.fetch_value(url, authorization, &resolution.dto_name).await;
        record(&result);
        result
    }

    /// Loads all participations of a phase and merges every descriptor the
    /// core returns alongside them. Any failure fails the whole call.
    #[instrument(skip(self, authorization))]
    pub async fn fetch_and_merge_participations_with_resolutions(
        &self,
        authorization: &str,
        course_phase_id: Uuid,
    ) -> Result<Vec<CoursePhaseParticipationWithStudent>, ResolutionError> {
        let envelope = self
            .core
            .get_participations(authorization, course_phase_id)
            .await?;
        check_resolutions(&envelope.resolutions)?;

        let mut participations = envelope.participations;
        for resolution in &envelope.resolutions {
            let resolved = self.resolve_all(authorization, resolution).await?;
            merge_resolved(&mut participations, &resolution.dto_name, &resolved);
        }

        debug!(
            participations = participations.len(),
            resolutions = envelope.resolutions.len(),
            "Merged participations"
        );
        Ok(participations)
    }

    /// Single-participation variant of
    /// [`fetch_and_merge_participations_with_resolutions`](Self::fetch_and_merge_participations_with_resolutions).
    #[instrument(skip(self, authorization))]
    pub async fn fetch_and_merge_participation(
        &self,
        authorization: &str,
        course_phase_id: Uuid,
        course_participation_id: Uuid,
    ) -> Result<CoursePhaseParticipationWithStudent, ResolutionError> {
        let (mut participation, resolutions) = self
            .core
            .get_participation(authorization, course_phase_id, course_participation_id)
            .await?
            .into_parts();
        check_resolutions(&resolutions)?;

        for resolution in &resolutions {
            let value = self
                .resolve_one(authorization, resolution, participation.course_participation_id)
                .await?;
            participation.merge_prev_data(&resolution.dto_name, value);
        }

        Ok(participation)
    }

    /// Phase-level `prevData` with every descriptor resolved into it.
    #[instrument(skip(self, authorization))]
    pub async fn fetch_and_merge_course_phase_data(
        &self,
        authorization: &str,
        course_phase_id: Uuid,
    ) -> Result<MetaData, ResolutionError> {
        let data = self
            .core
            .get_course_phase_data(authorization, course_phase_id)
            .await?;
        check_resolutions(&data.resolutions)?;

        let mut prev_data = data.prev_data.unwrap_or_default();
        for resolution in &data.resolutions {
            let value = self.resolve_phase(authorization, resolution).await?;
            prev_data.insert(resolution.dto_name.clone(), value);
        }

        Ok(prev_data)
    }
}

fn record<T>(result: &Result<T, ResolutionError>) {
    match result {
        Ok(_) => track_resolution("success"),
        Err(e) => {
            error!(error = %e, "Resolution failed");
            track_resolution("error");
        }
    }
}

/// Turns a batch response into a map from participation id to the value of
/// `dto_name`. A missing or unparsable id, or a missing DTO key, fails the
/// whole batch.
pub fn rekey_by_participant(
    items: Vec<Map<String, Value>>,
    dto_name: &str,
    url: &str,
) -> Result<HashMap<Uuid, Value>, ResolutionError> {
    let mut out = HashMap::with_capacity(items.len());

    for (index, mut item) in items.into_iter().enumerate() {
        let id = item
            .get(PARTICIPANT_ID_FIELD)
            .and_then(Value::as_str)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| ResolutionError::InvalidParticipantId {
                index,
                url: url.to_string(),
            })?;

        let value = item
            .remove(dto_name)
            .ok_or_else(|| ResolutionError::DtoKeyNotFound {
                dto_name: dto_name.to_string(),
                url: url.to_string(),
            })?;

        out.insert(id, value);
    }

    Ok(out)
}

/// Writes each resolved value into the `prevData` of the participation with
/// the matching id. Participations without a resolved value are untouched.
pub fn merge_resolved(
    participations: &mut [CoursePhaseParticipationWithStudent],
    dto_name: &str,
    resolved: &HashMap<Uuid, Value>,
) {
    for participation in participations.iter_mut() {
        if let Some(value) = resolved.get(&participation.course_participation_id) {
            participation.merge_prev_data(dto_name, value.clone());
        }
    }
}
