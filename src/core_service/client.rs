use anyhow::anyhow;
use axum::http::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use prompt_config::CoreConfig;
use prompt_core::AppError;
use prompt_models::{
    CourseRoles, CoursePhaseDataWithResolutions, CoursePhaseParticipationsWithResolutions,
    SingleParticipationResponse, StudentOfCoursePhase,
};
use prompt_observability::track_core_request;

#[derive(Debug, Error)]
pub enum CoreRequestError {
    #[error("request to core service failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("core service answered {endpoint} with status {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("core service response for {endpoint} could not be decoded: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The core answered the enrollment check with 401.
    #[error("caller is not a student of the course")]
    NotEnrolled,
}

impl From<CoreRequestError> for AppError {
    fn from(err: CoreRequestError) -> Self {
        AppError::internal(anyhow!("{}", err))
    }
}

/// HTTP client for the core service.
///
/// Every call forwards the caller's `Authorization` header unchanged, so the
/// core answers from the caller's point of view. Cloning is cheap and shares
/// the connection pool.
#[derive(Debug, Clone)]
pub struct CoreClient {
    base_url: String,
    http: reqwest::Client,
}

impl CoreClient {
    pub fn new(config: &CoreConfig) -> Result<Self, CoreRequestError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(CoreRequestError::Transport)?;

        Ok(Self::with_client(&config.base_url, http))
    }

    pub fn with_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying client, shared with the resolution engine.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    async fn send(
        &self,
        endpoint: &'static str,
        path: &str,
        authorization: &str,
    ) -> Result<reqwest::Response, CoreRequestError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, endpoint, "Sending core request");

        let mut request = self.http.get(&url).header(CONTENT_TYPE, "application/json");
        if !authorization.is_empty() {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request.send().await.map_err(|e| {
            error!(url = %url, error = %e, "Core request failed");
            CoreRequestError::Transport(e)
        })?;

        track_core_request(endpoint, response.status().as_u16());
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        authorization: &str,
    ) -> Result<T, CoreRequestError> {
        let response = self.send(endpoint, path, authorization).await?;
        Self::decode(endpoint, response).await
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, CoreRequestError> {
        let status = response.status();
        if status != StatusCode::OK {
            error!(endpoint, status = %status, "Received non-OK response from core");
            return Err(CoreRequestError::Status { endpoint, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| CoreRequestError::Decode { endpoint, source })
    }

    /// `GET /api/auth/course_phase/{id}/roles`
    #[instrument(skip(self, authorization))]
    pub async fn get_course_roles(
        &self,
        authorization: &str,
        course_phase_id: Uuid,
    ) -> Result<CourseRoles, CoreRequestError> {
        let path = format!("/api/auth/course_phase/{}/roles", course_phase_id);
        self.get_json("roles", &path, authorization).await
    }

    /// `GET /api/auth/course_phase/{id}/is_student`
    ///
    /// A 401 from the core means the caller is not enrolled in the course and
    /// comes back as [`CoreRequestError::NotEnrolled`].
    #[instrument(skip(self, authorization))]
    pub async fn get_is_student(
        &self,
        authorization: &str,
        course_phase_id: Uuid,
    ) -> Result<StudentOfCoursePhase, CoreRequestError> {
        let path = format!("/api/auth/course_phase/{}/is_student", course_phase_id);
        let response = self.send("is_student", &path, authorization).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            info!("Not student of course");
            return Err(CoreRequestError::NotEnrolled);
        }

        Self::decode("is_student", response).await
    }

    /// `GET /api/course_phases/{id}/participations`
    #[instrument(skip(self, authorization))]
    pub async fn get_participations(
        &self,
        authorization: &str,
        course_phase_id: Uuid,
    ) -> Result<CoursePhaseParticipationsWithResolutions, CoreRequestError> {
        let path = format!("/api/course_phases/{}/participations", course_phase_id);
        self.get_json("participations", &path, authorization).await
    }

    /// `GET /api/course_phases/{id}/participations/{courseParticipationID}`
    #[instrument(skip(self, authorization))]
    pub async fn get_participation(
        &self,
        authorization: &str,
        course_phase_id: Uuid,
        course_participation_id: Uuid,
    ) -> Result<SingleParticipationResponse, CoreRequestError> {
        let path = format!(
            "/api/course_phases/{}/participations/{}",
            course_phase_id, course_participation_id
        );
        self.get_json("participation", &path, authorization).await
    }

    /// `GET /api/course_phases/{id}/course_phase_data`
    #[instrument(skip(self, authorization))]
    pub async fn get_course_phase_data(
        &self,
        authorization: &str,
        course_phase_id: Uuid,
    ) -> Result<CoursePhaseDataWithResolutions, CoreRequestError> {
        let path = format!("/api/course_phases/{}/course_phase_data", course_phase_id);
        self.get_json("course_phase_data", &path, authorization).await
    }
}
