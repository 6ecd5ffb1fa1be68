use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use prompt_cache::{LookupCache, keys};
use prompt_models::{CourseRoles, StudentOfCoursePhase};

use super::client::{CoreClient, CoreRequestError};

/// The caller on whose behalf a lookup runs.
#[derive(Debug, Clone, Copy)]
pub struct Caller<'a> {
    /// Forwarded to the core verbatim.
    pub authorization: &'a str,
    pub user_id: &'a str,
}

/// Fetches the course-specific role names of a phase.
#[async_trait]
pub trait PhaseRoleFetcher: Send + Sync {
    async fn fetch_course_roles(
        &self,
        caller: &Caller<'_>,
        course_phase_id: Uuid,
    ) -> Result<CourseRoles, CoreRequestError>;
}

/// Fetches whether the caller is a student of a phase.
///
/// Callers outside the course get [`CoreRequestError::NotEnrolled`].
#[async_trait]
pub trait ParticipationFetcher: Send + Sync {
    async fn fetch_student_of_phase(
        &self,
        caller: &Caller<'_>,
        course_phase_id: Uuid,
    ) -> Result<StudentOfCoursePhase, CoreRequestError>;
}

#[async_trait]
impl PhaseRoleFetcher for CoreClient {
    async fn fetch_course_roles(
        &self,
        caller: &Caller<'_>,
        course_phase_id: Uuid,
    ) -> Result<CourseRoles, CoreRequestError> {
        self.get_course_roles(caller.authorization, course_phase_id)
            .await
    }
}

#[async_trait]
impl ParticipationFetcher for CoreClient {
    async fn fetch_student_of_phase(
        &self,
        caller: &Caller<'_>,
        course_phase_id: Uuid,
    ) -> Result<StudentOfCoursePhase, CoreRequestError> {
        self.get_is_student(caller.authorization, course_phase_id)
            .await
    }
}

/// Puts a [`LookupCache`] in front of a fetcher.
///
/// Only successful lookups are stored. Failures and "not enrolled" answers
/// always reach the core again.
pub struct CachedLookups<F> {
    inner: F,
    cache: Arc<dyn LookupCache>,
}

impl<F> CachedLookups<F> {
    pub fn new(inner: F, cache: Arc<dyn LookupCache>) -> Self {
        Self { inner, cache }
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.cache.get_json(key).await?;
        match serde_json::from_value(value) {
            Ok(hit) => {
                debug!(cache.key = %key, "Lookup served from cache");
                Some(hit)
            }
            Err(e) => {
                warn!(cache.key = %key, error = %e, "Ignoring malformed cache entry");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        let result = match serde_json::to_value(value) {
            Ok(json) => self.cache.set_json(key, &json).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!(cache.key = %key, error = %e, "Failed to cache lookup");
        }
    }
}

#[async_trait]
impl<F: PhaseRoleFetcher> PhaseRoleFetcher for CachedLookups<F> {
    async fn fetch_course_roles(
        &self,
        caller: &Caller<'_>,
        course_phase_id: Uuid,
    ) -> Result<CourseRoles, CoreRequestError> {
        let key = keys::phase_roles(course_phase_id);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let roles = self.inner.fetch_course_roles(caller, course_phase_id).await?;
        self.store(&key, &roles).await;
        Ok(roles)
    }
}

#[async_trait]
impl<F: ParticipationFetcher> ParticipationFetcher for CachedLookups<F> {
    async fn fetch_student_of_phase(
        &self,
        caller: &Caller<'_>,
        course_phase_id: Uuid,
    ) -> Result<StudentOfCoursePhase, CoreRequestError> {
        let key = keys::student_of_phase(course_phase_id, caller.user_id);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let answer = self
            .inner
            .fetch_student_of_phase(caller, course_phase_id)
            .await?;
        self.store(&key, &answer).await;
        Ok(answer)
    }
}
