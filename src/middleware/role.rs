//! Route-level role guards.
//!
//! ```rust,ignore
//! use axum::{Router, middleware, routing::get};
//! use prompt_auth::{COURSE_LECTURER, COURSE_STUDENT, PROMPT_ADMIN};
//! use crate::middleware::role::{RoleGuard, authorize};
//!
//! let routes = Router::new()
//!     .route("/course_phase/{coursePhaseID}/scores", get(handler))
//!     .route_layer(middleware::from_fn_with_state(
//!         RoleGuard::new(state.clone(), [PROMPT_ADMIN, COURSE_LECTURER, COURSE_STUDENT]),
//!         authorize,
//!     ));
//! ```
//!
//! Use `route_layer` so the matched route's `coursePhaseID` path parameter
//! is visible to the guard.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    RequestPartsExt,
    extract::{FromRequestParts, RawPathParams, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use prompt_auth::{AllowedRoles, RoleContext, TokenUser};
use prompt_core::AppError;

use super::auth::{BearerHeader, authenticate_parts};
use super::authorization::{DENIED_MESSAGE, parse_course_phase_id};
use crate::state::AppState;

pub const COURSE_PHASE_ID_PARAM: &str = "coursePhaseID";

/// Middleware state: the application plus the roles a route accepts.
#[derive(Clone)]
pub struct RoleGuard {
    state: AppState,
    allowed: Arc<AllowedRoles>,
}

impl RoleGuard {
    pub fn new<I, S>(state: AppState, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state,
            allowed: Arc::new(AllowedRoles::new(roles)),
        }
    }

    pub fn allowed(&self) -> &AllowedRoles {
        &self.allowed
    }
}

/// Authenticates the caller when no outer layer has, then runs the
/// authorization decision. On success the updated [`RoleContext`] is left in
/// the request for handlers; every denial is a 401.
pub async fn authorize(
    State(guard): State<RoleGuard>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    authenticate_parts(&mut parts, &guard.state).await?;

    let raw_course_phase_id = raw_course_phase_id(&mut parts).await;

    let authorization = parts
        .extensions
        .get::<BearerHeader>()
        .map(|h| h.0.clone())
        .unwrap_or_default();

    let mut ctx = match parts.extensions.get::<RoleContext>() {
        Some(ctx) => ctx.clone(),
        None => {
            let user = parts
                .extensions
                .get::<TokenUser>()
                .cloned()
                .ok_or_else(|| AppError::internal(anyhow!("user not found in request context")))?;
            RoleContext::new(user)
        }
    };

    let decision = guard
        .state
        .decider
        .decide(
            &guard.allowed,
            &mut ctx,
            &authorization,
            raw_course_phase_id.as_deref(),
        )
        .await?;

    parts.extensions.insert(ctx);
    if !decision.is_allowed() {
        return Err(AppError::unauthorized(anyhow!(DENIED_MESSAGE)));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

async fn raw_course_phase_id(parts: &mut Parts) -> Option<String> {
    parts
        .extract::<RawPathParams>()
        .await
        .ok()
        .and_then(|params| {
            params
                .iter()
                .find(|(key, _)| *key == COURSE_PHASE_ID_PARAM)
                .map(|(_, value)| value.to_string())
        })
}

/// The route's `coursePhaseID`, taken from the role context when the guard
/// already parsed it and from the path otherwise. Missing, malformed or nil
/// ids are a 400.
#[derive(Debug, Clone, Copy)]
pub struct CoursePhaseId(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for CoursePhaseId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts
            .extensions
            .get::<RoleContext>()
            .and_then(RoleContext::course_phase_id)
        {
            return Ok(Self(id));
        }

        let raw = raw_course_phase_id(parts).await;
        parse_course_phase_id(raw.as_deref()).map(Self)
    }
}
