use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use prompt_auth::{RoleContext, TokenUser};
use prompt_core::AppError;

use crate::state::AppState;

/// The raw `Authorization` header of a request, kept so lookups can forward
/// it to the core.
#[derive(Debug, Clone)]
pub struct BearerHeader(pub String);

/// Splits `Authorization: Bearer <token>` into the full header value and the
/// token.
pub fn bearer_token(headers: &HeaderMap) -> Result<(&str, &str), AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(anyhow!("Missing authorization header")))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid authorization header format")))?;

    Ok((value, token))
}

/// Verifies the bearer token and stores the caller in the request.
///
/// Runs at most once per request: when an outer layer already did it, the
/// request passes through untouched.
pub async fn authenticate_parts(parts: &mut Parts, state: &AppState) -> Result<(), AppError> {
    if parts.extensions.get::<TokenUser>().is_some() {
        return Ok(());
    }

    let (header, token) = bearer_token(&parts.headers)?;
    let header = header.to_string();
    let user = state.verifier.verify(token).await.map_err(|e| {
        warn!(error = %e, "Token verification failed");
        AppError::from(e)
    })?;

    parts.extensions.insert(RoleContext::new(user.clone()));
    parts.extensions.insert(user);
    parts.extensions.insert(BearerHeader(header));
    Ok(())
}

/// Middleware form of [`authenticate_parts`] for routes that need a caller
/// but no role check.
pub async fn authenticate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    authenticate_parts(&mut parts, &state).await?;
    Ok(next.run(Request::from_parts(parts, body)).await)
}

impl<S: Send + Sync> FromRequestParts<S> for BearerHeader {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BearerHeader>()
            .cloned()
            .ok_or_else(|| AppError::internal(anyhow!("authorization header not found in request context")))
    }
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub TokenUser);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::internal(anyhow!("user not found in request context")))
    }
}

/// The caller's [`RoleContext`] as left behind by the authorization layer,
/// including every phase lookup it performed.
#[derive(Debug, Clone)]
pub struct Roles(pub RoleContext);

impl<S: Send + Sync> FromRequestParts<S> for Roles {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RoleContext>()
            .cloned()
            .map(Roles)
            .ok_or_else(|| AppError::internal(anyhow!("role context not found in request context")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracts_token() {
        let headers = headers("Bearer abc.def.ghi");
        let (value, token) = bearer_token(&headers).unwrap();
        assert_eq!(value, "Bearer abc.def.ghi");
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_rejects_missing_and_malformed() {
        assert_eq!(
            bearer_token(&HeaderMap::new()).unwrap_err().status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            bearer_token(&headers("Basic abc")).unwrap_err().status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            bearer_token(&headers("Bearer ")).unwrap_err().status,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_extractors_without_context_are_internal_errors() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err = Roles::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
