use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;

use prompt_auth::{COURSE_EDITOR, COURSE_LECTURER, PROMPT_ADMIN, PROMPT_LECTURER};
use prompt_config::CorsConfig;
use prompt_observability::{logging_middleware, metrics_middleware};

use crate::middleware::role::{RoleGuard, authorize};
use crate::modules::participations::init_participations_router;
use crate::modules::phase::{PhaseConfigHandler, PhaseCopyHandler, config_router, copy_router};
use crate::state::AppState;

/// The handlers a phase module plugs into the standard endpoints.
#[derive(Clone)]
pub struct PhaseHandlers {
    pub config: Arc<dyn PhaseConfigHandler>,
    pub copy: Arc<dyn PhaseCopyHandler>,
}

pub fn init_router(state: AppState, handlers: PhaseHandlers) -> Router {
    let staff = RoleGuard::new(
        state.clone(),
        [PROMPT_ADMIN, PROMPT_LECTURER, COURSE_LECTURER, COURSE_EDITOR],
    );
    let copy_guard = RoleGuard::new(state.clone(), [PROMPT_ADMIN, PROMPT_LECTURER]);

    let course_phase = Router::new()
        .merge(init_participations_router(&state))
        .merge(config_router(staff, handlers.config));

    Router::new()
        .nest(
            "/api",
            Router::new()
                .nest("/course_phase/{coursePhaseID}", course_phase)
                .merge(
                    copy_router(handlers.copy)
                        .route_layer(middleware::from_fn_with_state(copy_guard, authorize)),
                ),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state.config.cors))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}
