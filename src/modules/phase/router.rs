use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::controller::{copy_phase, get_phase_config};
use super::service::{PhaseConfigHandler, PhaseCopyHandler};
use crate::middleware::role::{RoleGuard, authorize};
use crate::state::AppState;

/// `GET /config`, guarded by `guard`. Nest it below a path that carries the
/// `coursePhaseID` parameter, e.g. `/api/course_phase/{coursePhaseID}`.
pub fn config_router(guard: RoleGuard, handler: Arc<dyn PhaseConfigHandler>) -> Router<AppState> {
    Router::new()
        .route("/config", get(get_phase_config))
        .with_state(handler)
        .route_layer(middleware::from_fn_with_state(guard, authorize))
}

/// `POST /copy`. Callers add their own guard when the route needs one.
pub fn copy_router(handler: Arc<dyn PhaseCopyHandler>) -> Router<AppState> {
    Router::new()
        .route("/copy", post(copy_phase))
        .with_state(handler)
}
