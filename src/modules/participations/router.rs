use axum::{Router, middleware, routing::get};

use prompt_auth::{COURSE_EDITOR, COURSE_LECTURER, COURSE_STUDENT, PROMPT_ADMIN, PROMPT_LECTURER};

use super::controller::{
    get_course_phase_data, get_own_participation, get_participation, get_participations,
};
use crate::middleware::role::{RoleGuard, authorize};
use crate::state::AppState;

/// Participation routes below `/course_phase/{coursePhaseID}`.
///
/// Staff see every record; students only reach `/participations/self` and the
/// phase-level data.
pub fn init_participations_router(state: &AppState) -> Router<AppState> {
    let staff = RoleGuard::new(
        state.clone(),
        [PROMPT_ADMIN, PROMPT_LECTURER, COURSE_LECTURER, COURSE_EDITOR],
    );
    let everyone = RoleGuard::new(
        state.clone(),
        [PROMPT_ADMIN, PROMPT_LECTURER, COURSE_LECTURER, COURSE_EDITOR, COURSE_STUDENT],
    );
    let students = RoleGuard::new(state.clone(), [COURSE_STUDENT]);

    let staff_routes = Router::new()
        .route("/participations", get(get_participations))
        .route(
            "/participations/{courseParticipationID}",
            get(get_participation),
        )
        .route_layer(middleware::from_fn_with_state(staff, authorize));

    let student_routes = Router::new()
        .route("/participations/self", get(get_own_participation))
        .route_layer(middleware::from_fn_with_state(students, authorize));

    let shared_routes = Router::new()
        .route("/course_phase_data", get(get_course_phase_data))
        .route_layer(middleware::from_fn_with_state(everyone, authorize));

    Router::new()
        .merge(staff_routes)
        .merge(student_routes)
        .merge(shared_routes)
}
