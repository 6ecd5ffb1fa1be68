//! Cache key generation for authorization lookups.

use uuid::Uuid;

const CACHE_PREFIX: &str = "prompt";

fn build_key(parts: &[&str]) -> String {
    format!("{}:{}", CACHE_PREFIX, parts.join(":"))
}

/// Role-name mapping of a course phase. The mapping is the same for every
/// caller, so the key carries no user.
pub fn phase_roles(course_phase_id: Uuid) -> String {
    build_key(&["course_phase", &course_phase_id.to_string(), "roles"])
}

/// Enrollment of one user in a course phase.
pub fn student_of_phase(course_phase_id: Uuid, user_id: &str) -> String {
    build_key(&[
        "course_phase",
        &course_phase_id.to_string(),
        "is_student",
        user_id,
    ])
}
