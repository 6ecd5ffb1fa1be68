//! Responses of the core service's authorization endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `GET /api/auth/course_phase/{id}/roles`
///
/// Role names are course-scoped, e.g. `ios2425-Lecturer`. Custom roles are
/// the prefix followed by the bare role name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRoles {
    #[serde(default)]
    pub course_lecturer_role: String,
    #[serde(default)]
    pub course_editor_role: String,
    #[serde(default)]
    pub custom_role_prefix: String,
}

/// `GET /api/auth/course_phase/{id}/is_student`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentOfCoursePhase {
    #[serde(rename = "isStudentOfCoursePhase", default)]
    pub is_student_of_course_phase: bool,
    #[serde(rename = "courseParticipationID", default)]
    pub course_participation_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_roles_deserialize() {
        let json = r#"{"courseLecturerRole":"ios-Lecturer","courseEditorRole":"ios-Editor","customRolePrefix":"ios-cr-"}"#;
        let roles: CourseRoles = serde_json::from_str(json).unwrap();
        assert_eq!(roles.course_lecturer_role, "ios-Lecturer");
        assert_eq!(roles.custom_role_prefix, "ios-cr-");
    }

    #[test]
    fn test_student_of_phase_defaults() {
        let s: StudentOfCoursePhase = serde_json::from_str("{}").unwrap();
        assert!(!s.is_student_of_course_phase);
        assert!(s.course_participation_id.is_nil());
    }
}
