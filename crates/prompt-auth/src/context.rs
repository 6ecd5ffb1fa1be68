//! Request-scoped role information.
//!
//! A [`RoleContext`] starts out holding only the caller's token roles. The
//! phase-scoped parts are filled in by the authorization layer when, and only
//! when, a check needs them; until then the accessors report `false`.

use uuid::Uuid;

use crate::token_user::TokenUser;

/// The caller's standing in the course owning a phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseRoles {
    pub is_lecturer: bool,
    pub is_editor: bool,
    pub custom_role_prefix: String,
}

impl PhaseRoles {
    /// Matches the course-specific role names against the caller's roles.
    pub fn for_user(
        user: &TokenUser,
        lecturer_role: &str,
        editor_role: &str,
        custom_role_prefix: impl Into<String>,
    ) -> Self {
        Self {
            is_lecturer: !lecturer_role.is_empty() && user.has_role(lecturer_role),
            is_editor: !editor_role.is_empty() && user.has_role(editor_role),
            custom_role_prefix: custom_role_prefix.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseParticipation {
    pub is_student_of_phase: bool,
    pub course_participation_id: Uuid,
}

impl PhaseParticipation {
    pub fn not_enrolled() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct RoleContext {
    user: TokenUser,
    course_phase_id: Option<Uuid>,
    phase_roles: Option<PhaseRoles>,
    participation: Option<PhaseParticipation>,
}

impl RoleContext {
    pub fn new(user: TokenUser) -> Self {
        Self {
            user,
            course_phase_id: None,
            phase_roles: None,
            participation: None,
        }
    }

    pub fn user(&self) -> &TokenUser {
        &self.user
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.user.has_role(role)
    }

    pub fn course_phase_id(&self) -> Option<Uuid> {
        self.course_phase_id
    }

    pub fn set_course_phase_id(&mut self, id: Uuid) {
        self.course_phase_id = Some(id);
    }

    pub fn phase_roles(&self) -> Option<&PhaseRoles> {
        self.phase_roles.as_ref()
    }

    pub fn set_phase_roles(&mut self, roles: PhaseRoles) {
        self.phase_roles = Some(roles);
    }

    pub fn participation(&self) -> Option<&PhaseParticipation> {
        self.participation.as_ref()
    }

    pub fn set_participation(&mut self, participation: PhaseParticipation) {
        self.participation = Some(participation);
    }

    pub fn is_lecturer(&self) -> bool {
        self.phase_roles.as_ref().is_some_and(|r| r.is_lecturer)
    }

    pub fn is_editor(&self) -> bool {
        self.phase_roles.as_ref().is_some_and(|r| r.is_editor)
    }

    pub fn custom_role_prefix(&self) -> Option<&str> {
        self.phase_roles
            .as_ref()
            .map(|r| r.custom_role_prefix.as_str())
    }

    /// Whether the caller holds `<prefix><role>`. Always false before the
    /// phase roles are known.
    pub fn holds_custom_role(&self, role: &str) -> bool {
        match self.custom_role_prefix() {
            Some(prefix) => self.user.has_role(&format!("{prefix}{role}")),
            None => false,
        }
    }

    pub fn is_student_of_phase(&self) -> bool {
        self.participation
            .as_ref()
            .is_some_and(|p| p.is_student_of_phase)
    }

    /// Set only for enrolled students.
    pub fn course_participation_id(&self) -> Option<Uuid> {
        self.participation
            .as_ref()
            .filter(|p| p.is_student_of_phase)
            .map(|p| p.course_participation_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str]) -> TokenUser {
        TokenUser {
            roles: roles.iter().map(|r| r.to_string()).collect(),
            id: "u-1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unfetched_context_reports_false() {
        let ctx = RoleContext::new(user(&["ios-Lecturer", "ios-cr-Tutor"]));
        assert!(!ctx.is_lecturer());
        assert!(!ctx.is_editor());
        assert!(!ctx.holds_custom_role("Tutor"));
        assert!(!ctx.is_student_of_phase());
        assert!(ctx.course_participation_id().is_none());
        assert!(ctx.custom_role_prefix().is_none());
    }

    #[test]
    fn test_phase_roles_for_user() {
        let u = user(&["ios-Editor"]);
        let roles = PhaseRoles::for_user(&u, "ios-Lecturer", "ios-Editor", "ios-cr-");
        assert!(!roles.is_lecturer);
        assert!(roles.is_editor);
    }

    #[test]
    fn test_empty_role_names_never_match() {
        let mut u = user(&[]);
        u.roles.insert(String::new());
        let roles = PhaseRoles::for_user(&u, "", "", "");
        assert!(!roles.is_lecturer);
        assert!(!roles.is_editor);
    }

    #[test]
    fn test_custom_role_uses_prefix() {
        let mut ctx = RoleContext::new(user(&["ios-cr-Tutor"]));
        ctx.set_phase_roles(PhaseRoles {
            custom_role_prefix: "ios-cr-".into(),
            ..Default::default()
        });
        assert!(ctx.holds_custom_role("Tutor"));
        assert!(!ctx.holds_custom_role("Grader"));
    }

    #[test]
    fn test_participation_id_only_for_enrolled() {
        let id = Uuid::new_v4();
        let mut ctx = RoleContext::new(user(&[]));
        ctx.set_participation(PhaseParticipation {
            is_student_of_phase: false,
            course_participation_id: id,
        });
        assert!(ctx.course_participation_id().is_none());

        ctx.set_participation(PhaseParticipation {
            is_student_of_phase: true,
            course_participation_id: id,
        });
        assert_eq!(ctx.course_participation_id(), Some(id));
    }
}
