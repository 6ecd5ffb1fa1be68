//! Role names understood by the authorization layer.
//!
//! Platform roles come straight from the token. Course-phase roles are
//! resolved through the core service: `Lecturer` and `Editor` map to the
//! course-specific role names, and any other name is a custom role that the
//! caller holds as `<customRolePrefix><name>`.

/// Platform administrator.
pub const PROMPT_ADMIN: &str = "PROMPT_Admin";
/// Platform-wide lecturer.
pub const PROMPT_LECTURER: &str = "PROMPT_Lecturer";
/// Lecturer of the course owning the phase.
pub const COURSE_LECTURER: &str = "Lecturer";
/// Editor of the course owning the phase.
pub const COURSE_EDITOR: &str = "Editor";
/// Student enrolled in the phase.
pub const COURSE_STUDENT: &str = "Student";

const WELL_KNOWN: [&str; 5] = [
    PROMPT_ADMIN,
    PROMPT_LECTURER,
    COURSE_LECTURER,
    COURSE_EDITOR,
    COURSE_STUDENT,
];

pub fn is_platform_role(role: &str) -> bool {
    role == PROMPT_ADMIN || role == PROMPT_LECTURER
}

pub fn is_custom_role(role: &str) -> bool {
    !WELL_KNOWN.contains(&role)
}

/// Role names a protected route accepts, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedRoles(Vec<String>);

impl AllowedRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for role in roles {
            let role = role.into();
            if !out.contains(&role) {
                out.push(role);
            }
        }
        Self(out)
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when no phase lookup could ever grant access: the set is empty or
    /// holds nothing but platform roles.
    pub fn only_platform_roles(&self) -> bool {
        self.0.iter().all(|r| is_platform_role(r))
    }

    pub fn custom_roles(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|r| is_custom_role(r))
    }

    pub fn has_custom_role(&self) -> bool {
        self.custom_roles().next().is_some()
    }

    /// Lecturer, editor or a custom role is accepted, so the phase role
    /// mapping must be fetched.
    pub fn requires_phase_roles(&self) -> bool {
        self.contains(COURSE_LECTURER) || self.contains(COURSE_EDITOR) || self.has_custom_role()
    }

    pub fn allows_student(&self) -> bool {
        self.contains(COURSE_STUDENT)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedRoles {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
