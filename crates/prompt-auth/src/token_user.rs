use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The authenticated caller, as extracted from a verified token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUser {
    pub roles: HashSet<String>,
    pub id: String,
    pub email: String,
    pub matriculation_number: String,
    pub university_login: String,
    pub first_name: String,
    pub last_name: String,
}

impl TokenUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }
}
