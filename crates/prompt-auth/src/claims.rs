//! Claims of a Keycloak-issued access token.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::token_user::TokenUser;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Subset of the access token claims the SDK reads.
///
/// Signature, `exp` and `iss` are checked by the verifier; the remaining
/// fields only feed [`TokenUser`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeycloakClaims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default)]
    pub iss: String,
    /// Authorized party: the client the token was issued to.
    #[serde(default)]
    pub azp: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub matriculation_number: String,
    #[serde(default)]
    pub university_login: String,
    #[serde(default)]
    pub realm_access: Option<RoleAccess>,
    #[serde(default)]
    pub resource_access: HashMap<String, RoleAccess>,
}

impl KeycloakClaims {
    /// Flattens realm roles and the roles of `client_id` into one set.
    /// Roles granted to other clients are ignored.
    pub fn roles(&self, client_id: &str) -> HashSet<String> {
        let realm = self.realm_access.iter().flat_map(|a| a.roles.iter());
        let client = self
            .resource_access
            .get(client_id)
            .into_iter()
            .flat_map(|a| a.roles.iter());
        realm.chain(client).cloned().collect()
    }

    pub fn into_token_user(self, client_id: &str) -> TokenUser {
        TokenUser {
            roles: self.roles(client_id),
            id: self.sub,
            email: self.email,
            matriculation_number: self.matriculation_number,
            university_login: self.university_login,
            first_name: self.given_name,
            last_name: self.family_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_merge_realm_and_client() {
        let json = r#"{
            "sub": "user-1",
            "exp": 9999999999,
            "azp": "prompt-client",
            "email": "alice@tum.de",
            "given_name": "Alice",
            "family_name": "Smith",
            "matriculation_number": "01234567",
            "university_login": "ab12cde",
            "realm_access": {"roles": ["PROMPT_Lecturer"]},
            "resource_access": {
                "prompt-server": {"roles": ["ios-Lecturer", "ios-cr-Tutor"]},
                "account": {"roles": ["manage-account"]}
            }
        }"#;
        let claims: KeycloakClaims = serde_json::from_str(json).unwrap();
        let user = claims.into_token_user("prompt-server");

        assert_eq!(user.id, "user-1");
        assert_eq!(user.first_name, "Alice");
        assert_eq!(user.university_login, "ab12cde");
        assert_eq!(user.roles.len(), 3);
        assert!(user.has_role("PROMPT_Lecturer"));
        assert!(user.has_role("ios-cr-Tutor"));
        assert!(!user.has_role("manage-account"));
    }

    #[test]
    fn test_missing_role_sections() {
        let claims: KeycloakClaims =
            serde_json::from_str(r#"{"sub":"u","exp":1}"#).unwrap();
        assert!(claims.roles("prompt-server").is_empty());
    }
}
