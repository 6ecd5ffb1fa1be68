//! # PROMPT Auth
//!
//! Caller identity and role handling for PROMPT phase modules.
//!
//! - [`verifier`]: Bearer token verification ([`KeycloakVerifier`], [`SecretVerifier`])
//! - [`claims`]: Keycloak access token claims
//! - [`token_user`]: The authenticated caller
//! - [`roles`]: Well-known role names and allowed-role sets
//! - [`context`]: Request-scoped [`RoleContext`] filled in by the authorization layer
//!
//! # Example
//!
//! ```ignore
//! use prompt_auth::{KeycloakVerifier, TokenVerifier};
//! use prompt_config::KeycloakConfig;
//!
//! let verifier = KeycloakVerifier::new(KeycloakConfig::from_env())?;
//! let user = verifier.verify(token).await?;
//! println!("{} holds {:?}", user.id, user.roles);
//! ```

pub mod claims;
pub mod context;
pub mod roles;
pub mod token_user;
pub mod verifier;

// Re-export commonly used types at crate root
pub use claims::KeycloakClaims;
pub use context::{PhaseParticipation, PhaseRoles, RoleContext};
pub use roles::{
    AllowedRoles, COURSE_EDITOR, COURSE_LECTURER, COURSE_STUDENT, PROMPT_ADMIN, PROMPT_LECTURER,
};
pub use token_user::TokenUser;
pub use verifier::{KeycloakVerifier, SecretVerifier, TokenVerifier, VerifierError};
