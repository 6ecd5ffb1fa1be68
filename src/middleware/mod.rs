//! Authentication and authorization for phase module routes.
//!
//! # Modules
//!
//! - [`auth`]: Bearer token verification, [`AuthUser`](auth::AuthUser) and
//!   [`Roles`](auth::Roles) extractors
//! - [`authorization`]: The cascading [`AuthorizationDecider`](authorization::AuthorizationDecider)
//! - [`role`]: [`RoleGuard`](role::RoleGuard) and the [`authorize`](role::authorize) middleware
//!
//! # Request Flow
//!
//! 1. The client sends `Authorization: Bearer <token>`
//! 2. The token is verified and a [`RoleContext`](prompt_auth::RoleContext) is
//!    stored in the request
//! 3. The route's guard runs the decision, fetching phase roles or enrollment
//!    from the core only when a stage needs them
//! 4. The handler runs and can read the context through [`Roles`](auth::Roles)

pub mod auth;
pub mod authorization;
pub mod role;

pub use auth::{AuthUser, BearerHeader, Roles, authenticate};
pub use authorization::{AuthorizationDecider, Decision, Stage};
pub use role::{CoursePhaseId, RoleGuard, authorize};
