//! # PROMPT Phase SDK
//!
//! Building blocks for phase modules of the PROMPT course platform: verifying
//! callers, deciding whether they may reach a course phase route, and
//! enriching participation records with data owned by other phase modules.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── prompt-core/           # AppError and serde helpers
//! ├── prompt-config/         # Environment-driven configuration
//! ├── prompt-auth/           # Token verification, roles, role context
//! ├── prompt-models/         # Participations, students, resolutions, answers
//! ├── prompt-cache/          # Optional cross-request lookup cache (Redis)
//! └── prompt-observability/  # Logging, tracing, metrics
//! src/
//! ├── core_service/   # Client for the core service and lookup fetchers
//! ├── middleware/     # Authentication and the cascading authorization layer
//! ├── resolution/     # Cross-service resolution engine
//! ├── modules/        # Standard phase endpoints and demo participation routes
//! ├── router.rs       # Demo phase server router
//! └── state.rs        # Shared application state
//! ```
//!
//! ## Authorization
//!
//! A route lists the roles it accepts. The decision runs in stages and stops
//! at the first one that settles it:
//!
//! | Stage | Grants when | Needs the core |
//! |-------|-------------|----------------|
//! | Direct grant | caller holds an accepted platform role | no |
//! | Phase role | caller is lecturer or editor of the phase's course | roles |
//! | Custom role | caller holds an accepted custom course role | roles |
//! | Student | caller is enrolled in the phase | enrollment |
//!
//! A route that accepts platform roles only never reaches the core. Every
//! denial is a 401 with the same message; a bad `coursePhaseID` is a 400 and
//! an unreachable core a 500.
//!
//! ## Resolution
//!
//! The core returns [`Resolution`](prompt_models::Resolution) descriptors with
//! each participation batch. [`ResolutionEngine`](resolution::ResolutionEngine)
//! fetches every descriptor from the owning module and merges the values into
//! `prevData`. Batches are all or nothing.

pub mod core_service;
pub mod middleware;
pub mod modules;
pub mod resolution;
pub mod router;
pub mod state;

pub use router::{PhaseHandlers, init_router};
pub use state::{AppState, init_app_state};
