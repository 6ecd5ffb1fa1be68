//! Endpoints every phase module exposes to the core: configuration status
//! and course copy.

pub mod controller;
pub mod router;
pub mod service;

pub use router::{config_router, copy_router};
pub use service::{NoPhaseSettings, PhaseConfigHandler, PhaseCopyHandler};
