//! Cross-service data resolution.
//!
//! The core hands out [`Resolution`](prompt_models::Resolution) descriptors
//! next to participation records. Each names a phase module endpoint and the
//! DTO to take from its response; [`ResolutionEngine`] fetches those values
//! and merges them into `prevData` under the DTO name.

pub mod engine;
pub mod paths;

pub use engine::{ResolutionEngine, ResolutionError, merge_resolved};
pub use paths::{build_resolution_url, normalize_endpoint_path};
