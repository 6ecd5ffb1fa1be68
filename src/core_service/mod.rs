//! Access to the PROMPT core service.
//!
//! - [`client`]: [`CoreClient`], the HTTP client for the core's JSON endpoints
//! - [`fetchers`]: The lookup seams the authorization layer depends on, and
//!   [`CachedLookups`] which puts a [`LookupCache`](prompt_cache::LookupCache)
//!   in front of them

pub mod client;
pub mod fetchers;

pub use client::{CoreClient, CoreRequestError};
pub use fetchers::{CachedLookups, Caller, ParticipationFetcher, PhaseRoleFetcher};
