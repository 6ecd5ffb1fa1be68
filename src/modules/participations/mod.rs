//! Participation endpoints of the demo phase server, with every resolution
//! descriptor from the core merged into `prevData`.

pub mod controller;
pub mod router;

pub use router::init_participations_router;
