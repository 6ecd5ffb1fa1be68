pub mod participations;
pub mod phase;

pub use self::phase::{NoPhaseSettings, PhaseConfigHandler, PhaseCopyHandler};
