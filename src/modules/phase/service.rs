use std::collections::HashMap;

use async_trait::async_trait;

use prompt_core::AppError;
use prompt_models::{CopyRequest, PhaseConfigRequest};

/// Reports how complete a phase's configuration is.
///
/// Keys are setting names, values tell whether the setting is configured.
/// Errors surface with their own status (500 for [`AppError::internal`]).
#[async_trait]
pub trait PhaseConfigHandler: Send + Sync {
    async fn handle_phase_config(
        &self,
        request: PhaseConfigRequest,
    ) -> Result<HashMap<String, bool>, AppError>;
}

/// Copies phase-owned data from one phase to another when the core copies a
/// course.
#[async_trait]
pub trait PhaseCopyHandler: Send + Sync {
    async fn handle_phase_copy(&self, request: CopyRequest) -> Result<(), AppError>;
}

/// Handler for phases without settings of their own: the configuration is
/// always complete and a copy has nothing to move.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPhaseSettings;

#[async_trait]
impl PhaseConfigHandler for NoPhaseSettings {
    async fn handle_phase_config(
        &self,
        _request: PhaseConfigRequest,
    ) -> Result<HashMap<String, bool>, AppError> {
        Ok(HashMap::new())
    }
}

#[async_trait]
impl PhaseCopyHandler for NoPhaseSettings {
    async fn handle_phase_copy(&self, _request: CopyRequest) -> Result<(), AppError> {
        Ok(())
    }
}
