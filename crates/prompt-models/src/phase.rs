//! Request bodies the core service sends to phase modules.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies the phase whose configuration completeness is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseConfigRequest {
    #[serde(rename = "coursePhaseID")]
    pub course_phase_id: Uuid,
}

/// Body of `POST .../copy`: duplicate phase-owned data from one phase to
/// another when a course is copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRequest {
    #[serde(rename = "sourceCoursePhaseID")]
    pub source_course_phase_id: Uuid,
    #[serde(rename = "targetCoursePhaseID")]
    pub target_course_phase_id: Uuid,
}
