//! Course phase participation records and the core-service envelopes that
//! carry them together with their resolution descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::resolution::Resolution;
use crate::student::Student;

/// Open key/value storage passed between phases and modules.
pub type MetaData = serde_json::Map<String, Value>;

/// A student's participation in one course phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePhaseParticipationWithStudent {
    #[serde(rename = "coursePhaseID")]
    pub course_phase_id: Uuid,
    #[serde(default)]
    pub pass_status: String,
    #[serde(rename = "courseParticipationID")]
    pub course_participation_id: Uuid,
    /// Visible to lecturers and the system only.
    #[serde(default)]
    pub restricted_data: Option<MetaData>,
    #[serde(default)]
    pub student_readable_data: Option<MetaData>,
    /// Data from previous phases, keyed by DTO name.
    #[serde(default)]
    pub prev_data: Option<MetaData>,
    #[serde(default)]
    pub student: Student,
}

impl CoursePhaseParticipationWithStudent {
    /// Stores `value` under `dto_name` in `prevData`, creating the map first
    /// when the record has none. An existing entry for the key is replaced.
    pub fn merge_prev_data(&mut self, dto_name: &str, value: Value) {
        self.prev_data
            .get_or_insert_with(MetaData::new)
            .insert(dto_name.to_string(), value);
    }
}

/// `GET /api/course_phases/{id}/participations`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoursePhaseParticipationsWithResolutions {
    #[serde(default)]
    pub participations: Vec<CoursePhaseParticipationWithStudent>,
    #[serde(default)]
    pub resolutions: Vec<Resolution>,
}

/// `GET /api/course_phases/{id}/participations/{participationID}`
///
/// The core either returns the bare record or wraps it together with the
/// descriptors that apply to it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SingleParticipationResponse {
    WithResolutions {
        participation: CoursePhaseParticipationWithStudent,
        #[serde(default)]
        resolutions: Vec<Resolution>,
    },
    Bare(CoursePhaseParticipationWithStudent),
}

impl SingleParticipationResponse {
    pub fn into_parts(self) -> (CoursePhaseParticipationWithStudent, Vec<Resolution>) {
        match self {
            Self::WithResolutions {
                participation,
                resolutions,
            } => (participation, resolutions),
            Self::Bare(participation) => (participation, Vec::new()),
        }
    }
}

/// `GET /api/course_phases/{id}/course_phase_data`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePhaseDataWithResolutions {
    #[serde(default)]
    pub prev_data: Option<MetaData>,
    #[serde(default)]
    pub resolutions: Vec<Resolution>,
}
