//! # PROMPT Models
//!
//! Platform-wide types exchanged between the core service and phase modules.

pub mod answers;
pub mod core_auth;
pub mod participation;
pub mod phase;
pub mod resolution;
pub mod student;

pub use answers::{
    AnswerError, ApplicationAnswer, MultiSelectAnswer, TextAnswer, read_application_answers,
};
pub use core_auth::{CourseRoles, StudentOfCoursePhase};
pub use participation::{
    CoursePhaseDataWithResolutions, CoursePhaseParticipationWithStudent,
    CoursePhaseParticipationsWithResolutions, MetaData, SingleParticipationResponse,
};
pub use phase::{CopyRequest, PhaseConfigRequest};
pub use resolution::{Resolution, check_resolutions};
pub use student::{Gender, Person, Student, StudyDegree, Team};
