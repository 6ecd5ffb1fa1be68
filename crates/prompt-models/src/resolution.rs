//! Resolution descriptors.
//!
//! A [`Resolution`] tells a phase module where another phase module exposes a
//! piece of data (a DTO) that should be merged into the participation records
//! it returns. The core service hands out descriptors together with the
//! participations; phase modules never construct them by hand.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Describes one remote data source to merge into a response.
///
/// All four fields are mandatory. Use [`Resolution::check`] before issuing
/// any request: a descriptor with an empty name, an invalid base URL, an
/// empty endpoint path or a nil course phase is rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Resolution {
    /// Key under which the resolved value lands in `prevData`.
    #[serde(rename = "dtoName", alias = "DtoName")]
    #[validate(length(min = 1, message = "dtoName is required"))]
    pub dto_name: String,

    /// Base URL of the phase module that owns the data.
    #[serde(rename = "baseURL", alias = "BaseURL")]
    #[validate(url(message = "baseURL must be a valid absolute URL"))]
    pub base_url: String,

    #[serde(rename = "endpointPath", alias = "EndpointPath")]
    #[validate(length(min = 1, message = "endpointPath is required"))]
    pub endpoint_path: String,

    /// Course phase the data belongs to (the source phase, not the caller's).
    #[serde(rename = "coursePhaseID", alias = "CoursePhaseID")]
    pub course_phase_id: Uuid,
}

impl Resolution {
    /// Runs the derived field validation plus the non-nil phase check.
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.course_phase_id.is_nil() {
            let mut error = ValidationError::new("nil_uuid");
            error.message = Some("coursePhaseID must not be nil".into());
            errors.add("coursePhaseID", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Checks every descriptor, failing on the first invalid one.
pub fn check_resolutions(resolutions: &[Resolution]) -> Result<(), ValidationErrors> {
    resolutions.iter().try_for_each(Resolution::check)
}
