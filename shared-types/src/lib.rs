use serde::{Deserialize, Serialize};

pub mod extraction;
pub mod profile;
pub mod report;

pub use extraction::{ProfileError, SectionContent, SectionKind, SectionLocator};
pub use profile::{ProfileRecord, RawEntry};
pub use report::{
    EmailStrategy, PipelineDiagnostics, PipelineOutput, PipelineStage, ValidationReport,
};

/// Error body returned to the submission layer when a run cannot start
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ProfileError> for ErrorResponse {
    fn from(err: &ProfileError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
