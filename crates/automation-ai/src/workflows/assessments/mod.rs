//! Process assessments: intake, the deterministic score engine, and owner-scoped storage.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Assessment, AssessmentDraft, AssessmentId, AssessmentInput, Factor, FactorRemarks,
    FactorScores, ImplementationEffort, Priority, Suitability, PROCESS_NAME_MAX_CHARS,
};
pub use repository::{AssessmentRepository, RepositoryError};
pub use router::{assessment_router, BulkAssessmentRequest};
pub use scoring::{classify, suitability_for_total, Classification};
pub use service::{AssessmentService, AssessmentServiceError};
pub use views::{AssessmentSummaryView, AssessmentView};
