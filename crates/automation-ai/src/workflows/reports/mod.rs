//! Reports: named groups of assessments, their aggregate counts, the narrative conclusion,
//! and CSV/PDF downloads.

pub mod aggregation;
pub mod composer;
pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;
mod views;

#[cfg(test)]
mod tests;

pub use aggregation::{aggregate, AssessmentSummary, SuitabilityCounts};
pub use composer::{compose_conclusion, ReportDocument, EMPTY_CONCLUSION};
pub use domain::{Report, ReportDraft, ReportId, ReportInput, TITLE_MAX_CHARS};
pub use export::{download_filename, ExportError, ExportFormat, ExportedFile};
pub use repository::ReportRepository;
pub use router::report_router;
pub use service::{ReportService, ReportServiceError};
pub use views::ReportView;
