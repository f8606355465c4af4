use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::aggregation::SuitabilityCounts;
use super::composer::{compose_conclusion, ReportDocument};
use super::domain::{Report, ReportId, ReportInput};
use super::export::{download_filename, render_csv, render_pdf, ExportError, ExportFormat, ExportedFile};
use super::repository::{sort_for_listing, ReportRepository};
use crate::identity::OwnerId;
use crate::workflows::assessments::{Assessment, AssessmentId, AssessmentRepository, RepositoryError};
use crate::workflows::validation::ValidationError;

/// Owner-scoped reports over the owner's assessments, plus conclusions and exports.
pub struct ReportService<P, R> {
    reports: Arc<P>,
    assessments: Arc<R>,
    rows_per_page: usize,
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    ReportId(REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

impl<P, R> ReportService<P, R>
where
    P: ReportRepository + 'static,
    R: AssessmentRepository + 'static,
{
    pub fn new(reports: Arc<P>, assessments: Arc<R>, rows_per_page: usize) -> Self {
        Self {
            reports,
            assessments,
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// Create a report. Member ids that are unknown or owned by someone else are dropped.
    pub fn create(&self, owner: &OwnerId, input: ReportInput) -> Result<Report, ReportServiceError> {
        let draft = input.validate().map_err(|error| {
            warn!(owner = %owner, %error, "report rejected");
            error
        })?;
        let requested = draft.assessment_ids.unwrap_or_default();
        let assessment_ids = self.owned_ids(owner, &requested)?;

        let report = Report {
            id: next_report_id(),
            title: draft.title,
            description: draft.description,
            assessment_ids,
            conclusion: String::new(),
            generated_by: owner.clone(),
            created_at: Utc::now(),
        };
        let stored = self.reports.insert(report)?;
        info!(
            report_id = %stored.id,
            owner = %owner,
            members = stored.assessment_ids.len(),
            dropped = requested.len() - stored.assessment_ids.len(),
            "report created"
        );
        Ok(stored)
    }

    pub fn list(&self, owner: &OwnerId) -> Result<Vec<Report>, ReportServiceError> {
        let mut reports = self.reports.list_by_owner(owner)?;
        sort_for_listing(&mut reports);
        Ok(reports)
    }

    pub fn get(&self, owner: &OwnerId, id: ReportId) -> Result<Report, ReportServiceError> {
        self.reports
            .fetch(id)?
            .filter(|report| &report.generated_by == owner)
            .ok_or(ReportServiceError::NotFound(id))
    }

    /// Resolve the member assessments in stored order, skipping links that no longer resolve.
    pub fn members(&self, report: &Report) -> Result<Vec<Assessment>, ReportServiceError> {
        let mut members = Vec::with_capacity(report.assessment_ids.len());
        for id in &report.assessment_ids {
            if let Some(assessment) = self.assessments.fetch(*id)? {
                if assessment.assessed_by == report.generated_by {
                    members.push(assessment);
                }
            }
        }
        Ok(members)
    }

    /// Replace title and description; membership is replaced only when ids are supplied.
    pub fn update(
        &self,
        owner: &OwnerId,
        id: ReportId,
        input: ReportInput,
    ) -> Result<Report, ReportServiceError> {
        let mut report = self.get(owner, id)?;
        let draft = input.validate().map_err(|error| {
            warn!(report_id = %id, %error, "report update rejected");
            error
        })?;
        report.title = draft.title;
        report.description = draft.description;
        if let Some(requested) = draft.assessment_ids {
            report.assessment_ids = self.owned_ids(owner, &requested)?;
        }
        self.reports.update(report.clone())?;
        info!(report_id = %id, owner = %owner, members = report.assessment_ids.len(), "report updated");
        Ok(report)
    }

    pub fn delete(&self, owner: &OwnerId, id: ReportId) -> Result<(), ReportServiceError> {
        self.get(owner, id)?;
        self.reports.delete(id)?;
        info!(report_id = %id, owner = %owner, "report deleted");
        Ok(())
    }

    /// Recompute and store the narrative conclusion from the current members.
    pub fn generate_conclusion(
        &self,
        owner: &OwnerId,
        id: ReportId,
    ) -> Result<String, ReportServiceError> {
        let mut report = self.get(owner, id)?;
        let members = self.members(&report)?;
        let counts = SuitabilityCounts::from_assessments(&members);
        report.conclusion = compose_conclusion(&counts);
        self.reports.update(report.clone())?;
        info!(
            report_id = %id,
            owner = %owner,
            highly_automatable = counts.highly_automatable,
            possibly_automatable = counts.possibly_automatable,
            not_suitable = counts.not_suitable,
            "report conclusion generated"
        );
        Ok(report.conclusion)
    }

    pub fn document(&self, owner: &OwnerId, id: ReportId) -> Result<ReportDocument, ReportServiceError> {
        let report = self.get(owner, id)?;
        let members = self.members(&report)?;
        Ok(ReportDocument::compose(&report, members, Utc::now()))
    }

    pub fn export(
        &self,
        owner: &OwnerId,
        id: ReportId,
        format: ExportFormat,
    ) -> Result<ExportedFile, ReportServiceError> {
        let document = self.document(owner, id)?;
        let bytes = match format {
            ExportFormat::Csv => render_csv(&document)?,
            ExportFormat::Pdf => render_pdf(&document, self.rows_per_page)?,
        };
        info!(
            report_id = %id,
            owner = %owner,
            format = format.extension(),
            rows = document.assessments.len(),
            bytes = bytes.len(),
            "report exported"
        );
        Ok(ExportedFile {
            filename: download_filename(&document.title, format),
            format,
            bytes,
        })
    }

    fn owned_ids(
        &self,
        owner: &OwnerId,
        requested: &[AssessmentId],
    ) -> Result<Vec<AssessmentId>, ReportServiceError> {
        let mut owned = Vec::with_capacity(requested.len());
        for id in requested {
            let belongs = self
                .assessments
                .fetch(*id)?
                .is_some_and(|assessment| &assessment.assessed_by == owner);
            if belongs {
                owned.push(*id);
            }
        }
        Ok(owned)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("report {0} not found")]
    NotFound(ReportId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
