use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Assessment, AssessmentId, AssessmentInput};
use super::repository::{sort_for_listing, AssessmentRepository, RepositoryError};
use crate::identity::OwnerId;
use crate::workflows::reports::{aggregate, AssessmentSummary, ReportRepository};
use crate::workflows::validation::ValidationError;

/// Owner-scoped assessment lifecycle. Classification is recomputed on every write and
/// deletions detach the assessment from the owner's reports.
pub struct AssessmentService<R, P> {
    repository: Arc<R>,
    reports: Arc<P>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    AssessmentId(ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

impl<R, P> AssessmentService<R, P>
where
    R: AssessmentRepository + 'static,
    P: ReportRepository + 'static,
{
    pub fn new(repository: Arc<R>, reports: Arc<P>) -> Self {
        Self {
            repository,
            reports,
        }
    }

    pub fn create(
        &self,
        owner: &OwnerId,
        input: AssessmentInput,
    ) -> Result<Assessment, AssessmentServiceError> {
        let draft = input.validate().map_err(|error| {
            warn!(owner = %owner, %error, "assessment rejected");
            error
        })?;
        let assessment = Assessment::new(next_assessment_id(), owner.clone(), draft, Utc::now());
        let stored = self.repository.insert(assessment)?;
        info!(
            assessment_id = %stored.id,
            owner = %owner,
            total_score = stored.total_score(),
            suitability = stored.suitability().key(),
            "assessment created"
        );
        Ok(stored)
    }

    /// Validate every entry first; nothing is stored unless all of them pass.
    pub fn bulk_create(
        &self,
        owner: &OwnerId,
        inputs: Vec<AssessmentInput>,
    ) -> Result<Vec<Assessment>, AssessmentServiceError> {
        if inputs.is_empty() {
            return Err(ValidationError::invalid(
                "processes",
                "must contain at least one assessment",
            )
            .into());
        }

        let mut drafts = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.into_iter().enumerate() {
            let draft = input.validate().map_err(|source| {
                let error = ValidationError::BulkEntry {
                    index,
                    source: Box::new(source),
                };
                warn!(owner = %owner, %error, "bulk assessment rejected");
                error
            })?;
            drafts.push(draft);
        }

        let now = Utc::now();
        let assessments = drafts
            .into_iter()
            .map(|draft| Assessment::new(next_assessment_id(), owner.clone(), draft, now))
            .collect();
        let stored = self.repository.insert_all(assessments)?;
        info!(owner = %owner, count = stored.len(), "bulk assessments created");
        Ok(stored)
    }

    pub fn get(
        &self,
        owner: &OwnerId,
        id: AssessmentId,
    ) -> Result<Assessment, AssessmentServiceError> {
        self.repository
            .fetch(id)?
            .filter(|assessment| &assessment.assessed_by == owner)
            .ok_or(AssessmentServiceError::NotFound(id))
    }

    pub fn list(&self, owner: &OwnerId) -> Result<Vec<Assessment>, AssessmentServiceError> {
        let mut assessments = self.repository.list_by_owner(owner)?;
        sort_for_listing(&mut assessments);
        Ok(assessments)
    }

    /// Replace every editable field.
    pub fn update(
        &self,
        owner: &OwnerId,
        id: AssessmentId,
        input: AssessmentInput,
    ) -> Result<Assessment, AssessmentServiceError> {
        let mut assessment = self.get(owner, id)?;
        let draft = input.validate().map_err(|error| {
            warn!(assessment_id = %id, %error, "assessment update rejected");
            error
        })?;
        assessment.apply(draft, Utc::now());
        self.repository.update(assessment.clone())?;
        info!(
            assessment_id = %id,
            owner = %owner,
            total_score = assessment.total_score(),
            suitability = assessment.suitability().key(),
            "assessment updated"
        );
        Ok(assessment)
    }

    /// Update only the fields present in `patch`.
    pub fn patch(
        &self,
        owner: &OwnerId,
        id: AssessmentId,
        patch: AssessmentInput,
    ) -> Result<Assessment, AssessmentServiceError> {
        let existing = self.get(owner, id)?;
        let merged = AssessmentInput::from_assessment(&existing).overlay(patch);
        self.update(owner, id, merged)
    }

    /// Remove the assessment, then drop it from the owner's reports. Reports skip ids that
    /// no longer resolve, so a failed detach leaves nothing visible behind.
    pub fn delete(&self, owner: &OwnerId, id: AssessmentId) -> Result<(), AssessmentServiceError> {
        self.get(owner, id)?;
        self.repository.delete(id)?;
        let detached = match self.reports.detach_assessment(owner, id) {
            Ok(count) => count,
            Err(error) => {
                warn!(assessment_id = %id, owner = %owner, %error, "stale report links left behind");
                0
            }
        };
        info!(assessment_id = %id, owner = %owner, detached, "assessment deleted");
        Ok(())
    }

    pub fn dashboard_stats(
        &self,
        owner: &OwnerId,
    ) -> Result<AssessmentSummary, AssessmentServiceError> {
        let assessments = self.repository.list_by_owner(owner)?;
        Ok(aggregate(&assessments))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("assessment {0} not found")]
    NotFound(AssessmentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
