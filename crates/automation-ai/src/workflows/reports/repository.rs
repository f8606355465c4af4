use super::domain::{Report, ReportId};
use crate::identity::OwnerId;
use crate::workflows::assessments::{AssessmentId, RepositoryError};

/// Report storage. Membership is many-to-many with assessments and carries no ordering
/// guarantee beyond what the store yields.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, report: Report) -> Result<Report, RepositoryError>;
    fn update(&self, report: Report) -> Result<(), RepositoryError>;
    fn fetch(&self, id: ReportId) -> Result<Option<Report>, RepositoryError>;
    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Report>, RepositoryError>;
    fn delete(&self, id: ReportId) -> Result<(), RepositoryError>;
    /// Remove an assessment from every report of `owner`, returning how many reports changed.
    fn detach_assessment(
        &self,
        owner: &OwnerId,
        assessment: AssessmentId,
    ) -> Result<usize, RepositoryError>;
}

/// Newest first.
pub fn sort_for_listing(reports: &mut [Report]) {
    reports.sort_by(|left, right| {
        right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| right.id.cmp(&left.id))
    });
}
