use super::domain::{Assessment, AssessmentId};
use crate::identity::OwnerId;

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    /// Store every assessment or none of them.
    fn insert_all(&self, assessments: Vec<Assessment>) -> Result<Vec<Assessment>, RepositoryError>;
    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError>;
    fn fetch(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError>;
    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Assessment>, RepositoryError>;
    fn delete(&self, id: AssessmentId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Listing order: highest total first, newest first within a total, then id.
pub fn sort_for_listing(assessments: &mut [Assessment]) {
    assessments.sort_by(|left, right| {
        right
            .total_score()
            .cmp(&left.total_score())
            .then_with(|| right.created_at.cmp(&left.created_at))
            .then_with(|| right.id.cmp(&left.id))
    });
}
