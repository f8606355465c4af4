use super::domain::{AutomationTemplate, SavedRecommendation};
use crate::identity::OwnerId;
use crate::workflows::assessments::RepositoryError;

pub trait TemplateRepository: Send + Sync {
    fn insert(&self, template: AutomationTemplate) -> Result<AutomationTemplate, RepositoryError>;
    /// All templates in insertion order.
    fn list(&self) -> Result<Vec<AutomationTemplate>, RepositoryError>;
}

pub trait RecommendationRepository: Send + Sync {
    fn insert(
        &self,
        recommendation: SavedRecommendation,
    ) -> Result<SavedRecommendation, RepositoryError>;
    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<SavedRecommendation>, RepositoryError>;
}

/// Newest first.
pub fn sort_for_listing(recommendations: &mut [SavedRecommendation]) {
    recommendations.sort_by(|left, right| {
        right
            .generated_at
            .cmp(&left.generated_at)
            .then_with(|| right.id.cmp(&left.id))
    });
}
