use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    AutomationPlanRequest, AutomationTemplate, RecommendationId, SavedRecommendation, TemplateId,
    DEFAULT_TEMPLATES,
};
use super::repository::{sort_for_listing, RecommendationRepository, TemplateRepository};
use crate::identity::OwnerId;
use crate::workflows::assessments::{FactorScores, RepositoryError};
use crate::workflows::insights::{automation_plan, FactorReadings};
use crate::workflows::validation::ValidationError;

/// Shared scenario templates and the owner-scoped log of generated automation plans.
pub struct AutomationService<T, S> {
    templates: Arc<T>,
    recommendations: Arc<S>,
}

static TEMPLATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RECOMMENDATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl<T, S> AutomationService<T, S>
where
    T: TemplateRepository + 'static,
    S: RecommendationRepository + 'static,
{
    pub fn new(templates: Arc<T>, recommendations: Arc<S>) -> Self {
        Self {
            templates,
            recommendations,
        }
    }

    /// Insert the built-in templates when the store holds none. Returns how many were added.
    pub fn seed_defaults(&self) -> Result<usize, AutomationServiceError> {
        if !self.templates.list()?.is_empty() {
            return Ok(0);
        }
        let now = Utc::now();
        for seed in &DEFAULT_TEMPLATES {
            let template = AutomationTemplate {
                id: TemplateId(TEMPLATE_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
                name: seed.name.to_string(),
                description: seed.description.to_string(),
                category: seed.category.to_string(),
                default_scores: FactorScores::new(seed.scores)?,
                guidance_text: seed.guidance.to_string(),
                created_at: now,
            };
            self.templates.insert(template)?;
        }
        info!(count = DEFAULT_TEMPLATES.len(), "default automation templates seeded");
        Ok(DEFAULT_TEMPLATES.len())
    }

    pub fn templates(&self) -> Result<Vec<AutomationTemplate>, AutomationServiceError> {
        Ok(self.templates.list()?)
    }

    /// Build a plan from the request and store it for `owner`.
    pub fn generate(
        &self,
        owner: &OwnerId,
        request: AutomationPlanRequest,
    ) -> Result<SavedRecommendation, AutomationServiceError> {
        let readings = FactorReadings::from_named(&request.factor_scores);
        let plan = automation_plan(request.process_name, request.current_score, &readings)
            .map_err(|error| {
                warn!(owner = %owner, %error, "automation plan rejected");
                error
            })?;

        let recommendation = SavedRecommendation {
            id: RecommendationId(RECOMMENDATION_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            plan,
            generated_for: owner.clone(),
            generated_at: Utc::now(),
        };
        let stored = self.recommendations.insert(recommendation)?;
        info!(
            recommendation_id = %stored.id,
            owner = %owner,
            current_score = stored.plan.current_score,
            suitability = stored.plan.suitability.key(),
            improvements = stored.plan.recommended_improvements.len(),
            "automation plan stored"
        );
        Ok(stored)
    }

    /// The owner's stored plans, newest first.
    pub fn recommendations(
        &self,
        owner: &OwnerId,
    ) -> Result<Vec<SavedRecommendation>, AutomationServiceError> {
        let mut recommendations = self.recommendations.list_by_owner(owner)?;
        sort_for_listing(&mut recommendations);
        Ok(recommendations)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AutomationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
