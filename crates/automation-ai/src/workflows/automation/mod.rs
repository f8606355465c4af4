//! Automation templates and the per-user record of generated automation plans.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{
    AutomationPlanRequest, AutomationTemplate, RecommendationId, SavedRecommendation,
    TemplateId, TemplateView,
};
pub use repository::{RecommendationRepository, TemplateRepository};
pub use router::automation_router;
pub use service::{AutomationService, AutomationServiceError};
