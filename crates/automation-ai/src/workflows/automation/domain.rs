use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::identity::OwnerId;
use crate::workflows::assessments::{FactorScores, Suitability};
use crate::workflows::insights::AutomationPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub u64);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Starting point for a common scenario: suggested factor scores plus guidance.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationTemplate {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub default_scores: FactorScores,
    pub guidance_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateView {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub default_repetitiveness: u8,
    pub default_rule_based: u8,
    pub default_complexity: u8,
    pub default_volume: u8,
    pub default_standardization: u8,
    pub default_current_errors: u8,
    pub default_total_score: u8,
    pub default_suitability: Suitability,
    pub guidance_text: String,
    pub created_at: DateTime<Utc>,
}

impl AutomationTemplate {
    pub fn view(&self) -> TemplateView {
        let [repetitiveness, rule_based, complexity, volume, standardization, current_errors] =
            self.default_scores.values();
        let classification = self.default_scores.classify();
        TemplateView {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            default_repetitiveness: repetitiveness,
            default_rule_based: rule_based,
            default_complexity: complexity,
            default_volume: volume,
            default_standardization: standardization,
            default_current_errors: current_errors,
            default_total_score: classification.total_score,
            default_suitability: classification.suitability,
            guidance_text: self.guidance_text.clone(),
            created_at: self.created_at,
        }
    }
}

/// Built-in template content, seeded into an empty template store.
pub(crate) struct TemplateSeed {
    pub(crate) name: &'static str,
    pub(crate) description: &'static str,
    pub(crate) category: &'static str,
    pub(crate) scores: [i64; 6],
    pub(crate) guidance: &'static str,
}

pub(crate) const DEFAULT_TEMPLATES: [TemplateSeed; 4] = [
    TemplateSeed {
        name: "Invoice Processing",
        description: "Capture supplier invoices, match them to purchase orders and post them.",
        category: "Finance",
        scores: [5, 5, 4, 5, 4, 4],
        guidance: "Score volume on monthly invoice counts. Exceptions such as missing POs \
                   lower the rule-based score.",
    },
    TemplateSeed {
        name: "Employee Onboarding",
        description: "Provision accounts, equipment and paperwork for new starters.",
        category: "Human Resources",
        scores: [4, 4, 3, 3, 3, 3],
        guidance: "Steps that differ by role lower standardization. Automate the common \
                   checklist first.",
    },
    TemplateSeed {
        name: "Customer Support Triage",
        description: "Classify incoming tickets and route them to the right queue.",
        category: "Customer Service",
        scores: [4, 3, 2, 5, 3, 3],
        guidance: "Free-text requests make rules fuzzy. Score complexity on how often \
                   agents need judgement to route a ticket.",
    },
    TemplateSeed {
        name: "Contract Negotiation",
        description: "Draft, redline and agree commercial terms with counterparties.",
        category: "Legal",
        scores: [1, 2, 1, 1, 1, 2],
        guidance: "Mostly judgement work. Look for automatable fragments such as clause \
                   lookup instead of the whole process.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecommendationId(pub u64);

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of `POST /api/v1/automation/recommendations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutomationPlanRequest {
    #[serde(default)]
    pub process_name: Option<String>,
    #[serde(default)]
    pub current_score: Option<i64>,
    #[serde(default)]
    pub factor_scores: BTreeMap<String, f64>,
}

/// A generated plan kept for the user who asked for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedRecommendation {
    pub id: RecommendationId,
    #[serde(flatten)]
    pub plan: AutomationPlan,
    pub generated_for: OwnerId,
    pub generated_at: DateTime<Utc>,
}
