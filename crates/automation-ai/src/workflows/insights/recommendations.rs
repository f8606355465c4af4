//! Rule-based improvement suggestions and automation plans.
//!
//! Both read the same four threshold rules; a factor that is absent from the request reads
//! as 0 and therefore fires its rule.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::workflows::assessments::scoring::validate_total;
use crate::workflows::assessments::{suitability_for_total, Factor, FactorScores, Priority, Suitability};
use crate::workflows::validation::{required_text, ValidationError};

pub const WELL_SUITED: &str = "Process is well-suited for automation as-is";

/// Factor values keyed by factor, as supplied by an insights request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FactorReadings {
    values: [Option<f64>; 6],
}

impl FactorReadings {
    /// Accepts `volume` as well as `volume_score`; unknown names are ignored.
    pub fn from_named(scores: &BTreeMap<String, f64>) -> Self {
        let mut readings = Self::default();
        for (name, value) in scores {
            if let Some(factor) = Factor::from_key(name) {
                readings.set(factor, *value);
            }
        }
        readings
    }

    pub fn from_scores(scores: &FactorScores) -> Self {
        let mut readings = Self::default();
        for factor in Factor::ordered() {
            readings.set(factor, f64::from(scores.get(factor)));
        }
        readings
    }

    pub fn set(&mut self, factor: Factor, value: f64) {
        self.values[factor.index()] = Some(value);
    }

    /// Value for `factor`, 0 when absent.
    pub fn get(&self, factor: Factor) -> f64 {
        self.values[factor.index()].unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

struct Rule {
    factor: Factor,
    label: &'static str,
    fires_below: f64,
    suggestion: &'static str,
    plan_improvement: &'static str,
    potential_improvement: &'static str,
    priority: fn(f64) -> Priority,
}

const RULES: [Rule; 4] = [
    Rule {
        factor: Factor::Repetitiveness,
        label: "Repetitiveness",
        fires_below: 4.0,
        suggestion: "Consider batching similar tasks or scheduling regular execution cycles",
        plan_improvement: "Consider batching similar tasks to increase repetitiveness score",
        potential_improvement: "+1-2 points",
        priority: repetitiveness_priority,
    },
    Rule {
        factor: Factor::RuleBased,
        label: "Rule-Based Logic",
        fires_below: 4.0,
        suggestion: "Document decision trees and business rules clearly",
        plan_improvement: "Document clear business rules and decision criteria",
        potential_improvement: "+1-2 points",
        priority: always_high,
    },
    Rule {
        factor: Factor::Complexity,
        label: "Complexity",
        fires_below: 3.0,
        suggestion: "Break process into smaller sub-processes or simplify exception handling",
        plan_improvement: "Break down complex process into smaller, simpler sub-processes",
        potential_improvement: "+1-3 points",
        priority: always_high,
    },
    Rule {
        factor: Factor::Standardization,
        label: "Standardization",
        fires_below: 4.0,
        suggestion: "Create templates and standardize input/output formats",
        plan_improvement: "Standardize input formats and output templates",
        potential_improvement: "+1-2 points",
        priority: always_medium,
    },
];

fn repetitiveness_priority(score: f64) -> Priority {
    if score < 3.0 {
        Priority::High
    } else {
        Priority::Medium
    }
}

fn always_high(_: f64) -> Priority {
    Priority::High
}

fn always_medium(_: f64) -> Priority {
    Priority::Medium
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub factor: Option<Factor>,
    pub factor_label: Option<&'static str>,
    pub current_score: Option<f64>,
    pub suggestion: &'static str,
    pub potential_improvement: Option<&'static str>,
    pub priority: Priority,
}

/// Suggestions in rule order. When no rule fires a single low-priority note is returned.
pub fn recommend(readings: &FactorReadings) -> Vec<Suggestion> {
    let suggestions: Vec<Suggestion> = RULES
        .iter()
        .filter_map(|rule| {
            let score = readings.get(rule.factor);
            (score < rule.fires_below).then(|| Suggestion {
                factor: Some(rule.factor),
                factor_label: Some(rule.label),
                current_score: Some(score),
                suggestion: rule.suggestion,
                potential_improvement: Some(rule.potential_improvement),
                priority: (rule.priority)(score),
            })
        })
        .collect();

    if suggestions.is_empty() {
        return vec![Suggestion {
            factor: None,
            factor_label: None,
            current_score: None,
            suggestion: WELL_SUITED,
            potential_improvement: None,
            priority: Priority::Low,
        }];
    }
    suggestions
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionBuckets {
    pub high: Vec<Suggestion>,
    pub medium: Vec<Suggestion>,
    pub low: Vec<Suggestion>,
}

impl SuggestionBuckets {
    /// Stable partition by priority.
    pub fn partition(suggestions: Vec<Suggestion>) -> Self {
        let mut buckets = Self::default();
        for suggestion in suggestions {
            match suggestion.priority {
                Priority::High => buckets.high.push(suggestion),
                Priority::Medium => buckets.medium.push(suggestion),
                Priority::Low => buckets.low.push(suggestion),
            }
        }
        buckets
    }

    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomationPlan {
    pub process_name: String,
    pub current_score: u8,
    pub suitability: Suitability,
    pub recommended_improvements: Vec<&'static str>,
    pub estimated_impact: &'static str,
    pub implementation_steps: Vec<&'static str>,
}

const HIGH_IMPACT_STEPS: [&str; 5] = [
    "1. Define automation requirements",
    "2. Select appropriate automation tools",
    "3. Develop automation solution",
    "4. Test and validate",
    "5. Deploy and monitor",
];

const MEDIUM_IMPACT_STEPS: [&str; 4] = [
    "1. Improve process standardization",
    "2. Document business rules",
    "3. Consider RPA or workflow automation",
    "4. Implement in phases",
];

const LOW_IMPACT_STEPS: [&str; 3] = [
    "1. Analyze if process is necessary",
    "2. Consider process redesign",
    "3. Focus on other high-value processes first",
];

/// Improvement list plus an impact tier keyed on the suitability of `current_score`.
pub fn automation_plan(
    process_name: Option<String>,
    current_score: Option<i64>,
    readings: &FactorReadings,
) -> Result<AutomationPlan, ValidationError> {
    let process_name = required_text("process_name", process_name, 200)?;
    let current_score = current_score.ok_or_else(|| ValidationError::missing("current_score"))?;
    let current_score = validate_total("current_score", current_score)?;

    let mut recommended_improvements: Vec<&'static str> = RULES
        .iter()
        .filter(|rule| readings.get(rule.factor) < rule.fires_below)
        .map(|rule| rule.plan_improvement)
        .collect();
    if recommended_improvements.is_empty() {
        recommended_improvements.push(WELL_SUITED);
    }

    let suitability = suitability_for_total(current_score);
    let (estimated_impact, implementation_steps) = match suitability {
        Suitability::HighlyAutomatable => (
            "High impact - immediate automation recommended",
            HIGH_IMPACT_STEPS.to_vec(),
        ),
        Suitability::PossiblyAutomatable => (
            "Medium impact - semi-automation or process improvement first",
            MEDIUM_IMPACT_STEPS.to_vec(),
        ),
        Suitability::NotSuitable => (
            "Low impact - keep manual or redesign process",
            LOW_IMPACT_STEPS.to_vec(),
        ),
    };

    Ok(AutomationPlan {
        process_name,
        current_score,
        suitability,
        recommended_improvements,
        estimated_impact,
        implementation_steps,
    })
}
