//! Deterministic factor scoring.
//!
//! The total is the plain sum of the six factors. Breakpoints: totals up to 10 are not
//! suitable (low priority), 11 through 20 are possibly automatable (medium), and 21 or
//! more are highly automatable (high). Downstream tiers (automation plans, report counts)
//! reuse [`suitability_for_total`] so every part of the system agrees on them.

use serde::{Deserialize, Serialize};

use super::domain::{FactorScores, Priority, Suitability};
use crate::workflows::validation::ValidationError;

pub const MIN_FACTOR_SCORE: i64 = 1;
pub const MAX_FACTOR_SCORE: i64 = 5;
pub const MIN_TOTAL_SCORE: i64 = 6;
pub const MAX_TOTAL_SCORE: i64 = 30;

/// Highest total still classified as not suitable.
pub const NOT_SUITABLE_MAX_TOTAL: u8 = 10;
/// Highest total still classified as possibly automatable.
pub const POSSIBLY_AUTOMATABLE_MAX_TOTAL: u8 = 20;

/// Derived fields persisted alongside the factor scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub total_score: u8,
    pub suitability: Suitability,
    pub priority: Priority,
}

/// Classify six raw factor values.
pub fn classify(factors: &[i64]) -> Result<Classification, ValidationError> {
    FactorScores::from_slice(factors).map(|scores| classify_scores(&scores))
}

pub(crate) fn classify_scores(scores: &FactorScores) -> Classification {
    let total_score: u8 = scores.values().iter().sum();
    let suitability = suitability_for_total(total_score);
    Classification {
        total_score,
        suitability,
        priority: suitability.priority(),
    }
}

pub const fn suitability_for_total(total: u8) -> Suitability {
    if total <= NOT_SUITABLE_MAX_TOTAL {
        Suitability::NotSuitable
    } else if total <= POSSIBLY_AUTOMATABLE_MAX_TOTAL {
        Suitability::PossiblyAutomatable
    } else {
        Suitability::HighlyAutomatable
    }
}

/// Validate an externally supplied total (six factors in [1, 5]).
pub fn validate_total(field: &str, total: i64) -> Result<u8, ValidationError> {
    if !(MIN_TOTAL_SCORE..=MAX_TOTAL_SCORE).contains(&total) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: total,
            min: MIN_TOTAL_SCORE,
            max: MAX_TOTAL_SCORE,
        });
    }
    Ok(total as u8)
}
