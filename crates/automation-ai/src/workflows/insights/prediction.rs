use std::collections::BTreeMap;

use serde::Serialize;

use super::recommendations::FactorReadings;
use crate::workflows::assessments::Factor;
use crate::workflows::validation::ValidationError;

/// Confidence reported alongside every prediction, in percent.
pub const PREDICTION_CONFIDENCE: u8 = 85;

const HIGH_SUCCESS_FLOOR: f64 = 80.0;
const GOOD_SUCCESS_FLOOR: f64 = 60.0;

fn weight(factor: Factor) -> f64 {
    match factor {
        Factor::Repetitiveness => 0.20,
        Factor::RuleBased => 0.25,
        Factor::Complexity => 0.15,
        Factor::Volume => 0.15,
        Factor::Standardization => 0.15,
        Factor::CurrentErrors => 0.10,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessPrediction {
    /// Percentage in [0, 100], rounded to one decimal.
    pub success_probability: f64,
    pub recommendation: &'static str,
    pub risk_factors: Vec<&'static str>,
    pub confidence: u8,
}

/// Weighted success estimate. Absent factors weigh in at 0; an empty mapping is rejected.
pub fn predict_success(scores: &BTreeMap<String, f64>) -> Result<SuccessPrediction, ValidationError> {
    if scores.is_empty() {
        return Err(ValidationError::missing("scores"));
    }
    Ok(predict_from_readings(&FactorReadings::from_named(scores)))
}

pub fn predict_from_readings(readings: &FactorReadings) -> SuccessPrediction {
    let weighted: f64 = Factor::ordered()
        .into_iter()
        .map(|factor| readings.get(factor) * weight(factor))
        .sum();
    let probability = (weighted / 5.0 * 100.0).min(100.0);

    // Tiers compare the unrounded value.
    let (recommendation, risk_factors) = if probability >= HIGH_SUCCESS_FLOOR {
        ("High success probability - proceed with automation", Vec::new())
    } else if probability >= GOOD_SUCCESS_FLOOR {
        (
            "Good success probability - consider pilot implementation",
            vec![
                "Monitor complexity during implementation",
                "Ensure stakeholder buy-in",
            ],
        )
    } else {
        (
            "Lower success probability - improve process first",
            vec![
                "Address process standardization",
                "Clarify business rules",
                "Reduce complexity",
            ],
        )
    };

    SuccessPrediction {
        success_probability: (probability * 10.0).round() / 10.0,
        recommendation,
        risk_factors,
        confidence: PREDICTION_CONFIDENCE,
    }
}
