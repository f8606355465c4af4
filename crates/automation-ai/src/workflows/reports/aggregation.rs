use serde::Serialize;

use crate::workflows::assessments::{Assessment, Suitability};
use crate::workflows::money::Money;

/// Number of assessments in each suitability class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuitabilityCounts {
    pub highly_automatable: usize,
    pub possibly_automatable: usize,
    pub not_suitable: usize,
}

impl SuitabilityCounts {
    pub fn from_assessments<'a, I>(assessments: I) -> Self
    where
        I: IntoIterator<Item = &'a Assessment>,
    {
        let mut counts = Self::default();
        for assessment in assessments {
            counts.record(assessment.suitability());
        }
        counts
    }

    pub fn record(&mut self, suitability: Suitability) {
        match suitability {
            Suitability::HighlyAutomatable => self.highly_automatable += 1,
            Suitability::PossiblyAutomatable => self.possibly_automatable += 1,
            Suitability::NotSuitable => self.not_suitable += 1,
        }
    }

    pub fn get(&self, suitability: Suitability) -> usize {
        match suitability {
            Suitability::HighlyAutomatable => self.highly_automatable,
            Suitability::PossiblyAutomatable => self.possibly_automatable,
            Suitability::NotSuitable => self.not_suitable,
        }
    }

    pub fn total(&self) -> usize {
        self.highly_automatable + self.possibly_automatable + self.not_suitable
    }

    /// Counts in `Suitability::ordered()` order.
    pub fn as_array(&self) -> [usize; 3] {
        Suitability::ordered().map(|suitability| self.get(suitability))
    }
}

/// Dashboard-style roll-up of a set of assessments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AssessmentSummary {
    pub total_processes: usize,
    #[serde(flatten)]
    pub counts: SuitabilityCounts,
    pub average_score: f64,
    pub total_estimated_savings: Money,
}

/// Aggregate assessments. An empty input yields the all-zero summary.
///
/// The average divides by the number of scored assessments; savings sum only the
/// assessments that carry an estimate, exactly, in cents.
pub fn aggregate(assessments: &[Assessment]) -> AssessmentSummary {
    let counts = SuitabilityCounts::from_assessments(assessments);

    let scored = assessments.len();
    let score_sum: u64 = assessments
        .iter()
        .map(|assessment| u64::from(assessment.total_score()))
        .sum();
    let average_score = if scored == 0 {
        0.0
    } else {
        score_sum as f64 / scored as f64
    };

    let total_estimated_savings = assessments
        .iter()
        .filter_map(|assessment| assessment.estimated_cost_savings)
        .sum();

    AssessmentSummary {
        total_processes: assessments.len(),
        counts,
        average_score,
        total_estimated_savings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::testing::assessment;

    #[test]
    fn empty_input_is_all_zero() {
        let summary = aggregate(&[]);
        assert_eq!(summary, AssessmentSummary::default());
        assert_eq!(summary.counts.as_array(), [0, 0, 0]);
    }

    #[test]
    fn counts_average_and_savings() {
        let mut saver = assessment(1, "analyst", "Saver", [5, 5, 5, 5, 5, 5]);
        saver.estimated_cost_savings = Some(Money::from_cents(250_000));
        let mut modest = assessment(2, "analyst", "Modest", [3, 3, 3, 3, 3, 3]);
        modest.estimated_cost_savings = Some(Money::from_cents(50_025));
        let manual = assessment(3, "analyst", "Manual", [1, 1, 1, 1, 1, 1]);

        let summary = aggregate(&[saver, modest, manual]);

        assert_eq!(summary.total_processes, 3);
        assert_eq!(summary.counts.as_array(), [1, 1, 1]);
        assert_eq!(summary.counts.total(), 3);
        assert!((summary.average_score - 18.0).abs() < f64::EPSILON);
        assert_eq!(summary.total_estimated_savings, Money::from_cents(300_025));
    }

    #[test]
    fn savings_do_not_pick_up_float_residue() {
        let mut first = assessment(1, "analyst", "First", [3; 6]);
        first.estimated_cost_savings = Money::parse("estimated_cost_savings", Some(0.1))
            .expect("valid amount");
        let mut second = assessment(2, "analyst", "Second", [3; 6]);
        second.estimated_cost_savings = Money::parse("estimated_cost_savings", Some(0.2))
            .expect("valid amount");

        let summary = aggregate(&[first, second]);

        assert_eq!(summary.total_estimated_savings, Money::from_cents(30));
        let value = serde_json::to_value(summary).expect("serialise");
        assert_eq!(value["total_estimated_savings"], 0.3);
        assert_eq!(value["total_estimated_savings"].to_string(), "0.3");
    }

    #[test]
    fn summary_serialises_flat() {
        let summary = aggregate(&[assessment(1, "analyst", "Only", [4, 4, 4, 4, 4, 4])]);
        let value = serde_json::to_value(summary).expect("serialise");
        assert_eq!(value["total_processes"], 1);
        assert_eq!(value["highly_automatable"], 1);
        assert_eq!(value["average_score"], 24.0);
    }
}
