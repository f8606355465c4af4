use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregation::SuitabilityCounts;
use super::domain::{Report, ReportId};
use crate::workflows::assessments::Assessment;

pub const EMPTY_CONCLUSION: &str = "No processes have been assessed yet.";

/// Narrative summary over the suitability counts of a report.
pub fn compose_conclusion(counts: &SuitabilityCounts) -> String {
    let total = counts.total();
    if total == 0 {
        return EMPTY_CONCLUSION.to_string();
    }

    let high = counts.highly_automatable;
    let possible = counts.possibly_automatable;
    let manual = counts.not_suitable;
    let share = high as f64 / total as f64 * 100.0;

    format!(
        "Based on this assessment, {high} processes are highly automatable, {possible} are partially automatable, and {manual} should remain manual.\n\
         \n\
         Prioritization should focus on high-impact areas to maximize efficiency and cost savings.\n\
         \n\
         Key Recommendations:\n\
         - Immediately implement automation for highly automatable processes ({high}/{total} = {share:.1}%)\n\
         - Consider semi-automation for processes with medium scores\n\
         - Continue manual operations for complex processes requiring human judgment\n\
         \n\
         Expected Benefits:\n\
         - Reduced manual errors and processing time\n\
         - Improved consistency and standardization\n\
         - Cost savings through reduced labor requirements\n\
         - Enhanced employee satisfaction by eliminating repetitive tasks"
    )
}

/// Everything an exporter needs to render a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub report_id: ReportId,
    pub title: String,
    pub description: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub assessments: Vec<Assessment>,
    pub counts: SuitabilityCounts,
    pub conclusion: String,
}

impl ReportDocument {
    /// Members are kept in the order given; only the stored conclusion is used.
    pub fn compose(report: &Report, members: Vec<Assessment>, generated_at: DateTime<Utc>) -> Self {
        let counts = SuitabilityCounts::from_assessments(&members);
        Self {
            report_id: report.id,
            title: report.title.clone(),
            description: report.description.clone(),
            generated_at,
            assessments: members,
            counts,
            conclusion: report.conclusion.clone(),
        }
    }

    pub fn has_conclusion(&self) -> bool {
        !self.conclusion.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_counts_produce_placeholder() {
        assert_eq!(
            compose_conclusion(&SuitabilityCounts::default()),
            EMPTY_CONCLUSION
        );
    }

    #[test]
    fn conclusion_embeds_counts_and_share() {
        let counts = SuitabilityCounts {
            highly_automatable: 2,
            possibly_automatable: 1,
            not_suitable: 0,
        };
        let conclusion = compose_conclusion(&counts);

        assert!(conclusion.starts_with(
            "Based on this assessment, 2 processes are highly automatable, 1 are partially automatable, and 0 should remain manual."
        ));
        assert!(conclusion.contains("(2/3 = 66.7%)"));
        assert!(conclusion.contains("\n\nKey Recommendations:\n"));
        assert!(conclusion.ends_with("eliminating repetitive tasks"));
    }

    #[test]
    fn conclusion_is_stable_for_equal_counts() {
        let counts = SuitabilityCounts {
            highly_automatable: 0,
            possibly_automatable: 4,
            not_suitable: 4,
        };
        assert_eq!(compose_conclusion(&counts), compose_conclusion(&counts));
        assert!(compose_conclusion(&counts).contains("(0/8 = 0.0%)"));
    }
}
