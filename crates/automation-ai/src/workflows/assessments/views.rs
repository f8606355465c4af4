use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Assessment, AssessmentId, ImplementationEffort, Priority, Suitability};
use crate::identity::OwnerId;
use crate::workflows::money::Money;

/// Full assessment payload returned by create, detail, and update endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub id: AssessmentId,
    pub process_name: String,
    pub description: Option<String>,
    pub department: Option<String>,
    pub process_owner: Option<String>,
    pub repetitiveness_score: u8,
    pub repetitiveness_remarks: Option<String>,
    pub rule_based_score: u8,
    pub rule_based_remarks: Option<String>,
    pub complexity_score: u8,
    pub complexity_remarks: Option<String>,
    pub volume_score: u8,
    pub volume_remarks: Option<String>,
    pub standardization_score: u8,
    pub standardization_remarks: Option<String>,
    pub current_errors_score: u8,
    pub current_errors_remarks: Option<String>,
    pub total_score: u8,
    pub automation_suitability: Suitability,
    pub automation_suitability_display: &'static str,
    pub priority: Priority,
    pub priority_display: &'static str,
    pub recommendation: &'static str,
    pub estimated_cost_savings: Option<Money>,
    pub estimated_time_savings: Option<f64>,
    pub implementation_effort: Option<ImplementationEffort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_effort_display: Option<&'static str>,
    pub assessed_by: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Condensed row used by list endpoints and report membership.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummaryView {
    pub id: AssessmentId,
    pub process_name: String,
    pub department: Option<String>,
    pub total_score: u8,
    pub automation_suitability: Suitability,
    pub automation_suitability_display: &'static str,
    pub priority: Priority,
    pub priority_display: &'static str,
    pub assessed_by: OwnerId,
    pub created_at: DateTime<Utc>,
}

impl Assessment {
    pub fn view(&self) -> AssessmentView {
        let [repetitiveness, rule_based, complexity, volume, standardization, current_errors] =
            self.factors().values();
        let remarks = self.remarks.clone();

        AssessmentView {
            id: self.id,
            process_name: self.process_name.clone(),
            description: self.description.clone(),
            department: self.department.clone(),
            process_owner: self.process_owner.clone(),
            repetitiveness_score: repetitiveness,
            repetitiveness_remarks: remarks.repetitiveness,
            rule_based_score: rule_based,
            rule_based_remarks: remarks.rule_based,
            complexity_score: complexity,
            complexity_remarks: remarks.complexity,
            volume_score: volume,
            volume_remarks: remarks.volume,
            standardization_score: standardization,
            standardization_remarks: remarks.standardization,
            current_errors_score: current_errors,
            current_errors_remarks: remarks.current_errors,
            total_score: self.total_score(),
            automation_suitability: self.suitability(),
            automation_suitability_display: self.suitability().label(),
            priority: self.priority(),
            priority_display: self.priority().label(),
            recommendation: self.recommendation(),
            estimated_cost_savings: self.estimated_cost_savings,
            estimated_time_savings: self.estimated_time_savings,
            implementation_effort: self.implementation_effort,
            implementation_effort_display: self.implementation_effort.map(ImplementationEffort::label),
            assessed_by: self.assessed_by.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn summary_view(&self) -> AssessmentSummaryView {
        AssessmentSummaryView {
            id: self.id,
            process_name: self.process_name.clone(),
            department: self.department.clone(),
            total_score: self.total_score(),
            automation_suitability: self.suitability(),
            automation_suitability_display: self.suitability().label(),
            priority: self.priority(),
            priority_display: self.priority().label(),
            assessed_by: self.assessed_by.clone(),
            created_at: self.created_at,
        }
    }
}
