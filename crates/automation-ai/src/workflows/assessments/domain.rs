use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::scoring::{self, Classification};
use crate::identity::OwnerId;
use crate::workflows::money::Money;
use crate::workflows::validation::{
    hundredths, normalize_optional, optional_text, required_text, ValidationError,
};

pub const PROCESS_NAME_MAX_CHARS: usize = 200;
pub const DEPARTMENT_MAX_CHARS: usize = 100;
pub const PROCESS_OWNER_MAX_CHARS: usize = 100;
/// Hours per week, up to 999999.99.
const TIME_SAVINGS_MAX_DIGITS: u32 = 8;

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub u64);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The six dimensions every process is rated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Repetitiveness,
    RuleBased,
    Complexity,
    Volume,
    Standardization,
    CurrentErrors,
}

impl Factor {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Repetitiveness,
            Self::RuleBased,
            Self::Complexity,
            Self::Volume,
            Self::Standardization,
            Self::CurrentErrors,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Repetitiveness => "repetitiveness",
            Self::RuleBased => "rule_based",
            Self::Complexity => "complexity",
            Self::Volume => "volume",
            Self::Standardization => "standardization",
            Self::CurrentErrors => "current_errors",
        }
    }

    /// Name of the score field in request and response payloads.
    pub const fn score_field(self) -> &'static str {
        match self {
            Self::Repetitiveness => "repetitiveness_score",
            Self::RuleBased => "rule_based_score",
            Self::Complexity => "complexity_score",
            Self::Volume => "volume_score",
            Self::Standardization => "standardization_score",
            Self::CurrentErrors => "current_errors_score",
        }
    }

    /// Column label used by exports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Repetitiveness => "Repetitiveness",
            Self::RuleBased => "Rule-Based",
            Self::Complexity => "Complexity",
            Self::Volume => "Volume",
            Self::Standardization => "Standardization",
            Self::CurrentErrors => "Error Rate",
        }
    }

    /// Parse a factor name, accepting both `volume` and `volume_score`.
    pub fn from_key(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        let key = normalized.strip_suffix("_score").unwrap_or(normalized.as_str());
        Self::ordered()
            .into_iter()
            .find(|factor| factor.key() == key)
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Repetitiveness => 0,
            Self::RuleBased => 1,
            Self::Complexity => 2,
            Self::Volume => 3,
            Self::Standardization => 4,
            Self::CurrentErrors => 5,
        }
    }
}

/// Six validated factor ratings, each within [1, 5].
///
/// Construction always goes through validation so a value of this type can be
/// classified without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorScores {
    repetitiveness: u8,
    rule_based: u8,
    complexity: u8,
    volume: u8,
    standardization: u8,
    current_errors: u8,
}

impl FactorScores {
    pub fn new(values: [i64; 6]) -> Result<Self, ValidationError> {
        for (factor, value) in Factor::ordered().into_iter().zip(values) {
            if !(scoring::MIN_FACTOR_SCORE..=scoring::MAX_FACTOR_SCORE).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field: factor.score_field().to_string(),
                    value,
                    min: scoring::MIN_FACTOR_SCORE,
                    max: scoring::MAX_FACTOR_SCORE,
                });
            }
        }

        // Range checked above, so the narrowing is lossless.
        let [repetitiveness, rule_based, complexity, volume, standardization, current_errors] =
            values.map(|value| value as u8);

        Ok(Self {
            repetitiveness,
            rule_based,
            complexity,
            volume,
            standardization,
            current_errors,
        })
    }

    pub fn from_slice(values: &[i64]) -> Result<Self, ValidationError> {
        let array: [i64; 6] = values
            .try_into()
            .map_err(|_| ValidationError::FactorCount {
                expected: 6,
                actual: values.len(),
            })?;
        Self::new(array)
    }

    pub fn get(&self, factor: Factor) -> u8 {
        self.values()[factor.index()]
    }

    pub fn values(&self) -> [u8; 6] {
        [
            self.repetitiveness,
            self.rule_based,
            self.complexity,
            self.volume,
            self.standardization,
            self.current_errors,
        ]
    }

    pub fn classify(&self) -> Classification {
        scoring::classify_scores(self)
    }
}

/// Free-text notes recorded next to each factor rating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorRemarks {
    pub repetitiveness: Option<String>,
    pub rule_based: Option<String>,
    pub complexity: Option<String>,
    pub volume: Option<String>,
    pub standardization: Option<String>,
    pub current_errors: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    NotSuitable,
    PossiblyAutomatable,
    HighlyAutomatable,
}

impl Suitability {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::NotSuitable,
            Self::PossiblyAutomatable,
            Self::HighlyAutomatable,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::NotSuitable => "not_suitable",
            Self::PossiblyAutomatable => "possibly_automatable",
            Self::HighlyAutomatable => "highly_automatable",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotSuitable => "Not Suitable for Automation",
            Self::PossiblyAutomatable => "Possibly Automatable",
            Self::HighlyAutomatable => "Highly Automatable",
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::NotSuitable => {
                "Process is too complex, infrequent, or rule-ambiguous. Keep it manual."
            }
            Self::PossiblyAutomatable => {
                "Process has some potential for automation, but may require human intervention. Consider semi-automation."
            }
            Self::HighlyAutomatable => {
                "Process is repetitive, rule-based, and structured\u{2014}ideal for full automation!"
            }
        }
    }

    pub const fn priority(self) -> Priority {
        match self {
            Self::NotSuitable => Priority::Low,
            Self::PossiblyAutomatable => Priority::Medium,
            Self::HighlyAutomatable => Priority::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationEffort {
    Low,
    Medium,
    High,
}

impl ImplementationEffort {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low (1-2 weeks)",
            Self::Medium => "Medium (1-2 months)",
            Self::High => "High (3+ months)",
        }
    }
}

/// Raw assessment payload as submitted by a client.
///
/// Derived fields (`total_score`, `automation_suitability`, `priority`) are not part of the
/// payload; they are computed by the score engine on every write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    #[serde(default)]
    pub process_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub process_owner: Option<String>,
    #[serde(default)]
    pub repetitiveness_score: Option<i64>,
    #[serde(default)]
    pub repetitiveness_remarks: Option<String>,
    #[serde(default)]
    pub rule_based_score: Option<i64>,
    #[serde(default)]
    pub rule_based_remarks: Option<String>,
    #[serde(default)]
    pub complexity_score: Option<i64>,
    #[serde(default)]
    pub complexity_remarks: Option<String>,
    #[serde(default)]
    pub volume_score: Option<i64>,
    #[serde(default)]
    pub volume_remarks: Option<String>,
    #[serde(default)]
    pub standardization_score: Option<i64>,
    #[serde(default)]
    pub standardization_remarks: Option<String>,
    #[serde(default)]
    pub current_errors_score: Option<i64>,
    #[serde(default)]
    pub current_errors_remarks: Option<String>,
    #[serde(default)]
    pub estimated_cost_savings: Option<f64>,
    #[serde(default)]
    pub estimated_time_savings: Option<f64>,
    #[serde(default)]
    pub implementation_effort: Option<ImplementationEffort>,
}

impl AssessmentInput {
    pub fn validate(self) -> Result<AssessmentDraft, ValidationError> {
        let process_name = required_text(
            "process_name",
            self.process_name,
            PROCESS_NAME_MAX_CHARS,
        )?;

        let raw_scores = [
            self.repetitiveness_score,
            self.rule_based_score,
            self.complexity_score,
            self.volume_score,
            self.standardization_score,
            self.current_errors_score,
        ];
        let mut values = [0_i64; 6];
        for ((slot, raw), factor) in values.iter_mut().zip(raw_scores).zip(Factor::ordered()) {
            *slot = raw.ok_or_else(|| ValidationError::missing(factor.score_field()))?;
        }
        let factors = FactorScores::new(values)?;

        let estimated_cost_savings =
            Money::parse("estimated_cost_savings", self.estimated_cost_savings)?;
        let estimated_time_savings = hundredths(
            "estimated_time_savings",
            self.estimated_time_savings,
            TIME_SAVINGS_MAX_DIGITS,
        )?
        .map(|hundredths| hundredths as f64 / 100.0);

        Ok(AssessmentDraft {
            process_name,
            description: normalize_optional(self.description),
            department: optional_text("department", self.department, DEPARTMENT_MAX_CHARS)?,
            process_owner: optional_text(
                "process_owner",
                self.process_owner,
                PROCESS_OWNER_MAX_CHARS,
            )?,
            factors,
            remarks: FactorRemarks {
                repetitiveness: normalize_optional(self.repetitiveness_remarks),
                rule_based: normalize_optional(self.rule_based_remarks),
                complexity: normalize_optional(self.complexity_remarks),
                volume: normalize_optional(self.volume_remarks),
                standardization: normalize_optional(self.standardization_remarks),
                current_errors: normalize_optional(self.current_errors_remarks),
            },
            estimated_cost_savings,
            estimated_time_savings,
            implementation_effort: self.implementation_effort,
        })
    }
}

impl AssessmentInput {
    /// Payload that would recreate `assessment` as stored.
    pub fn from_assessment(assessment: &Assessment) -> Self {
        let [repetitiveness, rule_based, complexity, volume, standardization, current_errors] =
            assessment.factors.values().map(i64::from);
        let remarks = assessment.remarks.clone();
        Self {
            process_name: Some(assessment.process_name.clone()),
            description: assessment.description.clone(),
            department: assessment.department.clone(),
            process_owner: assessment.process_owner.clone(),
            repetitiveness_score: Some(repetitiveness),
            repetitiveness_remarks: remarks.repetitiveness,
            rule_based_score: Some(rule_based),
            rule_based_remarks: remarks.rule_based,
            complexity_score: Some(complexity),
            complexity_remarks: remarks.complexity,
            volume_score: Some(volume),
            volume_remarks: remarks.volume,
            standardization_score: Some(standardization),
            standardization_remarks: remarks.standardization,
            current_errors_score: Some(current_errors),
            current_errors_remarks: remarks.current_errors,
            estimated_cost_savings: assessment.estimated_cost_savings.map(Money::as_f64),
            estimated_time_savings: assessment.estimated_time_savings,
            implementation_effort: assessment.implementation_effort,
        }
    }

    /// Overlay the fields present in `patch`. Absent fields keep their current value.
    pub fn overlay(self, patch: AssessmentInput) -> Self {
        Self {
            process_name: patch.process_name.or(self.process_name),
            description: patch.description.or(self.description),
            department: patch.department.or(self.department),
            process_owner: patch.process_owner.or(self.process_owner),
            repetitiveness_score: patch.repetitiveness_score.or(self.repetitiveness_score),
            repetitiveness_remarks: patch.repetitiveness_remarks.or(self.repetitiveness_remarks),
            rule_based_score: patch.rule_based_score.or(self.rule_based_score),
            rule_based_remarks: patch.rule_based_remarks.or(self.rule_based_remarks),
            complexity_score: patch.complexity_score.or(self.complexity_score),
            complexity_remarks: patch.complexity_remarks.or(self.complexity_remarks),
            volume_score: patch.volume_score.or(self.volume_score),
            volume_remarks: patch.volume_remarks.or(self.volume_remarks),
            standardization_score: patch.standardization_score.or(self.standardization_score),
            standardization_remarks: patch
                .standardization_remarks
                .or(self.standardization_remarks),
            current_errors_score: patch.current_errors_score.or(self.current_errors_score),
            current_errors_remarks: patch.current_errors_remarks.or(self.current_errors_remarks),
            estimated_cost_savings: patch.estimated_cost_savings.or(self.estimated_cost_savings),
            estimated_time_savings: patch.estimated_time_savings.or(self.estimated_time_savings),
            implementation_effort: patch.implementation_effort.or(self.implementation_effort),
        }
    }
}

/// Validated assessment content, ready to be stored or applied to an existing record.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentDraft {
    pub process_name: String,
    pub description: Option<String>,
    pub department: Option<String>,
    pub process_owner: Option<String>,
    pub factors: FactorScores,
    pub remarks: FactorRemarks,
    pub estimated_cost_savings: Option<Money>,
    pub estimated_time_savings: Option<f64>,
    pub implementation_effort: Option<ImplementationEffort>,
}

/// Stored assessment. Factor scores and the derived classification are private so they
/// can only change together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub process_name: String,
    pub description: Option<String>,
    pub department: Option<String>,
    pub process_owner: Option<String>,
    factors: FactorScores,
    pub remarks: FactorRemarks,
    classification: Classification,
    pub estimated_cost_savings: Option<Money>,
    pub estimated_time_savings: Option<f64>,
    pub implementation_effort: Option<ImplementationEffort>,
    pub assessed_by: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    pub fn new(
        id: AssessmentId,
        assessed_by: OwnerId,
        draft: AssessmentDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let classification = draft.factors.classify();
        Self {
            id,
            process_name: draft.process_name,
            description: draft.description,
            department: draft.department,
            process_owner: draft.process_owner,
            factors: draft.factors,
            remarks: draft.remarks,
            classification,
            estimated_cost_savings: draft.estimated_cost_savings,
            estimated_time_savings: draft.estimated_time_savings,
            implementation_effort: draft.implementation_effort,
            assessed_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable content and recompute the classification.
    pub fn apply(&mut self, draft: AssessmentDraft, now: DateTime<Utc>) {
        self.classification = draft.factors.classify();
        self.process_name = draft.process_name;
        self.description = draft.description;
        self.department = draft.department;
        self.process_owner = draft.process_owner;
        self.factors = draft.factors;
        self.remarks = draft.remarks;
        self.estimated_cost_savings = draft.estimated_cost_savings;
        self.estimated_time_savings = draft.estimated_time_savings;
        self.implementation_effort = draft.implementation_effort;
        self.updated_at = now;
    }

    pub fn factors(&self) -> &FactorScores {
        &self.factors
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn total_score(&self) -> u8 {
        self.classification.total_score
    }

    pub fn suitability(&self) -> Suitability {
        self.classification.suitability
    }

    pub fn priority(&self) -> Priority {
        self.classification.priority
    }

    pub fn recommendation(&self) -> &'static str {
        self.classification.suitability.recommendation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(scores: [i64; 6]) -> AssessmentInput {
        AssessmentInput {
            process_name: Some("  Invoice matching ".to_string()),
            department: Some("Finance".to_string()),
            repetitiveness_score: Some(scores[0]),
            rule_based_score: Some(scores[1]),
            complexity_score: Some(scores[2]),
            volume_score: Some(scores[3]),
            standardization_score: Some(scores[4]),
            current_errors_score: Some(scores[5]),
            estimated_cost_savings: Some(1200.0),
            ..AssessmentInput::default()
        }
    }

    #[test]
    fn validate_trims_name_and_keeps_scores() {
        let draft = input([5, 4, 4, 3, 5, 2]).validate().expect("valid input");
        assert_eq!(draft.process_name, "Invoice matching");
        assert_eq!(draft.factors.values(), [5, 4, 4, 3, 5, 2]);
        assert_eq!(draft.factors.get(Factor::Volume), 3);
    }

    #[test]
    fn validate_names_the_missing_score() {
        let mut payload = input([3; 6]);
        payload.complexity_score = None;
        let error = payload.validate().expect_err("missing score");
        assert_eq!(error.field().as_deref(), Some("complexity_score"));
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        let error = input([3, 3, 3, 6, 3, 3]).validate().expect_err("out of range");
        assert_eq!(
            error,
            ValidationError::OutOfRange {
                field: "volume_score".to_string(),
                value: 6,
                min: 1,
                max: 5,
            }
        );
    }

    #[test]
    fn validate_bounds_department_and_owner() {
        let mut payload = input([3; 6]);
        payload.department = Some("d".repeat(DEPARTMENT_MAX_CHARS + 1));
        let error = payload.validate().expect_err("department too long");
        assert_eq!(error.field().as_deref(), Some("department"));

        let mut payload = input([3; 6]);
        payload.process_owner = Some("o".repeat(PROCESS_OWNER_MAX_CHARS + 1));
        let error = payload.validate().expect_err("owner too long");
        assert_eq!(error.field().as_deref(), Some("process_owner"));

        let mut payload = input([3; 6]);
        payload.process_owner = Some("o".repeat(PROCESS_OWNER_MAX_CHARS));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn validate_stores_savings_in_cents() {
        let mut payload = input([3; 6]);
        payload.estimated_cost_savings = Some(0.1);
        payload.estimated_time_savings = Some(2.5);
        let draft = payload.validate().expect("valid");
        assert_eq!(draft.estimated_cost_savings, Some(Money::from_cents(10)));
        assert_eq!(draft.estimated_time_savings, Some(2.5));

        let mut payload = input([3; 6]);
        payload.estimated_cost_savings = Some(12.345);
        let error = payload.validate().expect_err("sub-cent amount");
        assert_eq!(error.field().as_deref(), Some("estimated_cost_savings"));

        let mut payload = input([3; 6]);
        payload.estimated_time_savings = Some(1_000_000.0);
        let error = payload.validate().expect_err("too many digits");
        assert_eq!(error.field().as_deref(), Some("estimated_time_savings"));
    }

    #[test]
    fn apply_recomputes_classification() {
        let now = Utc::now();
        let draft = input([2, 2, 2, 2, 1, 1]).validate().expect("valid");
        let mut assessment =
            Assessment::new(AssessmentId(1), OwnerId("a".to_string()), draft, now);
        assert_eq!(assessment.total_score(), 10);
        assert_eq!(assessment.suitability(), Suitability::NotSuitable);

        let raised = input([5, 5, 5, 5, 5, 5]).validate().expect("valid");
        assessment.apply(raised, now);
        assert_eq!(assessment.total_score(), 30);
        assert_eq!(assessment.priority(), Priority::High);
    }

    #[test]
    fn overlay_only_replaces_present_fields() {
        let now = Utc::now();
        let draft = input([3; 6]).validate().expect("valid");
        let assessment = Assessment::new(AssessmentId(9), OwnerId("a".to_string()), draft, now);

        let patched = AssessmentInput::from_assessment(&assessment).overlay(AssessmentInput {
            volume_score: Some(5),
            ..AssessmentInput::default()
        });

        assert_eq!(patched.process_name.as_deref(), Some("Invoice matching"));
        assert_eq!(patched.volume_score, Some(5));
        assert_eq!(patched.rule_based_score, Some(3));
        assert_eq!(patched.estimated_cost_savings, Some(1200.0));
    }

    #[test]
    fn factor_keys_accept_score_suffix() {
        assert_eq!(Factor::from_key("rule_based_score"), Some(Factor::RuleBased));
        assert_eq!(Factor::from_key(" Volume "), Some(Factor::Volume));
        assert_eq!(Factor::from_key("throughput"), None);
    }
}
