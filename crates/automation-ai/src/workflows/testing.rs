//! Fixtures and an in-memory store shared by the workflow unit tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::identity::OwnerId;
use crate::workflows::assessments::{
    Assessment, AssessmentId, AssessmentInput, AssessmentRepository, RepositoryError,
};
use crate::workflows::automation::{
    AutomationTemplate, RecommendationId, RecommendationRepository, SavedRecommendation,
    TemplateId, TemplateRepository,
};
use crate::workflows::categories::{Category, CategoryId, CategoryRepository};
use crate::workflows::insights::{AnalysisId, AnalysisRecord, AnalysisRepository};
use crate::workflows::reports::{Report, ReportDocument, ReportId, ReportRepository};

pub(crate) fn owner(name: &str) -> OwnerId {
    OwnerId(name.to_string())
}

pub(crate) fn input(name: &str, scores: [i64; 6]) -> AssessmentInput {
    AssessmentInput {
        process_name: Some(name.to_string()),
        department: Some("Finance".to_string()),
        repetitiveness_score: Some(scores[0]),
        rule_based_score: Some(scores[1]),
        complexity_score: Some(scores[2]),
        volume_score: Some(scores[3]),
        standardization_score: Some(scores[4]),
        current_errors_score: Some(scores[5]),
        ..AssessmentInput::default()
    }
}

/// Stored assessment with a deterministic timestamp derived from the id.
pub(crate) fn assessment(id: u64, owner_name: &str, name: &str, scores: [i64; 6]) -> Assessment {
    let draft = input(name, scores).validate().expect("fixture scores are valid");
    let created = Utc
        .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(id as i64);
    Assessment::new(AssessmentId(id), owner(owner_name), draft, created)
}

pub(crate) fn report_document(title: &str, members: Vec<Assessment>) -> ReportDocument {
    let report = Report {
        id: ReportId(1),
        title: title.to_string(),
        description: None,
        assessment_ids: members.iter().map(|member| member.id).collect(),
        conclusion: String::new(),
        generated_by: owner("analyst"),
        created_at: Utc
            .with_ymd_and_hms(2025, 3, 2, 14, 30, 0)
            .single()
            .expect("valid timestamp"),
    };
    let generated_at = report.created_at;
    ReportDocument::compose(&report, members, generated_at)
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(crate) struct MemoryStore {
    pub(crate) assessments: Arc<Mutex<BTreeMap<AssessmentId, Assessment>>>,
    pub(crate) reports: Arc<Mutex<BTreeMap<ReportId, Report>>>,
    pub(crate) analyses: Arc<Mutex<BTreeMap<AnalysisId, AnalysisRecord>>>,
    pub(crate) categories: Arc<Mutex<BTreeMap<CategoryId, Category>>>,
    pub(crate) templates: Arc<Mutex<BTreeMap<TemplateId, AutomationTemplate>>>,
    pub(crate) recommendations: Arc<Mutex<BTreeMap<RecommendationId, SavedRecommendation>>>,
}

impl AssessmentRepository for MemoryStore {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.assessments.lock().expect("repository mutex poisoned");
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id, assessment.clone());
        Ok(assessment)
    }

    fn insert_all(&self, assessments: Vec<Assessment>) -> Result<Vec<Assessment>, RepositoryError> {
        let mut guard = self.assessments.lock().expect("repository mutex poisoned");
        if assessments.iter().any(|item| guard.contains_key(&item.id)) {
            return Err(RepositoryError::Conflict);
        }
        for assessment in &assessments {
            guard.insert(assessment.id, assessment.clone());
        }
        Ok(assessments)
    }

    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut guard = self.assessments.lock().expect("repository mutex poisoned");
        guard.insert(assessment.id, assessment);
        Ok(())
    }

    fn fetch(&self, id: AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.assessments.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.assessments.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|assessment| &assessment.assessed_by == owner)
            .cloned()
            .collect())
    }

    fn delete(&self, id: AssessmentId) -> Result<(), RepositoryError> {
        let mut guard = self.assessments.lock().expect("repository mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

impl ReportRepository for MemoryStore {
    fn insert(&self, report: Report) -> Result<Report, RepositoryError> {
        let mut guard = self.reports.lock().expect("repository mutex poisoned");
        if guard.contains_key(&report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(report.id, report.clone());
        Ok(report)
    }

    fn update(&self, report: Report) -> Result<(), RepositoryError> {
        let mut guard = self.reports.lock().expect("repository mutex poisoned");
        guard.insert(report.id, report);
        Ok(())
    }

    fn fetch(&self, id: ReportId) -> Result<Option<Report>, RepositoryError> {
        let guard = self.reports.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Report>, RepositoryError> {
        let guard = self.reports.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|report| &report.generated_by == owner)
            .cloned()
            .collect())
    }

    fn delete(&self, id: ReportId) -> Result<(), RepositoryError> {
        let mut guard = self.reports.lock().expect("repository mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn detach_assessment(
        &self,
        owner: &OwnerId,
        assessment: AssessmentId,
    ) -> Result<usize, RepositoryError> {
        let mut guard = self.reports.lock().expect("repository mutex poisoned");
        Ok(guard
            .values_mut()
            .filter(|report| &report.generated_by == owner)
            .filter_map(|report| report.detach(assessment).then_some(()))
            .count())
    }
}

impl AnalysisRepository for MemoryStore {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut guard = self.analyses.lock().expect("repository mutex poisoned");
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let guard = self.analyses.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.owner == owner)
            .cloned()
            .collect())
    }
}

impl CategoryRepository for MemoryStore {
    fn insert(&self, category: Category) -> Result<Category, RepositoryError> {
        let mut guard = self.categories.lock().expect("repository mutex poisoned");
        guard.insert(category.id, category.clone());
        Ok(category)
    }

    fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let guard = self.categories.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

impl TemplateRepository for MemoryStore {
    fn insert(&self, template: AutomationTemplate) -> Result<AutomationTemplate, RepositoryError> {
        let mut guard = self.templates.lock().expect("repository mutex poisoned");
        guard.insert(template.id, template.clone());
        Ok(template)
    }

    fn list(&self) -> Result<Vec<AutomationTemplate>, RepositoryError> {
        let guard = self.templates.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

impl RecommendationRepository for MemoryStore {
    fn insert(
        &self,
        recommendation: SavedRecommendation,
    ) -> Result<SavedRecommendation, RepositoryError> {
        let mut guard = self.recommendations.lock().expect("repository mutex poisoned");
        guard.insert(recommendation.id, recommendation.clone());
        Ok(recommendation)
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<SavedRecommendation>, RepositoryError> {
        let guard = self.recommendations.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|recommendation| &recommendation.generated_for == owner)
            .cloned()
            .collect())
    }
}

/// Store whose every call fails, for exercising internal-error paths.
pub(crate) struct UnavailableStore;

impl AssessmentRepository for UnavailableStore {
    fn insert(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_all(&self, _assessments: Vec<Assessment>) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _assessment: Assessment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_by_owner(&self, _owner: &OwnerId) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: AssessmentId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
