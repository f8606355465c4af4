use automation_ai::identity::OwnerId;
use automation_ai::workflows::assessments::{
    Assessment, AssessmentId, AssessmentRepository, RepositoryError,
};
use automation_ai::workflows::automation::{
    AutomationTemplate, RecommendationId, RecommendationRepository, SavedRecommendation,
    TemplateId, TemplateRepository,
};
use automation_ai::workflows::categories::{Category, CategoryId, CategoryRepository};
use automation_ai::workflows::insights::{AnalysisId, AnalysisRecord, AnalysisRepository};
use automation_ai::workflows::reports::{Report, ReportId, ReportRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local storage backing every workflow. Maps are keyed by id so listings come
/// back in creation order before the services apply their own sorting.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStore {
    assessments: Arc<Mutex<BTreeMap<AssessmentId, Assessment>>>,
    reports: Arc<Mutex<BTreeMap<ReportId, Report>>>,
    analyses: Arc<Mutex<BTreeMap<AnalysisId, AnalysisRecord>>>,
    categories: Arc<Mutex<BTreeMap<CategoryId, Category>>>,
    templates: Arc<Mutex<BTreeMap<TemplateId, AutomationTemplate>>>,
    recommendations: Arc<Mutex<BTreeMap<RecommendationId, SavedRecommendation>>>,
}

impl AssessmentRepository for InMemoryStore {
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
        if guard.contains_key(&assessment.id) {
            guard.insert(assessment.id, assessment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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

impl ReportRepository for InMemoryStore {
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
        if guard.contains_key(&report.id) {
            guard.insert(report.id, report);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
        let mut changed = 0;
        for report in guard.values_mut() {
            if &report.generated_by == owner && report.detach(assessment) {
                changed += 1;
            }
        }
        Ok(changed)
    }
}

impl AnalysisRepository for InMemoryStore {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut guard = self.analyses.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
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

impl CategoryRepository for InMemoryStore {
    fn insert(&self, category: Category) -> Result<Category, RepositoryError> {
        let mut guard = self.categories.lock().expect("repository mutex poisoned");
        if guard.contains_key(&category.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(category.id, category.clone());
        Ok(category)
    }

    fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let guard = self.categories.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

impl TemplateRepository for InMemoryStore {
    fn insert(&self, template: AutomationTemplate) -> Result<AutomationTemplate, RepositoryError> {
        let mut guard = self.templates.lock().expect("repository mutex poisoned");
        if guard.contains_key(&template.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(template.id, template.clone());
        Ok(template)
    }

    fn list(&self) -> Result<Vec<AutomationTemplate>, RepositoryError> {
        let guard = self.templates.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

impl RecommendationRepository for InMemoryStore {
    fn insert(
        &self,
        recommendation: SavedRecommendation,
    ) -> Result<SavedRecommendation, RepositoryError> {
        let mut guard = self.recommendations.lock().expect("repository mutex poisoned");
        if guard.contains_key(&recommendation.id) {
            return Err(RepositoryError::Conflict);
        }
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

/// Parse `r,rb,c,v,s,e` into six raw factor values.
pub(crate) fn parse_scores(raw: &str) -> Result<Vec<i64>, String> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|err| format!("'{}' is not an integer score ({err})", part.trim()))
        })
        .collect()
}
