use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Category, CategoryId, CategoryInput};
use super::repository::CategoryRepository;
use crate::workflows::assessments::RepositoryError;
use crate::workflows::validation::ValidationError;

/// Shared process categories. Any authenticated user may list or add them.
pub struct CategoryService<S> {
    repository: Arc<S>,
}

static CATEGORY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl<S> CategoryService<S>
where
    S: CategoryRepository + 'static,
{
    pub fn new(repository: Arc<S>) -> Self {
        Self { repository }
    }

    pub fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        Ok(self.repository.list()?)
    }

    pub fn create(&self, input: CategoryInput) -> Result<Category, CategoryServiceError> {
        let draft = input.validate().map_err(|error| {
            warn!(%error, "category rejected");
            error
        })?;
        let category = Category {
            id: CategoryId(CATEGORY_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            name: draft.name,
            description: draft.description,
            color: draft.color,
            created_at: Utc::now(),
        };
        let stored = self.repository.insert(category)?;
        info!(category_id = %stored.id, name = %stored.name, "category created");
        Ok(stored)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
