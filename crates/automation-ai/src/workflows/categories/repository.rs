use super::domain::Category;
use crate::workflows::assessments::RepositoryError;

pub trait CategoryRepository: Send + Sync {
    fn insert(&self, category: Category) -> Result<Category, RepositoryError>;
    /// All categories in insertion order.
    fn list(&self) -> Result<Vec<Category>, RepositoryError>;
}
