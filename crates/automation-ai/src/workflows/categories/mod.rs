//! Process categories.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{
    Category, CategoryDraft, CategoryId, CategoryInput, CategoryView, CATEGORY_NAME_MAX_CHARS,
    DEFAULT_COLOR,
};
pub use repository::CategoryRepository;
pub use router::category_router;
pub use service::{CategoryService, CategoryServiceError};
