//! Business workflows. Each workflow owns its domain types, a storage trait, a service
//! and an axum router.

pub mod assessments;
pub mod automation;
pub mod categories;
pub mod insights;
pub mod money;
pub mod reports;
pub mod validation;

pub(crate) mod responses;

#[cfg(test)]
pub(crate) mod testing;
