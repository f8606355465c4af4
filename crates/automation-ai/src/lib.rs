//! Process automation assessment engine.
//!
//! Assessments score a business process on six factors, the score engine derives a
//! suitability class and priority, reports aggregate assessments into a narrative and
//! export to CSV or PDF, and the insights layer adds suggestions, success predictions, and
//! similarity grouping on top. Automation templates and saved plans round it out.

pub mod config;
pub mod error;
pub mod identity;
pub mod telemetry;
pub mod workflows;
