//! Expiration risk scoring and consumption prioritization.
//!
//! Everything here is pure: callers pass the evaluation instant, so the same
//! inputs always yield the same assessment.

pub mod calculator;
pub mod dto;
pub mod priority;
pub mod tables;

pub use calculator::calculate_expiration_risk;
pub use dto::{ExpirationRisk, RiskLevel};
pub use priority::calculate_all_risks;
