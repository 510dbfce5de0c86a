//! Error types surfaced by planner construction.

use thiserror::Error;

/// Result alias used throughout the planner crate.
pub type PlannerResult<T> = std::result::Result<T, PlannerError>;

/// Errors that can occur while building a [`crate::planner::Planner`].
///
/// The planner itself (`Planner::plan`) is infallible once built: the only
/// fatal conditions this crate models are configuration mistakes caught at
/// `build()` time, before any policy is ever walked.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// `PlannerBuilder::build()` was called without a [`crate::validator::RuleValidator`].
    #[error("planner requires a rule validator to be registered before build()")]
    MissingValidator,

    /// `PlannerBuilder::build()` was called without a scope, or the scope was empty.
    #[error("planner requires a non-empty scope: {reason}")]
    InvalidScope {
        /// Human-readable reason the scope was rejected.
        reason: String,
    },
}
