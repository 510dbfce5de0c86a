//! Dry-run evaluation planning for ODRL-style authorization policies.
//!
//! Given a [`Policy`] and a [`Scope`], a [`Planner`] produces an
//! [`EvaluationPlan`]: a read-only tree mirroring the policy's structure
//! that records, for every rule and atomic constraint, which function (if
//! any) would fire at evaluation time and why anything unbound was
//! filtered out. The planner never executes a constraint, never mutates
//! the policy, and never resolves a left operand's value — it only
//! describes what evaluation *would* do.
//!
//! Construct a planner with [`PlannerBuilder`], then call
//! [`Planner::plan`] as many times as needed; a built planner is immutable
//! and safe to reuse across policies.

#![warn(missing_docs, clippy::pedantic)]

mod builder;
mod error;
mod model;
mod plan;
mod planner;
mod registry;
mod scope;
mod validator;

pub use builder::PlannerBuilder;
pub use error::{PlannerError, PlannerResult};
pub use model::{Action, AtomicConstraint, Constraint, Expression, Policy, Rule, RuleKind};
pub use plan::{
    AtomicConstraintStep, ConstraintStep, DutyStep, EvaluationPlan, PermissionStep,
    ProhibitionStep, RuleFunctionStep, RuleStep, ValidatorStep,
};
pub use planner::Planner;
pub use registry::{FunctionRegistry, RegisteredKind};
pub use scope::{Scope, SCOPE_DELIMITER};
pub use validator::{
    AtomicConstraintFunction, DynamicAtomicConstraintFunction, PolicyValidatorFunction,
    RulePolicyFunction, RuleValidator,
};
