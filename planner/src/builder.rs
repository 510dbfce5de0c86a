//! Construction-time configuration for a [`Planner`].

use std::sync::Arc;

use crate::error::{PlannerError, PlannerResult};
use crate::planner::Planner;
use crate::registry::{FunctionRegistry, RegisteredKind};
use crate::scope::Scope;
use crate::validator::{
    AtomicConstraintFunction, DynamicAtomicConstraintFunction, PolicyValidatorFunction,
    RulePolicyFunction, RuleValidator,
};

/// Collects a scope, a rule validator, pre/post policy-validator lists, and
/// function registrations, then yields an immutable [`Planner`].
///
/// Calling `build()` twice on an unchanged builder is not possible in this
/// API (`build()` consumes `self`), but constructing two planners from two
/// builders configured identically yields planners that produce equal
/// plans (§8, idempotent build) — the builder itself performs no
/// randomness or environment-dependent defaulting.
#[derive(Default)]
pub struct PlannerBuilder {
    scope: Option<String>,
    validator: Option<Arc<dyn RuleValidator>>,
    pre_validators: Vec<Arc<dyn PolicyValidatorFunction>>,
    post_validators: Vec<Arc<dyn PolicyValidatorFunction>>,
    registry: FunctionRegistry,
}

impl PlannerBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scope the resulting planner evaluates against.
    ///
    /// Validated for non-emptiness at [`Self::build`], not here, matching
    /// the "collect, validate once" pattern used for the rule validator.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the rule validator the planner consults at every leaf.
    #[must_use]
    pub fn validator(mut self, validator: Arc<dyn RuleValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Appends a validator run before policy evaluation.
    #[must_use]
    pub fn pre_validator(mut self, validator: Arc<dyn PolicyValidatorFunction>) -> Self {
        self.pre_validators.push(validator);
        self
    }

    /// Appends a validator run after policy evaluation.
    #[must_use]
    pub fn post_validator(mut self, validator: Arc<dyn PolicyValidatorFunction>) -> Self {
        self.post_validators.push(validator);
        self
    }

    /// Registers a static, exact-key atomic constraint function.
    #[must_use]
    pub fn register_static(
        mut self,
        key: impl Into<String>,
        kind: RegisteredKind,
        function: Arc<dyn AtomicConstraintFunction>,
    ) -> Self {
        self.registry.register_static(key, kind, function);
        self
    }

    /// Registers a dynamic, predicate-dispatched atomic constraint function.
    #[must_use]
    pub fn register_dynamic(
        mut self,
        kind: RegisteredKind,
        function: Arc<dyn DynamicAtomicConstraintFunction>,
    ) -> Self {
        self.registry.register_dynamic(kind, function);
        self
    }

    /// Registers a whole-rule function.
    #[must_use]
    pub fn register_rule(mut self, kind: RegisteredKind, function: Arc<dyn RulePolicyFunction>) -> Self {
        self.registry.register_rule(kind, function);
        self
    }

    /// Validates the collected configuration and yields an immutable planner.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::MissingValidator`] if no rule validator was
    /// registered, or [`PlannerError::InvalidScope`] if no scope was set or
    /// the scope was empty.
    pub fn build(self) -> PlannerResult<Planner> {
        let validator = self.validator.ok_or(PlannerError::MissingValidator)?;
        let scope = match self.scope {
            Some(value) => Scope::new(value)?,
            None => {
                return Err(PlannerError::InvalidScope {
                    reason: "scope was not set".into(),
                })
            }
        };

        Ok(Planner {
            scope,
            validator,
            registry: self.registry,
            pre_validators: self.pre_validators,
            post_validators: self.post_validators,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::test_support::FixedValidator;

    #[test]
    fn build_fails_without_validator() {
        let result = PlannerBuilder::new().scope("s").build();
        assert!(matches!(result, Err(PlannerError::MissingValidator)));
    }

    #[test]
    fn build_fails_without_scope() {
        let result = PlannerBuilder::new()
            .validator(Arc::new(FixedValidator::default()))
            .build();
        assert!(matches!(result, Err(PlannerError::InvalidScope { .. })));
    }

    #[test]
    fn build_succeeds_with_validator_and_scope() {
        let result = PlannerBuilder::new()
            .scope("s")
            .validator(Arc::new(FixedValidator::default()))
            .build();
        assert!(result.is_ok());
    }
}
