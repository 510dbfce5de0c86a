//! The tagged tree a [`crate::planner::Planner`] produces: an immutable,
//! read-only description of what evaluating a policy would do.
//!
//! Every node is plain data. None of these types perform logic beyond
//! constructing themselves; they exist to be walked by a renderer the
//! caller owns (§4.4, §6).

use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::model::{Action, Expression, RuleKind};
use crate::validator::{PolicyValidatorFunction, RulePolicyFunction};

/// A reference to a [`PolicyValidatorFunction`] wrapped for inclusion in a
/// plan. Carries no logic; equality is identity on the wrapped validator.
#[derive(Clone, Debug)]
pub struct ValidatorStep {
    validator: Arc<dyn PolicyValidatorFunction>,
}

impl ValidatorStep {
    pub(crate) fn new(validator: Arc<dyn PolicyValidatorFunction>) -> Self {
        Self { validator }
    }

    /// Returns the wrapped validator's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.validator.name()
    }
}

impl PartialEq for ValidatorStep {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.validator, &other.validator)
    }
}

impl Serialize for ValidatorStep {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ValidatorStep", 1)?;
        state.serialize_field("name", self.name())?;
        state.end()
    }
}

/// A reference to a [`RulePolicyFunction`] attached to a [`RuleStep`].
#[derive(Clone, Debug)]
pub struct RuleFunctionStep {
    function: Arc<dyn RulePolicyFunction>,
}

impl RuleFunctionStep {
    pub(crate) fn new(function: Arc<dyn RulePolicyFunction>) -> Self {
        Self { function }
    }

    /// Returns the wrapped rule function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.function.name()
    }
}

impl PartialEq for RuleFunctionStep {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.function, &other.function)
    }
}

impl Serialize for RuleFunctionStep {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("RuleFunctionStep", 1)?;
        state.serialize_field("name", self.name())?;
        state.end()
    }
}

/// A leaf `left OP right` constraint as it appears in the plan.
///
/// An absent `function_name` (the "unbound" sentinel) always carries at
/// least one filtering reason explaining why (§3 invariants).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AtomicConstraintStep {
    /// The constraint's left operand, whose value was used as a binding key.
    pub left: Expression,
    /// The constraint's operator, carried through unexamined.
    pub operator: String,
    /// The constraint's right operand, carried through unexamined.
    pub right: Expression,
    /// The kind of the rule this constraint was evaluated under.
    pub rule_kind: RuleKind,
    /// The name of the function that would fire, or absent if unbound.
    pub function_name: Option<String>,
    /// Human-readable reasons this constraint was filtered, if any.
    pub filtering_reasons: Vec<String>,
}

impl AtomicConstraintStep {
    /// Returns true if this constraint carries at least one filtering reason.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.filtering_reasons.is_empty()
    }
}

/// A constraint node in the plan: either a leaf or a logical combinator
/// over nested constraint steps, mirroring [`crate::model::Constraint`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintStep {
    /// A leaf constraint step.
    Atomic(AtomicConstraintStep),
    /// All children must hold.
    And {
        /// The combined constraint steps, in source order.
        children: Vec<ConstraintStep>,
    },
    /// At least one child must hold.
    Or {
        /// The combined constraint steps, in source order.
        children: Vec<ConstraintStep>,
    },
    /// Exactly one child must hold.
    Xone {
        /// The combined constraint steps, in source order.
        children: Vec<ConstraintStep>,
    },
}

/// The common shape shared by permission, prohibition, and duty steps.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleStep {
    /// The action this rule grants, forbids, or obliges, if any.
    pub action: Option<Action>,
    /// Constraint steps, in source order.
    pub constraints: Vec<ConstraintStep>,
    /// Rule functions that would fire for this rule, in registration order.
    pub rule_functions: Vec<RuleFunctionStep>,
    /// True iff `filtering_reasons` is non-empty (§3 invariant).
    pub filtered: bool,
    /// Human-readable reasons this rule was filtered, if any.
    pub filtering_reasons: Vec<String>,
}

/// A planned duty (obligation), either top-level or nested under a permission.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DutyStep {
    /// The underlying rule step.
    pub rule: RuleStep,
}

/// A planned prohibition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProhibitionStep {
    /// The underlying rule step.
    pub rule: RuleStep,
}

/// A planned permission, including its nested duties.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PermissionStep {
    /// The underlying rule step.
    pub rule: RuleStep,
    /// Duty steps nested under this permission, in source order.
    pub duties: Vec<DutyStep>,
}

/// The root of a planner run: a read-only tree mirroring the source
/// policy, with every rule and atomic constraint annotated with the
/// binding decision that would apply at evaluation time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationPlan {
    /// Validators run before policy evaluation, in registration order.
    pub pre_validators: Vec<ValidatorStep>,
    /// Validators run after policy evaluation, in registration order.
    pub post_validators: Vec<ValidatorStep>,
    /// Planned permissions, in source order.
    pub permissions: Vec<PermissionStep>,
    /// Planned prohibitions, in source order.
    pub prohibitions: Vec<ProhibitionStep>,
    /// Planned top-level obligations, in source order.
    pub obligations: Vec<DutyStep>,
}

impl EvaluationPlan {
    /// Returns true if the plan contains no permissions, prohibitions, or
    /// obligations (disregarding validators).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.prohibitions.is_empty() && self.obligations.is_empty()
    }
}
