//! The visitor that walks a [`Policy`] and produces an [`EvaluationPlan`].

use std::sync::Arc;

use tracing::debug;

use crate::model::{AtomicConstraint, Constraint, Policy, Rule, RuleKind};
use crate::plan::{
    AtomicConstraintStep, ConstraintStep, DutyStep, EvaluationPlan, PermissionStep,
    ProhibitionStep, RuleFunctionStep, RuleStep, ValidatorStep,
};
use crate::registry::FunctionRegistry;
use crate::scope::Scope;
use crate::validator::{PolicyValidatorFunction, RuleValidator};

/// Walks a [`Policy`] tree and emits an [`EvaluationPlan`] describing, for
/// every rule and atomic constraint, which function (if any) would fire and
/// why anything that wouldn't was filtered out.
///
/// A `Planner` is built once (via [`crate::builder::PlannerBuilder`]) and is
/// immutable and reusable thereafter: `plan()` takes `&self` and mutates
/// nothing, so a single planner may be shared across threads calling
/// `plan()` concurrently on distinct policies, provided the injected
/// validator and registered functions are themselves `Send + Sync` (§5).
///
/// The rule context that atomic-constraint resolution needs (the enclosing
/// rule's kind) is threaded as an explicit parameter through every
/// recursive call rather than stored on a stack field (§9 REDESIGN); this
/// makes the "stack balance" invariant (§8, #6) hold by construction and
/// makes "atomic constraint with no enclosing rule" unrepresentable at the
/// type level rather than a runtime error to detect.
pub struct Planner {
    pub(crate) scope: Scope,
    pub(crate) validator: Arc<dyn RuleValidator>,
    pub(crate) registry: FunctionRegistry,
    pub(crate) pre_validators: Vec<Arc<dyn PolicyValidatorFunction>>,
    pub(crate) post_validators: Vec<Arc<dyn PolicyValidatorFunction>>,
}

impl Planner {
    /// Produces an evaluation plan for the given policy.
    ///
    /// Traversal order is permissions, then obligations, then prohibitions
    /// — this is the order the source design uses and is preserved
    /// verbatim even though "permissions, prohibitions, obligations" might
    /// read more naturally (§4.3 note, §9).
    #[must_use]
    pub fn plan(&self, policy: &Policy) -> EvaluationPlan {
        let pre_validators = self
            .pre_validators
            .iter()
            .cloned()
            .map(ValidatorStep::new)
            .collect();
        let post_validators = self
            .post_validators
            .iter()
            .cloned()
            .map(ValidatorStep::new)
            .collect();

        let permissions = policy
            .permissions
            .iter()
            .map(|rule| self.visit_permission(rule))
            .collect();
        let obligations = policy
            .obligations
            .iter()
            .map(|rule| self.visit_duty(rule))
            .collect();
        let prohibitions = policy
            .prohibitions
            .iter()
            .map(|rule| self.visit_prohibition(rule))
            .collect();

        EvaluationPlan {
            pre_validators,
            post_validators,
            permissions,
            obligations,
            prohibitions,
        }
    }

    fn visit_permission(&self, rule: &Rule) -> PermissionStep {
        let step = self.visit_rule(rule, RuleKind::Permission);
        let duties = rule.duties.iter().map(|duty| self.visit_duty(duty)).collect();
        PermissionStep { rule: step, duties }
    }

    fn visit_prohibition(&self, rule: &Rule) -> ProhibitionStep {
        ProhibitionStep {
            rule: self.visit_rule(rule, RuleKind::Prohibition),
        }
    }

    fn visit_duty(&self, rule: &Rule) -> DutyStep {
        DutyStep {
            rule: self.visit_rule(rule, RuleKind::Duty),
        }
    }

    fn visit_rule(&self, rule: &Rule, kind: RuleKind) -> RuleStep {
        let mut filtering_reasons = Vec::new();

        if let Some(action) = &rule.action {
            if !self.validator.is_bounded(action.action_type()) {
                debug!(
                    action = action.action_type(),
                    scope = self.scope.as_str(),
                    "rule filtered: action not bound to scope"
                );
                filtering_reasons.push(format!(
                    "action '{}' is not bound to scope '{}'",
                    action.action_type(),
                    self.scope.as_str()
                ));
            }
        }

        let rule_functions = self
            .registry
            .rule_functions_for(kind)
            .into_iter()
            .map(RuleFunctionStep::new)
            .collect();

        let constraints = rule
            .constraints
            .iter()
            .map(|constraint| self.visit_constraint(constraint, kind))
            .collect();

        RuleStep {
            action: rule.action.clone(),
            constraints,
            rule_functions,
            filtered: !filtering_reasons.is_empty(),
            filtering_reasons,
        }
    }

    fn visit_constraint(&self, constraint: &Constraint, kind: RuleKind) -> ConstraintStep {
        match constraint {
            Constraint::Atomic(atomic) => ConstraintStep::Atomic(self.visit_atomic_constraint(atomic, kind)),
            Constraint::And { children } => ConstraintStep::And {
                children: self.visit_constraint_children(children, kind),
            },
            Constraint::Or { children } => ConstraintStep::Or {
                children: self.visit_constraint_children(children, kind),
            },
            Constraint::Xone { children } => ConstraintStep::Xone {
                children: self.visit_constraint_children(children, kind),
            },
        }
    }

    fn visit_constraint_children(
        &self,
        children: &[Constraint],
        kind: RuleKind,
    ) -> Vec<ConstraintStep> {
        children
            .iter()
            .map(|child| self.visit_constraint(child, kind))
            .collect()
    }

    fn visit_atomic_constraint(&self, constraint: &AtomicConstraint, kind: RuleKind) -> AtomicConstraintStep {
        let left = constraint.left.value();
        let mut filtering_reasons = Vec::new();

        if !self.validator.is_in_scope(left, self.scope.delimited()) {
            filtering_reasons.push(format!(
                "leftOperand '{}' is not bound to scope '{}'",
                left,
                self.scope.as_str()
            ));
        }

        let function_name = self.registry.resolve_function_name(left, kind);
        if function_name.is_none() {
            filtering_reasons.push(format!(
                "leftOperand '{}' is not bound to any function within scope '{}'",
                left,
                self.scope.as_str()
            ));
        }

        AtomicConstraintStep {
            left: constraint.left.clone(),
            operator: constraint.operator.clone(),
            right: constraint.right.clone(),
            rule_kind: kind,
            function_name,
            filtering_reasons,
        }
    }
}
