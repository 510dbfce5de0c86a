//! End-to-end scenarios exercising the public planner API.

use std::collections::BTreeSet;
use std::sync::Arc;

use policy_planner::{
    Action, AtomicConstraint, Constraint, DynamicAtomicConstraintFunction, Policy,
    PlannerBuilder, RegisteredKind, Rule, RuleValidator,
};

#[derive(Debug, Default)]
struct SetValidator {
    in_scope_keys: BTreeSet<&'static str>,
    bounded_actions: BTreeSet<&'static str>,
}

impl RuleValidator for SetValidator {
    fn is_in_scope(&self, key: &str, _delimited_scope: &str) -> bool {
        self.in_scope_keys.contains(key)
    }

    fn is_bounded(&self, action_type: &str) -> bool {
        self.bounded_actions.contains(action_type)
    }
}

#[derive(Debug)]
struct NamedStaticFunction(&'static str);

impl policy_planner::AtomicConstraintFunction for NamedStaticFunction {
    fn name(&self) -> &str {
        self.0
    }
}

#[derive(Debug)]
struct NamedDynamicFunction {
    name: &'static str,
    handled_key: &'static str,
}

impl DynamicAtomicConstraintFunction for NamedDynamicFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn can_handle(&self, key: &str) -> bool {
        key == self.handled_key
    }
}

// S1: empty policy, no registrations -> empty plan.
#[test]
fn s1_empty_policy_yields_empty_plan() {
    let planner = PlannerBuilder::new()
        .scope("request.catalog")
        .validator(Arc::new(SetValidator::default()))
        .build()
        .unwrap();

    let plan = planner.plan(&Policy::new());

    assert!(plan.is_empty());
    assert!(plan.pre_validators.is_empty());
    assert!(plan.post_validators.is_empty());
}

// S2: static function resolves and the key is in scope -> no reasons.
#[test]
fn s2_static_function_in_scope_is_not_filtered() {
    let mut validator = SetValidator::default();
    validator.in_scope_keys.insert("k1");

    let planner = PlannerBuilder::new()
        .scope("s")
        .validator(Arc::new(validator))
        .register_static(
            "k1",
            RegisteredKind::Permission,
            Arc::new(NamedStaticFunction("f1")),
        )
        .build()
        .unwrap();

    let policy = Policy {
        permissions: vec![Rule::new().with_constraint(Constraint::Atomic(AtomicConstraint::new(
            "k1", "eq", "1",
        )))],
        ..Policy::new()
    };

    let plan = planner.plan(&policy);

    assert_eq!(plan.permissions.len(), 1);
    let permission = &plan.permissions[0];
    assert!(!permission.rule.filtered);
    assert_eq!(permission.rule.constraints.len(), 1);

    let policy_planner::ConstraintStep::Atomic(atomic) = &permission.rule.constraints[0] else {
        panic!("expected atomic constraint step");
    };
    assert_eq!(atomic.function_name.as_deref(), Some("f1"));
    assert!(atomic.filtering_reasons.is_empty());
}

// S3: same as S2 but the key is not in scope -> resolution still succeeds,
// but a scope-filtering reason is attached.
#[test]
fn s3_static_function_out_of_scope_is_filtered_but_still_resolved() {
    let planner = PlannerBuilder::new()
        .scope("s")
        .validator(Arc::new(SetValidator::default()))
        .register_static(
            "k1",
            RegisteredKind::Permission,
            Arc::new(NamedStaticFunction("f1")),
        )
        .build()
        .unwrap();

    let policy = Policy {
        permissions: vec![Rule::new().with_constraint(Constraint::Atomic(AtomicConstraint::new(
            "k1", "eq", "1",
        )))],
        ..Policy::new()
    };

    let plan = planner.plan(&policy);
    let permission = &plan.permissions[0];
    let policy_planner::ConstraintStep::Atomic(atomic) = &permission.rule.constraints[0] else {
        panic!("expected atomic constraint step");
    };

    assert_eq!(atomic.function_name.as_deref(), Some("f1"));
    assert_eq!(
        atomic.filtering_reasons,
        vec!["leftOperand 'k1' is not bound to scope 's'".to_string()]
    );
}

// S4: an action type that isn't bounded filters the whole rule.
#[test]
fn s4_unbounded_action_filters_rule() {
    let planner = PlannerBuilder::new()
        .scope("s")
        .validator(Arc::new(SetValidator::default()))
        .build()
        .unwrap();

    let policy = Policy {
        permissions: vec![Rule::new().with_action(Action::new("use"))],
        ..Policy::new()
    };

    let plan = planner.plan(&policy);
    let permission = &plan.permissions[0];

    assert!(permission.rule.filtered);
    assert_eq!(
        permission.rule.filtering_reasons,
        vec!["action 'use' is not bound to scope 's'".to_string()]
    );
}

// S5: a dynamic function registered against the abstract rule kind resolves
// for a prohibition even with no static registration.
#[test]
fn s5_dynamic_function_resolves_for_prohibition() {
    let planner = PlannerBuilder::new()
        .scope("s")
        .validator(Arc::new(SetValidator::default()))
        .register_dynamic(
            RegisteredKind::Any,
            Arc::new(NamedDynamicFunction {
                name: "dyn",
                handled_key: "k2",
            }),
        )
        .build()
        .unwrap();

    let policy = Policy {
        prohibitions: vec![Rule::new().with_constraint(Constraint::Atomic(AtomicConstraint::new(
            "k2", "eq", "1",
        )))],
        ..Policy::new()
    };

    let plan = planner.plan(&policy);
    let prohibition = &plan.prohibitions[0];
    let policy_planner::ConstraintStep::Atomic(atomic) = &prohibition.rule.constraints[0] else {
        panic!("expected atomic constraint step");
    };

    assert_eq!(atomic.function_name.as_deref(), Some("dyn"));
}

// S6: nested And/Or constraints preserve shape; every leaf with no
// registrations and an out-of-scope key carries both filtering reasons.
#[test]
fn s6_nested_constraints_preserve_shape_and_carry_both_reasons() {
    let planner = PlannerBuilder::new()
        .scope("s")
        .validator(Arc::new(SetValidator::default()))
        .build()
        .unwrap();

    let nested = Constraint::And {
        children: vec![
            Constraint::Atomic(AtomicConstraint::new("a", "eq", "1")),
            Constraint::Or {
                children: vec![
                    Constraint::Atomic(AtomicConstraint::new("b", "eq", "2")),
                    Constraint::Atomic(AtomicConstraint::new("c", "eq", "3")),
                ],
            },
        ],
    };

    let policy = Policy {
        permissions: vec![Rule::new().with_constraint(nested)],
        ..Policy::new()
    };

    let plan = planner.plan(&policy);
    let permission = &plan.permissions[0];

    let policy_planner::ConstraintStep::And { children: and_children } = &permission.rule.constraints[0] else {
        panic!("expected and constraint step");
    };
    assert_eq!(and_children.len(), 2);

    let policy_planner::ConstraintStep::Atomic(a) = &and_children[0] else {
        panic!("expected atomic constraint step for 'a'");
    };
    assert_eq!(a.filtering_reasons.len(), 2);

    let policy_planner::ConstraintStep::Or { children: or_children } = &and_children[1] else {
        panic!("expected or constraint step");
    };
    assert_eq!(or_children.len(), 2);
    for child in or_children {
        let policy_planner::ConstraintStep::Atomic(atomic) = child else {
            panic!("expected atomic constraint step");
        };
        assert_eq!(atomic.filtering_reasons.len(), 2);
        assert!(atomic.function_name.is_none());
    }
}

// Additional coverage: obligations are visited between permissions and
// prohibitions, and duties nested under a permission are planned too.
#[test]
fn traversal_order_is_permissions_then_obligations_then_prohibitions() {
    let planner = PlannerBuilder::new()
        .scope("s")
        .validator(Arc::new(SetValidator::default()))
        .build()
        .unwrap();

    let policy = Policy {
        permissions: vec![Rule::new().with_duty(Rule::new().with_action(Action::new("notify")))],
        obligations: vec![Rule::new().with_action(Action::new("report"))],
        prohibitions: vec![Rule::new().with_action(Action::new("delete"))],
    };

    let plan = planner.plan(&policy);

    assert_eq!(plan.permissions.len(), 1);
    assert_eq!(plan.permissions[0].duties.len(), 1);
    assert_eq!(
        plan.permissions[0].duties[0].rule.action.as_ref().unwrap().action_type(),
        "notify"
    );
    assert_eq!(plan.obligations.len(), 1);
    assert_eq!(plan.prohibitions.len(), 1);
}

// Determinism: two invocations of the same planner on equal policies
// produce equal plans.
#[test]
fn planner_is_deterministic() {
    let mut in_scope = SetValidator::default();
    in_scope.in_scope_keys.insert("k1");

    let planner = PlannerBuilder::new()
        .scope("s")
        .validator(Arc::new(in_scope))
        .register_static(
            "k1",
            RegisteredKind::Permission,
            Arc::new(NamedStaticFunction("f1")),
        )
        .build()
        .unwrap();

    let policy = Policy {
        permissions: vec![Rule::new().with_constraint(Constraint::Atomic(AtomicConstraint::new(
            "k1", "eq", "1",
        )))],
        ..Policy::new()
    };

    let first = planner.plan(&policy);
    let second = planner.plan(&policy);
    assert_eq!(first, second);
}
