//! The policy tree the planner consumes.
//!
//! This module is deliberately thin: policy parsing and serialization are
//! owned by the caller (§1, Out of scope). These types describe the shape a
//! caller must hand the planner, not a parser for any particular policy
//! language.

use serde::{Deserialize, Serialize};

/// The three closed rule kinds a policy can carry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// A rule that grants an action, optionally carrying duties.
    Permission,
    /// A rule that forbids an action.
    Prohibition,
    /// An obligation, either top-level or nested under a permission.
    Duty,
}

/// A left- or right-hand operand of an atomic constraint.
///
/// The planner only ever reads `.value()` on the *left* operand (to resolve
/// a binding key); the right operand is carried through to the plan
/// unexamined, for a renderer to display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    value: String,
}

impl Expression {
    /// Creates an expression wrapping the given string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the string form of this expression, used as a binding key
    /// when the expression appears as a constraint's left operand.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Expression {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// The action an enclosing rule grants, forbids, or obliges.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Action {
    action_type: String,
}

impl Action {
    /// Creates an action with the given type string.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
        }
    }

    /// Returns the action's type string.
    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }
}

/// A single `left OP right` leaf constraint.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AtomicConstraint {
    /// The operand whose string value is resolved against the function registry.
    pub left: Expression,
    /// The comparison operator, carried through unexamined.
    pub operator: String,
    /// The operand compared against, carried through unexamined.
    pub right: Expression,
}

impl AtomicConstraint {
    /// Creates a new atomic constraint.
    pub fn new(
        left: impl Into<Expression>,
        operator: impl Into<String>,
        right: impl Into<Expression>,
    ) -> Self {
        Self {
            left: left.into(),
            operator: operator.into(),
            right: right.into(),
        }
    }
}

/// A constraint attached to a rule: either a leaf or a logical combinator
/// over nested constraints.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// A leaf `left OP right` constraint.
    Atomic(AtomicConstraint),
    /// All children must hold.
    And {
        /// The combined constraints, in source order.
        children: Vec<Constraint>,
    },
    /// At least one child must hold.
    Or {
        /// The combined constraints, in source order.
        children: Vec<Constraint>,
    },
    /// Exactly one child must hold.
    Xone {
        /// The combined constraints, in source order.
        children: Vec<Constraint>,
    },
}

/// A permission, prohibition, or duty within a policy.
///
/// `duties` is only meaningful when the rule appears in a policy's
/// `permissions` list; the planner ignores it elsewhere.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// The action this rule grants, forbids, or obliges, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    /// Constraints attached to this rule, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Duty sub-rules, populated only for permissions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duties: Vec<Rule>,
}

impl Rule {
    /// Creates a rule with no action, constraints, or duties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an action to this rule.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Appends a constraint in source order.
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Appends a duty sub-rule in source order.
    #[must_use]
    pub fn with_duty(mut self, duty: Rule) -> Self {
        self.duties.push(duty);
        self
    }
}

/// A complete policy: ordered permissions, prohibitions, and obligations.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Permission rules, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Rule>,
    /// Prohibition rules, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prohibitions: Vec<Rule>,
    /// Top-level obligation (duty) rules, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub obligations: Vec<Rule>,
}

impl Policy {
    /// Creates an empty policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_value_round_trips() {
        let expr = Expression::new("k1");
        assert_eq!(expr.value(), "k1");
    }

    #[test]
    fn rule_builder_preserves_order() {
        let rule = Rule::new()
            .with_action(Action::new("use"))
            .with_constraint(Constraint::Atomic(AtomicConstraint::new("a", "eq", "1")))
            .with_constraint(Constraint::Atomic(AtomicConstraint::new("b", "eq", "2")));

        assert_eq!(rule.action.unwrap().action_type(), "use");
        assert_eq!(rule.constraints.len(), 2);
    }
}
