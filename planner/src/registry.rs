//! The function registry: three overlapping collections of bindings the
//! planner consults to resolve, for a given left-operand key and rule kind,
//! which function (if any) would fire at evaluation time.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use crate::model::RuleKind;
use crate::validator::{AtomicConstraintFunction, DynamicAtomicConstraintFunction, RulePolicyFunction};

/// The rule-kind bound a registration is made against.
///
/// `Any` is the sentinel for "registered against the abstract rule kind":
/// it matches every concrete [`RuleKind`]. This is a closed enum rather
/// than an open type hierarchy (§9 REDESIGN: assignability checks collapse
/// to `registered == Any || registered == actual`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RegisteredKind {
    /// Matches any rule kind.
    Any,
    /// Matches only [`RuleKind::Permission`].
    Permission,
    /// Matches only [`RuleKind::Prohibition`].
    Prohibition,
    /// Matches only [`RuleKind::Duty`].
    Duty,
}

impl RegisteredKind {
    /// Returns true if this registered bound is assignable from `actual`,
    /// i.e. a registration made with this bound would fire for a rule of
    /// kind `actual`.
    #[must_use]
    pub fn assignable_from(self, actual: RuleKind) -> bool {
        match (self, actual) {
            (Self::Any, _) => true,
            (Self::Permission, RuleKind::Permission) => true,
            (Self::Prohibition, RuleKind::Prohibition) => true,
            (Self::Duty, RuleKind::Duty) => true,
            _ => false,
        }
    }
}

impl From<RuleKind> for RegisteredKind {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::Permission => Self::Permission,
            RuleKind::Prohibition => Self::Prohibition,
            RuleKind::Duty => Self::Duty,
        }
    }
}

type StaticEntry = (RegisteredKind, Arc<dyn AtomicConstraintFunction>);
type DynamicEntry = (RegisteredKind, Arc<dyn DynamicAtomicConstraintFunction>);
type RuleEntry = (RegisteredKind, Arc<dyn RulePolicyFunction>);

/// Holds the three indexed collections of function bindings a [`crate::planner::Planner`]
/// consults while walking a policy.
///
/// Registrations are write-once: `register_*` only appends. Re-registering
/// under an existing key never overwrites a prior entry; both live, but
/// resolution always returns the first match (§4.2, tie-break policy).
#[derive(Default)]
pub struct FunctionRegistry {
    static_fns: BTreeMap<String, Vec<StaticEntry>>,
    dynamic_fns: Vec<DynamicEntry>,
    rule_fns: Vec<RuleEntry>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a static, exact-key function binding.
    pub fn register_static(
        &mut self,
        key: impl Into<String>,
        kind: RegisteredKind,
        function: Arc<dyn AtomicConstraintFunction>,
    ) {
        self.static_fns
            .entry(key.into())
            .or_default()
            .push((kind, function));
    }

    /// Appends a dynamic, predicate-dispatched function binding.
    pub fn register_dynamic(&mut self, kind: RegisteredKind, function: Arc<dyn DynamicAtomicConstraintFunction>) {
        self.dynamic_fns.push((kind, function));
    }

    /// Appends a whole-rule function binding.
    pub fn register_rule(&mut self, kind: RegisteredKind, function: Arc<dyn RulePolicyFunction>) {
        self.rule_fns.push((kind, function));
    }

    /// Resolves the function that would fire for `key` under a rule of kind
    /// `rule_kind`.
    ///
    /// Static entries are tried first, in insertion order, then dynamic
    /// entries. The first match wins; later matching entries are never
    /// considered even if also applicable (§4.2).
    #[must_use]
    pub fn resolve_function_name(&self, key: &str, rule_kind: RuleKind) -> Option<String> {
        if let Some(entries) = self.static_fns.get(key) {
            for (bound, function) in entries {
                if bound.assignable_from(rule_kind) {
                    trace!(key, name = function.name(), "resolved static function");
                    return Some(function.name().to_string());
                }
            }
        }

        for (bound, function) in &self.dynamic_fns {
            if bound.assignable_from(rule_kind) && function.can_handle(key) {
                trace!(key, name = function.name(), "resolved dynamic function");
                return Some(function.name().to_string());
            }
        }

        None
    }

    /// Returns all rule-function entries whose registered kind is
    /// assignable from `rule_kind`, in registration order.
    #[must_use]
    pub fn rule_functions_for(&self, rule_kind: RuleKind) -> Vec<Arc<dyn RulePolicyFunction>> {
        self.rule_fns
            .iter()
            .filter(|(bound, _)| bound.assignable_from(rule_kind))
            .map(|(_, function)| Arc::clone(function))
            .collect()
    }
}
