//! Injected collaborator interfaces: the rule validator and the opaque
//! function types the planner records but never invokes.

use std::fmt;

/// Oracle that tells the planner whether a key or action type is bound to
/// the active scope.
///
/// Implementations are injected by the caller; the planner never
/// constructs one itself and never catches a panic unwinding out of one
/// (§4.1).
pub trait RuleValidator: fmt::Debug + Send + Sync {
    /// Returns true if `key` is bound to the scope identified by
    /// `delimited_scope` (`scope + "."`).
    fn is_in_scope(&self, key: &str, delimited_scope: &str) -> bool;

    /// Returns true if `action_type` is known to the current scope.
    fn is_bounded(&self, action_type: &str) -> bool;
}

/// A statically-keyed atomic constraint function.
///
/// The planner never calls this function; it only records its name in the
/// plan for the key it was registered under.
pub trait AtomicConstraintFunction: fmt::Debug + Send + Sync {
    /// Stable name used to identify this function in rendered plans.
    fn name(&self) -> &str;
}

/// A predicate-dispatched atomic constraint function.
pub trait DynamicAtomicConstraintFunction: fmt::Debug + Send + Sync {
    /// Stable name used to identify this function in rendered plans.
    fn name(&self) -> &str;

    /// Returns true if this function is willing to handle the given left
    /// operand key.
    fn can_handle(&self, key: &str) -> bool;
}

/// A function applied to a whole rule rather than to a single constraint.
pub trait RulePolicyFunction: fmt::Debug + Send + Sync {
    /// Stable name used to identify this function in rendered plans.
    fn name(&self) -> &str;
}

/// A validator run before or after policy evaluation as a whole, recorded
/// in the plan but never invoked by the planner.
pub trait PolicyValidatorFunction: fmt::Debug + Send + Sync {
    /// Stable name used to identify this validator in rendered plans.
    fn name(&self) -> &str;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{AtomicConstraintFunction, DynamicAtomicConstraintFunction, RuleValidator};
    use std::collections::BTreeSet;

    #[derive(Debug, Default)]
    pub(crate) struct FixedValidator {
        pub in_scope_keys: BTreeSet<String>,
        pub bounded_actions: BTreeSet<String>,
    }

    impl RuleValidator for FixedValidator {
        fn is_in_scope(&self, key: &str, _delimited_scope: &str) -> bool {
            self.in_scope_keys.contains(key)
        }

        fn is_bounded(&self, action_type: &str) -> bool {
            self.bounded_actions.contains(action_type)
        }
    }

    #[derive(Debug)]
    pub(crate) struct NamedFunction(pub &'static str);

    impl AtomicConstraintFunction for NamedFunction {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[derive(Debug)]
    pub(crate) struct PrefixFunction {
        pub name: &'static str,
        pub prefix: &'static str,
    }

    impl DynamicAtomicConstraintFunction for PrefixFunction {
        fn name(&self) -> &str {
            self.name
        }

        fn can_handle(&self, key: &str) -> bool {
            key.starts_with(self.prefix)
        }
    }
}
