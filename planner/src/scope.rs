//! Scope identifiers and the scope/key delimiter contract.

use crate::error::{PlannerError, PlannerResult};

/// Reserved character concatenated onto a scope to form its delimited prefix.
///
/// Part of the wire contract between whoever registers keys against a scope
/// and the [`crate::validator::RuleValidator`] that tests them: both sides
/// must agree on this constant.
pub const SCOPE_DELIMITER: char = '.';

/// A non-empty namespace string that partitions policy evaluation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Scope {
    value: String,
    delimited: String,
}

impl Scope {
    /// Creates a scope after validating that it is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidScope`] if the supplied value is empty
    /// or whitespace-only.
    pub fn new(value: impl Into<String>) -> PlannerResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(PlannerError::InvalidScope {
                reason: "scope cannot be empty".into(),
            });
        }
        let delimited = format!("{value}{SCOPE_DELIMITER}");
        Ok(Self { value, delimited })
    }

    /// Returns the scope as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns `scope + "."`, used for prefix matching against bound keys.
    #[must_use]
    pub fn delimited(&self) -> &str {
        &self.delimited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_scope() {
        assert!(Scope::new("").is_err());
        assert!(Scope::new("   ").is_err());
    }

    #[test]
    fn delimited_appends_dot() {
        let scope = Scope::new("request.catalog").unwrap();
        assert_eq!(scope.as_str(), "request.catalog");
        assert_eq!(scope.delimited(), "request.catalog.");
    }
}
