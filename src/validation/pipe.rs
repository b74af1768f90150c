//! Ordered rule chain for one field

use super::rule::{RuleOutcome, ValidationRule};
use crate::model::FormValue;

/// Aggregate validity of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// True iff no enforced rule failed
    pub is_valid: bool,
    /// Messages of the failing rules, in declaration order
    pub errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    /// A passing result
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// First error message, if any
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Ordered sequence of rules validating one field
///
/// Rules run in declaration order. Once a rule has failed, only rules
/// flagged `strict` still run, so a pipe of non-strict rules reports just
/// its first failure.
#[derive(Debug, Clone, Default)]
pub struct ValidationPipe {
    rules: Vec<ValidationRule>,
}

impl ValidationPipe {
    /// Create an empty pipe
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn push(&mut self, rule: ValidationRule) {
        self.rules.push(rule);
    }

    /// Append a rule, builder style
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.push(rule);
        self
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the pipe has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule wants to re-run on view-side target updates
    pub fn validates_on_target_updated(&self) -> bool {
        self.rules.iter().any(ValidationRule::validates_on_target_updated)
    }

    /// Validate a field value
    pub fn validate(&self, value: &FormValue) -> ValidationResult {
        let mut result = ValidationResult::valid();
        for rule in &self.rules {
            if !result.is_valid && !rule.is_strict() {
                continue;
            }
            if let RuleOutcome::Failed(message) = rule.validate(value) {
                result.is_valid = false;
                result.errors.push(message);
            }
        }
        result
    }
}

impl FromIterator<ValidationRule> for ValidationPipe {
    fn from_iter<I: IntoIterator<Item = ValidationRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Proxy;
    use crate::validation::ComparatorKind;
    use pretty_assertions::assert_eq;

    fn failing(message: &str) -> ValidationRule {
        ValidationRule::new(ComparatorKind::IsTrue).with_message(message)
    }

    fn passing() -> ValidationRule {
        ValidationRule::new(ComparatorKind::IsFalse).with_message("B failed")
    }

    #[test]
    fn test_strict_rules_collect_every_failure() {
        let pipe: ValidationPipe = [
            failing("A failed").with_strict(true),
            passing().with_strict(true),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            pipe.validate(&false.into()),
            ValidationResult {
                is_valid: false,
                errors: vec!["A failed".to_string()],
            }
        );

        let pipe = pipe.with_rule(failing("C failed").with_strict(true));
        assert_eq!(
            pipe.validate(&false.into()).errors,
            vec!["A failed".to_string(), "C failed".to_string()]
        );
    }

    #[test]
    fn test_non_strict_reports_first_failure_only() {
        let pipe = ValidationPipe::new()
            .with_rule(failing("first"))
            .with_rule(failing("A failed"))
            .with_rule(passing());

        assert_eq!(
            pipe.validate(&false.into()),
            ValidationResult {
                is_valid: false,
                errors: vec!["first".to_string()],
            }
        );
    }

    #[test]
    fn test_strict_rule_after_failure_still_runs() {
        let pipe = ValidationPipe::new()
            .with_rule(failing("first"))
            .with_rule(failing("strict").with_strict(true))
            .with_rule(failing("lenient"));

        assert_eq!(
            pipe.validate(&false.into()).errors,
            vec!["first".to_string(), "strict".to_string()]
        );
    }

    #[test]
    fn test_unenforced_rules_pass_without_message() {
        let pipe = ValidationPipe::new()
            .with_rule(failing("gated").with_enforcement(Proxy::constant(false)));
        assert_eq!(pipe.validate(&false.into()), ValidationResult::valid());
    }

    #[test]
    fn test_empty_pipe_is_valid() {
        assert!(ValidationPipe::new().validate(&FormValue::Null).is_valid);
    }
}
