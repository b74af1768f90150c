//! Declarative field and validator definitions
//!
//! Every string attribute is a binding template. Definitions deserialize
//! from JSON with camelCase keys.

use crate::validation::NullValuePolicy;
use serde::{Deserialize, Serialize};

/// Declarative description of one form field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDefinition {
    /// Model property holding the field value
    pub key: String,
    /// Label template
    pub name: Option<String>,
    /// Tooltip template
    pub tooltip: Option<String>,
    /// Visibility template; absent means always visible
    pub is_visible: Option<String>,
    /// Enablement template; absent means always enabled
    pub is_enabled: Option<String>,
    /// Reserve layout space while hidden
    pub hidden_on_false: bool,
    /// Validation rules in declaration order
    pub validators: Vec<ValidatorDefinition>,
}

impl FieldDefinition {
    /// Field bound to model property `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Set the label template
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the tooltip template
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Set the visibility template
    pub fn with_visibility(mut self, template: impl Into<String>) -> Self {
        self.is_visible = Some(template.into());
        self
    }

    /// Set the enablement template
    pub fn with_enablement(mut self, template: impl Into<String>) -> Self {
        self.is_enabled = Some(template.into());
        self
    }

    /// Append a validator
    pub fn with_validator(mut self, validator: ValidatorDefinition) -> Self {
        self.validators.push(validator);
        self
    }
}

/// Argument of a validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentDefinition {
    /// Binding template
    Template(String),
    /// Fixed JSON value, e.g. a list of forbidden entries
    Value(serde_json::Value),
}

/// Declarative description of one validation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorDefinition {
    /// Built-in comparator name, e.g. `"Required"` or `"NotExistsIn"`
    pub comparator: String,
    /// Comparison operand
    #[serde(default)]
    pub argument: Option<ArgumentDefinition>,
    /// Enforcement template; absent means always enforced
    #[serde(default)]
    pub is_enforced: Option<String>,
    /// Error message template
    #[serde(default)]
    pub message: Option<String>,
    /// Handling of null field values
    #[serde(default)]
    pub null_policy: NullValuePolicy,
    /// Keep running after the pipe failed; engine default when absent
    #[serde(default)]
    pub strict: Option<bool>,
    /// Registry filter applied to the value before comparison
    #[serde(default)]
    pub converter: Option<String>,
    /// Re-run on view-side target updates; engine default when absent
    #[serde(default)]
    pub validates_on_target_updated: Option<bool>,
}

impl ValidatorDefinition {
    /// Rule using comparator `comparator` with everything else defaulted
    pub fn new(comparator: impl Into<String>) -> Self {
        Self {
            comparator: comparator.into(),
            argument: None,
            is_enforced: None,
            message: None,
            null_policy: NullValuePolicy::default(),
            strict: None,
            converter: None,
            validates_on_target_updated: None,
        }
    }

    /// Set a template argument
    pub fn with_argument(mut self, template: impl Into<String>) -> Self {
        self.argument = Some(ArgumentDefinition::Template(template.into()));
        self
    }

    /// Set a fixed argument
    pub fn with_argument_value(mut self, value: serde_json::Value) -> Self {
        self.argument = Some(ArgumentDefinition::Value(value));
        self
    }

    /// Set the enforcement template
    pub fn with_enforcement(mut self, template: impl Into<String>) -> Self {
        self.is_enforced = Some(template.into());
        self
    }

    /// Set the message template
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    /// Set the null policy
    pub fn with_null_policy(mut self, policy: NullValuePolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// Set the strict flag
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Set the converter filter
    pub fn with_converter(mut self, filter: impl Into<String>) -> Self {
        self.converter = Some(filter.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_field() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "key": "Username",
            "name": "User name",
            "isVisible": "{Binding ShowAccount}",
            "validators": [
                {
                    "comparator": "NotExistsIn",
                    "argument": ["admin", "root"],
                    "message": "{Binding Username} is reserved",
                    "nullPolicy": "TreatAsValid"
                },
                {
                    "comparator": "MinLength",
                    "argument": "{ContextBinding MinimumLength}",
                    "strict": true
                }
            ]
        }))
        .unwrap();

        assert_eq!(field.key, "Username");
        assert_eq!(field.is_enabled, None);
        assert!(!field.hidden_on_false);
        assert_eq!(field.validators.len(), 2);
        assert_eq!(
            field.validators[0].argument,
            Some(ArgumentDefinition::Value(json!(["admin", "root"])))
        );
        assert_eq!(field.validators[0].null_policy, NullValuePolicy::TreatAsValid);
        assert_eq!(
            field.validators[1].argument,
            Some(ArgumentDefinition::Template(
                "{ContextBinding MinimumLength}".to_string()
            ))
        );
        assert_eq!(field.validators[1].strict, Some(true));
    }

    #[test]
    fn test_builders_match_deserialized() {
        let built = FieldDefinition::new("Age").with_validator(
            ValidatorDefinition::new("GreaterThanOrEqual")
                .with_argument_value(json!(18))
                .with_message("Too young"),
        );
        let parsed: FieldDefinition = serde_json::from_value(json!({
            "key": "Age",
            "validators": [
                {"comparator": "GreaterThanOrEqual", "argument": 18, "message": "Too young"}
            ]
        }))
        .unwrap();
        assert_eq!(built, parsed);
    }
}
