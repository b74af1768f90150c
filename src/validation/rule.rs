//! Validation rules

use super::comparator::ComparatorKind;
use crate::binding::Proxy;
use crate::model::{Culture, FormValue};
use crate::registry::{FilterContext, FormFilter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What a rule does when the field value is null or unresolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullValuePolicy {
    /// Hand the null to the comparator like any other value
    #[default]
    RunComparator,
    /// Pass immediately
    TreatAsValid,
    /// Fail immediately with the rule's message
    TreatAsInvalid,
    /// Behave as if the rule were not enforced
    Skip,
}

/// Source of a rule's error message
#[derive(Debug, Clone)]
pub enum MessageSource {
    /// Fixed text
    Static(String),
    /// Text produced by a (possibly dynamic) template
    Proxy(Proxy),
}

impl MessageSource {
    /// Current message text
    pub fn text(&self) -> String {
        match self {
            MessageSource::Static(text) => text.clone(),
            MessageSource::Proxy(proxy) => match proxy.value() {
                FormValue::String(text) => text,
                other => Culture::invariant().format(&other),
            },
        }
    }

    /// The proxy behind a dynamic message
    pub fn proxy(&self) -> Option<&Proxy> {
        match self {
            MessageSource::Static(_) => None,
            MessageSource::Proxy(proxy) => Some(proxy),
        }
    }
}

impl From<&str> for MessageSource {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for MessageSource {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

impl From<Proxy> for MessageSource {
    fn from(proxy: Proxy) -> Self {
        Self::Proxy(proxy)
    }
}

/// Registry filter applied to the field value before comparison
#[derive(Clone)]
pub struct ValueConverter {
    filter: Arc<dyn FormFilter>,
    culture: Culture,
}

impl ValueConverter {
    /// Wrap a filter; `None` unless it accepts being called without arguments
    pub fn new(filter: Arc<dyn FormFilter>, culture: Culture) -> Option<Self> {
        filter
            .arity()
            .accepts(0)
            .then_some(Self { filter, culture })
    }

    /// Filter name
    pub fn name(&self) -> &str {
        self.filter.name()
    }

    /// Convert `value`; failures are logged and yield `NoValue`
    pub fn convert(&self, value: &FormValue) -> FormValue {
        self.filter
            .apply(value, &[], &FilterContext::new(&self.culture))
            .unwrap_or_else(|err| {
                log::warn!("Value converter '{}' failed: {err}", self.name());
                FormValue::NoValue
            })
    }
}

impl fmt::Debug for ValueConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueConverter").field(&self.name()).finish()
    }
}

/// Result of running one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Not enforced, or skipped by the null policy
    Skipped,
    /// The rule passed
    Passed,
    /// The rule failed with this message
    Failed(String),
}

impl RuleOutcome {
    /// Whether the outcome counts as a pass
    pub fn is_pass(&self) -> bool {
        !matches!(self, RuleOutcome::Failed(_))
    }
}

/// One comparator with its argument, enforcement gate, message and policies
#[derive(Debug, Clone)]
pub struct ValidationRule {
    comparator: ComparatorKind,
    argument: Proxy,
    enforcement: Proxy,
    message: MessageSource,
    null_policy: NullValuePolicy,
    strict: bool,
    validates_on_target_updated: bool,
    converter: Option<ValueConverter>,
}

impl ValidationRule {
    /// Always-enforced, non-strict rule with a null argument and empty message
    pub fn new(comparator: ComparatorKind) -> Self {
        Self {
            comparator,
            argument: Proxy::constant(FormValue::Null),
            enforcement: Proxy::constant(true),
            message: MessageSource::Static(String::new()),
            null_policy: NullValuePolicy::default(),
            strict: false,
            validates_on_target_updated: false,
            converter: None,
        }
    }

    /// Set the argument proxy
    pub fn with_argument(mut self, argument: Proxy) -> Self {
        self.argument = argument;
        self
    }

    /// Set the enforcement proxy
    pub fn with_enforcement(mut self, enforcement: Proxy) -> Self {
        self.enforcement = enforcement;
        self
    }

    /// Set the error message
    pub fn with_message(mut self, message: impl Into<MessageSource>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the null policy
    pub fn with_null_policy(mut self, policy: NullValuePolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// Set whether the rule still runs once the pipe has failed
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set whether view-side target updates re-run this rule
    pub fn with_validates_on_target_updated(mut self, enabled: bool) -> Self {
        self.validates_on_target_updated = enabled;
        self
    }

    /// Set the value converter
    pub fn with_converter(mut self, converter: ValueConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Comparator strategy
    pub fn comparator(&self) -> &ComparatorKind {
        &self.comparator
    }

    /// Argument proxy
    pub fn argument(&self) -> &Proxy {
        &self.argument
    }

    /// Enforcement proxy
    pub fn enforcement(&self) -> &Proxy {
        &self.enforcement
    }

    /// Message source
    pub fn message(&self) -> &MessageSource {
        &self.message
    }

    /// Null policy
    pub fn null_policy(&self) -> NullValuePolicy {
        self.null_policy
    }

    /// Strict flag
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Target-updated flag
    pub fn validates_on_target_updated(&self) -> bool {
        self.validates_on_target_updated
    }

    /// Whether the enforcement gate is currently open
    pub fn is_enforced(&self) -> bool {
        self.enforcement.is_truthy()
    }

    /// Proxies whose changes can change this rule's outcome
    pub fn proxies(&self) -> impl Iterator<Item = &Proxy> {
        [Some(&self.argument), Some(&self.enforcement), self.message.proxy()]
            .into_iter()
            .flatten()
    }

    /// Run the rule against a field value
    pub fn validate(&self, value: &FormValue) -> RuleOutcome {
        if !self.is_enforced() {
            return RuleOutcome::Skipped;
        }

        let converted;
        let value = match &self.converter {
            Some(converter) => {
                converted = converter.convert(value);
                &converted
            }
            None => value,
        };

        if value.is_null() {
            match self.null_policy {
                NullValuePolicy::TreatAsValid => return RuleOutcome::Passed,
                NullValuePolicy::TreatAsInvalid => return RuleOutcome::Failed(self.message.text()),
                NullValuePolicy::Skip => return RuleOutcome::Skipped,
                NullValuePolicy::RunComparator => {}
            }
        }

        if self.comparator.compare(value, &self.argument.value()) {
            RuleOutcome::Passed
        } else {
            RuleOutcome::Failed(self.message.text())
        }
    }
}
