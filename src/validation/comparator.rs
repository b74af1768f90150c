// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Comparator strategies
//!
//! Each built-in comparator passes vacuously when the argument does not have
//! the shape it needs: a membership test against something that is not a
//! collection, an ordering test against a value that does not order with the
//! field value, a pattern that is not a valid regular expression.

use crate::model::{Culture, FormValue};
use crate::registry::filters::string::cached_regex;
use rust_decimal::prelude::ToPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// User-supplied comparison strategy
pub trait Comparator: Send + Sync {
    /// Name used in definitions and debug output
    fn name(&self) -> &str;

    /// Whether `value` passes against `argument`
    fn compare(&self, value: &FormValue, argument: &FormValue) -> bool;
}

/// Comparison applied by one validation rule
#[derive(Clone)]
pub enum ComparatorKind {
    /// Value is not null, empty string or empty collection
    Required,
    /// Value is an item of the collection argument
    ExistsIn,
    /// Value is not an item of the collection argument
    NotExistsIn,
    /// Value equals the argument
    Equal,
    /// Value differs from the argument
    NotEqual,
    /// Value orders after the argument
    GreaterThan,
    /// Value orders after or equal to the argument
    GreaterThanOrEqual,
    /// Value orders before the argument
    LessThan,
    /// Value orders before or equal to the argument
    LessThanOrEqual,
    /// Text of the value matches the pattern argument
    MatchPattern,
    /// Text of the value does not match the pattern argument
    NotMatchPattern,
    /// Length of the value is at least the argument
    MinLength,
    /// Length of the value is at most the argument
    MaxLength,
    /// Value is boolean `true`
    IsTrue,
    /// Value is boolean `false`
    IsFalse,
    /// Custom strategy
    Custom(Arc<dyn Comparator>),
}

impl ComparatorKind {
    /// Look up a built-in comparator by name
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Required" => Self::Required,
            "ExistsIn" => Self::ExistsIn,
            "NotExistsIn" => Self::NotExistsIn,
            "Equal" => Self::Equal,
            "NotEqual" => Self::NotEqual,
            "GreaterThan" => Self::GreaterThan,
            "GreaterThanOrEqual" => Self::GreaterThanOrEqual,
            "LessThan" => Self::LessThan,
            "LessThanOrEqual" => Self::LessThanOrEqual,
            "MatchPattern" => Self::MatchPattern,
            "NotMatchPattern" => Self::NotMatchPattern,
            "MinLength" => Self::MinLength,
            "MaxLength" => Self::MaxLength,
            "IsTrue" => Self::IsTrue,
            "IsFalse" => Self::IsFalse,
            _ => return None,
        })
    }

    /// Wrap a custom strategy
    pub fn custom(comparator: impl Comparator + 'static) -> Self {
        Self::Custom(Arc::new(comparator))
    }

    /// Comparator name
    pub fn name(&self) -> &str {
        match self {
            Self::Required => "Required",
            Self::ExistsIn => "ExistsIn",
            Self::NotExistsIn => "NotExistsIn",
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterThanOrEqual => "GreaterThanOrEqual",
            Self::LessThan => "LessThan",
            Self::LessThanOrEqual => "LessThanOrEqual",
            Self::MatchPattern => "MatchPattern",
            Self::NotMatchPattern => "NotMatchPattern",
            Self::MinLength => "MinLength",
            Self::MaxLength => "MaxLength",
            Self::IsTrue => "IsTrue",
            Self::IsFalse => "IsFalse",
            Self::Custom(comparator) => comparator.name(),
        }
    }

    /// Whether `value` passes against `argument`
    pub fn compare(&self, value: &FormValue, argument: &FormValue) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::ExistsIn => argument
                .as_collection()
                .is_none_or(|items| items.contains(value)),
            Self::NotExistsIn => argument
                .as_collection()
                .is_none_or(|items| !items.contains(value)),
            Self::Equal => value == argument,
            Self::NotEqual => value != argument,
            Self::GreaterThan => ordered(value, argument, Ordering::is_gt),
            Self::GreaterThanOrEqual => ordered(value, argument, Ordering::is_ge),
            Self::LessThan => ordered(value, argument, Ordering::is_lt),
            Self::LessThanOrEqual => ordered(value, argument, Ordering::is_le),
            Self::MatchPattern => matches_pattern(value, argument).unwrap_or(true),
            Self::NotMatchPattern => matches_pattern(value, argument).is_none_or(|m| !m),
            Self::MinLength => length_bound(argument).is_none_or(|min| length_of(value) >= min),
            Self::MaxLength => length_bound(argument).is_none_or(|max| length_of(value) <= max),
            Self::IsTrue => matches!(value, FormValue::Boolean(true)),
            Self::IsFalse => matches!(value, FormValue::Boolean(false)),
            Self::Custom(comparator) => comparator.compare(value, argument),
        }
    }
}

fn ordered(value: &FormValue, argument: &FormValue, accept: fn(Ordering) -> bool) -> bool {
    value.compare(argument).is_none_or(accept)
}

fn text_of(value: &FormValue) -> String {
    match value {
        FormValue::String(s) => s.clone(),
        other => Culture::invariant().format(other),
    }
}

fn matches_pattern(value: &FormValue, argument: &FormValue) -> Option<bool> {
    let regex = cached_regex(argument.as_str()?).ok()?;
    Some(regex.is_match(&text_of(value)))
}

fn length_bound(argument: &FormValue) -> Option<usize> {
    match argument {
        FormValue::Integer(n) => usize::try_from(*n).ok(),
        FormValue::Decimal(d) => d.trunc().to_usize(),
        _ => None,
    }
}

fn length_of(value: &FormValue) -> usize {
    match value {
        FormValue::NoValue | FormValue::Null => 0,
        FormValue::Collection(items) => items.len(),
        other => text_of(other).chars().count(),
    }
}

impl fmt::Debug for ComparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(comparator) => write!(f, "Custom({})", comparator.name()),
            other => f.write_str(other.name()),
        }
    }
}
