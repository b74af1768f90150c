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

//! Filter trait, arity policy and filter errors

use crate::model::{Culture, FormValue};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Filter evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Wrong number of `:`-separated arguments
    #[error("Filter '{name}' expects {arity} argument(s), got {actual}")]
    InvalidArity {
        /// Filter name
        name: String,
        /// Accepted argument counts
        arity: Arity,
        /// Arguments supplied
        actual: usize,
    },

    /// An operand has the wrong kind; index 0 is the piped value
    #[error("Filter '{name}' operand {index} expects {expected}, got {actual}")]
    InvalidArgumentType {
        /// Filter name
        name: String,
        /// Operand index
        index: usize,
        /// Expected kind
        expected: String,
        /// Actual kind
        actual: String,
    },

    /// Any other failure
    #[error("Filter '{name}' failed: {message}")]
    Failed {
        /// Filter name
        name: String,
        /// Error message
        message: String,
    },
}

impl FilterError {
    /// Operand kind mismatch
    pub fn invalid_type(
        name: &str,
        index: usize,
        expected: impl Into<String>,
        actual: &FormValue,
    ) -> Self {
        Self::InvalidArgumentType {
            name: name.to_string(),
            index,
            expected: expected.into(),
            actual: actual.type_name().to_string(),
        }
    }

    /// Generic failure
    pub fn failed(name: &str, message: impl Into<String>) -> Self {
        Self::Failed {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Number of `:`-separated arguments a filter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    /// Minimum argument count
    pub min: usize,
    /// Maximum argument count (`None` for unlimited)
    pub max: Option<usize>,
}

impl Arity {
    /// No arguments
    pub const NONE: Arity = Arity::exactly(0);

    /// Exactly `n` arguments
    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// Between `min` and `max` arguments inclusive
    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// At least `min` arguments
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Whether `count` arguments are accepted
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }

    /// Check `count`, producing the arity error for filter `name`
    pub fn check(&self, name: &str, count: usize) -> FilterResult<()> {
        if self.accepts(count) {
            Ok(())
        } else {
            Err(FilterError::InvalidArity {
                name: name.to_string(),
                arity: *self,
                actual: count,
            })
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) => write!(f, "{}-{max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// Ambient information available to filters
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// Culture used for stringification
    pub culture: &'a Culture,
}

impl<'a> FilterContext<'a> {
    /// Create a new filter context
    pub fn new(culture: &'a Culture) -> Self {
        Self { culture }
    }
}

/// A named pure function applied in a `|` pipe stage
///
/// `value` is the piped operand and `args` are the `:`-separated arguments,
/// already evaluated. Arity is checked by the caller before `apply` runs.
pub trait FormFilter: Send + Sync {
    /// Name used in templates; case-sensitive
    fn name(&self) -> &str;

    /// Accepted argument counts
    fn arity(&self) -> Arity;

    /// Apply the filter
    fn apply(
        &self,
        value: &FormValue,
        args: &[FormValue],
        context: &FilterContext<'_>,
    ) -> FilterResult<FormValue>;

    /// Get filter documentation
    fn documentation(&self) -> &str {
        ""
    }
}

/// Signature of closure-based filters
pub type FilterFn =
    dyn Fn(&FormValue, &[FormValue], &FilterContext<'_>) -> FilterResult<FormValue> + Send + Sync;

/// Filter backed by a closure
pub struct ClosureFilter {
    name: String,
    arity: Arity,
    documentation: String,
    func: Arc<FilterFn>,
}

impl ClosureFilter {
    /// Wrap a closure as a filter
    pub fn new<F>(name: impl Into<String>, arity: Arity, func: F) -> Self
    where
        F: Fn(&FormValue, &[FormValue], &FilterContext<'_>) -> FilterResult<FormValue>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            arity,
            documentation: String::new(),
            func: Arc::new(func),
        }
    }

    /// Attach documentation
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }
}

impl FormFilter for ClosureFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn apply(
        &self,
        value: &FormValue,
        args: &[FormValue],
        context: &FilterContext<'_>,
    ) -> FilterResult<FormValue> {
        (self.func)(value, args, context)
    }

    fn documentation(&self) -> &str {
        &self.documentation
    }
}

impl fmt::Debug for ClosureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureFilter")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert!(Arity::NONE.accepts(0));
        assert!(!Arity::NONE.accepts(1));
        assert!(Arity::range(0, 1).accepts(1));
        assert!(Arity::at_least(1).accepts(9));
        assert!(!Arity::at_least(1).accepts(0));

        assert_eq!(Arity::exactly(2).to_string(), "2");
        assert_eq!(Arity::range(0, 1).to_string(), "0-1");
        assert_eq!(Arity::at_least(1).to_string(), "at least 1");
    }

    #[test]
    fn test_arity_error_message() {
        let err = Arity::exactly(1).check("Default", 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Filter 'Default' expects 1 argument(s), got 0"
        );
    }
}
