//! String filters

use crate::model::FormValue;
use crate::registry::FilterRegistry;
use crate::registry::filter::{Arity, ClosureFilter, FilterContext, FilterError};
use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::num::NonZeroUsize;

const PATTERN_CACHE_SIZE: NonZeroUsize = NonZeroUsize::new(64).unwrap();

static PATTERNS: Lazy<Mutex<LruCache<String, Regex>>> =
    Lazy::new(|| Mutex::new(LruCache::new(PATTERN_CACHE_SIZE)));

/// Compile `pattern`, reusing recently compiled expressions
pub(crate) fn cached_regex(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(regex) = PATTERNS.lock().get(pattern) {
        return Ok(regex.clone());
    }
    let regex = Regex::new(pattern)?;
    PATTERNS.lock().put(pattern.to_string(), regex.clone());
    Ok(regex)
}

fn text_of(value: &FormValue, context: &FilterContext<'_>) -> String {
    match value {
        FormValue::String(s) => s.clone(),
        other => context.culture.format(other),
    }
}

/// Register `ToUpper`, `ToLower`, `Trim`, `ToString` and `Matches`
pub fn register(registry: &mut FilterRegistry) {
    let transforms: [(&str, fn(&str) -> String); 3] = [
        ("ToUpper", str::to_uppercase),
        ("ToLower", str::to_lowercase),
        ("Trim", |s| s.trim().to_string()),
    ];
    for (name, transform) in transforms {
        registry.insert_builtin(
            ClosureFilter::new(name, Arity::NONE, move |value, _, context| {
                if value.is_null() {
                    return Ok(value.clone());
                }
                Ok(FormValue::String(transform(&text_of(value, context))))
            })
            .with_documentation("String transform; null and unresolved values pass through."),
        );
    }

    registry.insert_builtin(
        ClosureFilter::new("ToString", Arity::NONE, |value, _, context| {
            Ok(FormValue::String(context.culture.format(value)))
        })
        .with_documentation("Culture-aware text of the value; null becomes the empty string."),
    );

    registry.insert_builtin(
        ClosureFilter::new("Matches", Arity::exactly(1), |value, args, context| {
            let Some(pattern) = args[0].as_str() else {
                return Err(FilterError::invalid_type("Matches", 1, "String", &args[0]));
            };
            if value.is_null() {
                return Ok(FormValue::Boolean(false));
            }
            let regex = cached_regex(pattern)
                .map_err(|e| FilterError::failed("Matches", format!("invalid pattern: {e}")))?;
            Ok(FormValue::Boolean(regex.is_match(&text_of(value, context))))
        })
        .with_documentation("True when the text of the value matches the regular expression."),
    );
}

#[cfg(test)]
mod tests {
    use crate::model::{Culture, FormValue};
    use crate::registry::FilterRegistry;
    use crate::registry::filter::{FilterContext, FilterError, FilterResult};
    use pretty_assertions::assert_eq;

    fn apply(name: &str, value: FormValue, args: &[FormValue]) -> FilterResult<FormValue> {
        let culture = Culture::invariant();
        FilterRegistry::standard()
            .resolve(name)
            .unwrap()
            .apply(&value, args, &FilterContext::new(&culture))
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(
            apply("ToUpper", "hello".into(), &[]).unwrap(),
            FormValue::from("HELLO")
        );
        assert_eq!(
            apply("ToLower", "HeLLo".into(), &[]).unwrap(),
            FormValue::from("hello")
        );
        assert_eq!(
            apply("Trim", "  x  ".into(), &[]).unwrap(),
            FormValue::from("x")
        );
    }

    #[test]
    fn test_null_passes_through_transforms() {
        assert_eq!(
            apply("ToUpper", FormValue::NoValue, &[]).unwrap(),
            FormValue::NoValue
        );
        assert_eq!(apply("Trim", FormValue::Null, &[]).unwrap(), FormValue::Null);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(apply("ToString", 42.into(), &[]).unwrap(), FormValue::from("42"));
        assert_eq!(
            apply("ToString", FormValue::NoValue, &[]).unwrap(),
            FormValue::from("")
        );
    }

    #[test]
    fn test_matches() {
        let pattern = [FormValue::from(r"^\d{3}$")];
        assert_eq!(
            apply("Matches", "123".into(), &pattern).unwrap(),
            FormValue::Boolean(true)
        );
        assert_eq!(
            apply("Matches", "12a".into(), &pattern).unwrap(),
            FormValue::Boolean(false)
        );
        assert_eq!(
            apply("Matches", 123.into(), &pattern).unwrap(),
            FormValue::Boolean(true)
        );
        assert!(matches!(
            apply("Matches", "x".into(), &[FormValue::from("(")]),
            Err(FilterError::Failed { .. })
        ));
    }
}
