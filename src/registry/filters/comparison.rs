//! Equality and ordering filters

use crate::model::FormValue;
use crate::registry::FilterRegistry;
use crate::registry::filter::{Arity, ClosureFilter, FilterError};
use std::cmp::Ordering;

/// Register `Equals`, `NotEquals` and the four ordering filters
pub fn register(registry: &mut FilterRegistry) {
    registry.insert_builtin(
        ClosureFilter::new("Equals", Arity::exactly(1), |value, args, _| {
            Ok(FormValue::Boolean(*value == args[0]))
        })
        .with_documentation("True when the value equals the argument."),
    );
    registry.insert_builtin(
        ClosureFilter::new("NotEquals", Arity::exactly(1), |value, args, _| {
            Ok(FormValue::Boolean(*value != args[0]))
        })
        .with_documentation("True when the value differs from the argument."),
    );

    let orderings: [(&str, fn(Ordering) -> bool); 4] = [
        ("GreaterThan", Ordering::is_gt),
        ("GreaterThanOrEqual", Ordering::is_ge),
        ("LessThan", Ordering::is_lt),
        ("LessThanOrEqual", Ordering::is_le),
    ];
    for (name, accept) in orderings {
        registry.insert_builtin(
            ClosureFilter::new(name, Arity::exactly(1), move |value, args, _| {
                let argument = &args[0];
                if value.is_null() || argument.is_null() {
                    return Ok(FormValue::Boolean(false));
                }
                value
                    .compare(argument)
                    .map(|ordering| FormValue::Boolean(accept(ordering)))
                    .ok_or_else(|| FilterError::invalid_type(name, 1, value.type_name(), argument))
            })
            .with_documentation("Compares numbers, strings or booleans; null operands give false."),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Culture, FormValue};
    use crate::registry::FilterRegistry;
    use crate::registry::filter::{FilterContext, FilterError, FilterResult};
    use rstest::rstest;

    fn apply(name: &str, value: FormValue, arg: FormValue) -> FilterResult<FormValue> {
        let culture = Culture::invariant();
        FilterRegistry::standard().resolve(name).unwrap().apply(
            &value,
            &[arg],
            &FilterContext::new(&culture),
        )
    }

    #[rstest]
    #[case("GreaterThan", 5, 3, true)]
    #[case("GreaterThan", 3, 3, false)]
    #[case("GreaterThanOrEqual", 3, 3, true)]
    #[case("LessThan", 2, 3, true)]
    #[case("LessThanOrEqual", 4, 3, false)]
    fn test_numeric_ordering(
        #[case] name: &str,
        #[case] value: i64,
        #[case] arg: i64,
        #[case] expected: bool,
    ) {
        assert_eq!(
            apply(name, value.into(), arg.into()).unwrap(),
            FormValue::Boolean(expected)
        );
    }

    #[test]
    fn test_null_operands_compare_false() {
        assert_eq!(
            apply("LessThan", FormValue::NoValue, FormValue::from(1)).unwrap(),
            FormValue::Boolean(false)
        );
    }

    #[test]
    fn test_mixed_kinds_are_an_error() {
        assert!(matches!(
            apply("GreaterThan", FormValue::from("a"), FormValue::from(1)),
            Err(FilterError::InvalidArgumentType { index: 1, .. })
        ));
    }

    #[test]
    fn test_equality_is_numeric_across_kinds() {
        assert_eq!(
            apply("Equals", FormValue::from(2), FormValue::from(rust_decimal::Decimal::TWO))
                .unwrap(),
            FormValue::Boolean(true)
        );
        assert_eq!(
            apply("NotEquals", FormValue::Null, FormValue::NoValue).unwrap(),
            FormValue::Boolean(true)
        );
    }
}
