//! Null, emptiness and boolean predicates

use crate::model::FormValue;
use crate::registry::FilterRegistry;
use crate::registry::filter::{Arity, ClosureFilter};

/// Register `IsNull`, `IsNotNull`, `IsEmpty`, `IsNotEmpty`, `Not`, `ToBoolean`
pub fn register(registry: &mut FilterRegistry) {
    let predicates: [(&str, &str, fn(&FormValue) -> bool); 6] = [
        ("IsNull", "True when the value is null or unresolved.", FormValue::is_null),
        ("IsNotNull", "True when the value is neither null nor unresolved.", |v| {
            !v.is_null()
        }),
        (
            "IsEmpty",
            "True for null, unresolved, empty strings and empty collections.",
            FormValue::is_empty,
        ),
        ("IsNotEmpty", "Negation of IsEmpty.", |v| !v.is_empty()),
        ("Not", "Negated truthiness of the value.", |v| !v.is_truthy()),
        ("ToBoolean", "Truthiness of the value.", FormValue::is_truthy),
    ];

    for (name, documentation, predicate) in predicates {
        registry.insert_builtin(
            ClosureFilter::new(name, Arity::NONE, move |value, _, _| {
                Ok(FormValue::Boolean(predicate(value)))
            })
            .with_documentation(documentation),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Culture, FormValue};
    use crate::registry::FilterRegistry;
    use crate::registry::filter::FilterContext;
    use rstest::rstest;

    fn apply(name: &str, value: FormValue) -> FormValue {
        let registry = FilterRegistry::standard();
        let culture = Culture::invariant();
        registry
            .resolve(name)
            .unwrap()
            .apply(&value, &[], &FilterContext::new(&culture))
            .unwrap()
    }

    #[rstest]
    #[case(FormValue::from("Hello"), true)]
    #[case(FormValue::from(""), false)]
    #[case(FormValue::Null, false)]
    #[case(FormValue::NoValue, false)]
    #[case(FormValue::from(0), true)]
    #[case(FormValue::collection([]), false)]
    fn test_is_not_empty(#[case] value: FormValue, #[case] expected: bool) {
        assert_eq!(apply("IsNotEmpty", value), FormValue::Boolean(expected));
    }

    #[rstest]
    #[case(FormValue::Null, true)]
    #[case(FormValue::NoValue, true)]
    #[case(FormValue::from(""), false)]
    fn test_is_null(#[case] value: FormValue, #[case] expected: bool) {
        assert_eq!(apply("IsNull", value.clone()), FormValue::Boolean(expected));
        assert_eq!(apply("IsNotNull", value), FormValue::Boolean(!expected));
    }

    #[test]
    fn test_not_and_to_boolean() {
        assert_eq!(apply("Not", FormValue::from(0)), FormValue::Boolean(true));
        assert_eq!(apply("ToBoolean", FormValue::from("x")), FormValue::Boolean(true));
    }
}
