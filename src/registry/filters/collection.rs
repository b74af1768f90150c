//! Collection and fallback filters

use crate::model::FormValue;
use crate::registry::FilterRegistry;
use crate::registry::filter::{Arity, ClosureFilter, FilterError};

/// Register `Length`, `Join`, `Contains` and `Default`
pub fn register(registry: &mut FilterRegistry) {
    registry.insert_builtin(
        ClosureFilter::new("Length", Arity::NONE, |value, _, _| {
            let length = match value {
                FormValue::NoValue | FormValue::Null => 0,
                FormValue::String(s) => s.chars().count(),
                FormValue::Collection(items) => items.len(),
                other => {
                    return Err(FilterError::invalid_type(
                        "Length",
                        0,
                        "String or Collection",
                        other,
                    ));
                }
            };
            Ok(FormValue::Integer(length as i64))
        })
        .with_documentation("Character count of a string or item count of a collection."),
    );

    registry.insert_builtin(
        ClosureFilter::new("Join", Arity::range(0, 1), |value, args, context| {
            let separator = match args.first() {
                Some(arg) => context.culture.format(arg),
                None => context.culture.list_separator.clone(),
            };
            let text = match value {
                FormValue::Collection(items) => items
                    .iter()
                    .map(|item| context.culture.format(item))
                    .collect::<Vec<_>>()
                    .join(&separator),
                other => context.culture.format(other),
            };
            Ok(FormValue::String(text))
        })
        .with_documentation("Joins collection items with the separator argument."),
    );

    registry.insert_builtin(
        ClosureFilter::new("Contains", Arity::exactly(1), |value, args, context| {
            let needle = &args[0];
            let found = match value {
                FormValue::Collection(items) => items.contains(needle),
                FormValue::String(s) => s.contains(&context.culture.format(needle)),
                _ => false,
            };
            Ok(FormValue::Boolean(found))
        })
        .with_documentation("Substring test for strings, membership test for collections."),
    );

    registry.insert_builtin(
        ClosureFilter::new("Default", Arity::exactly(1), |value, args, _| {
            Ok(if value.is_empty() {
                args[0].clone()
            } else {
                value.clone()
            })
        })
        .with_documentation("Replaces null, unresolved or empty values with the argument."),
    );
}

#[cfg(test)]
mod tests {
    use crate::model::{Culture, FormValue};
    use crate::registry::FilterRegistry;
    use crate::registry::filter::{FilterContext, FilterResult};
    use pretty_assertions::assert_eq;

    fn apply(name: &str, value: FormValue, args: &[FormValue]) -> FilterResult<FormValue> {
        let culture = Culture::invariant();
        FilterRegistry::standard()
            .resolve(name)
            .unwrap()
            .apply(&value, args, &FilterContext::new(&culture))
    }

    fn numbers() -> FormValue {
        FormValue::collection([1.into(), 2.into(), 3.into()])
    }

    #[test]
    fn test_length() {
        assert_eq!(apply("Length", "héllo".into(), &[]).unwrap(), FormValue::Integer(5));
        assert_eq!(apply("Length", numbers(), &[]).unwrap(), FormValue::Integer(3));
        assert_eq!(apply("Length", FormValue::NoValue, &[]).unwrap(), FormValue::Integer(0));
        assert!(apply("Length", true.into(), &[]).is_err());
    }

    #[test]
    fn test_join() {
        assert_eq!(apply("Join", numbers(), &[]).unwrap(), FormValue::from("1, 2, 3"));
        assert_eq!(
            apply("Join", numbers(), &["-".into()]).unwrap(),
            FormValue::from("1-2-3")
        );
    }

    #[test]
    fn test_contains() {
        assert_eq!(
            apply("Contains", numbers(), &[2.into()]).unwrap(),
            FormValue::Boolean(true)
        );
        assert_eq!(
            apply("Contains", "form binding".into(), &["bind".into()]).unwrap(),
            FormValue::Boolean(true)
        );
        assert_eq!(
            apply("Contains", FormValue::Null, &["x".into()]).unwrap(),
            FormValue::Boolean(false)
        );
    }

    #[test]
    fn test_default() {
        assert_eq!(
            apply("Default", FormValue::NoValue, &["guest".into()]).unwrap(),
            FormValue::from("guest")
        );
        assert_eq!(
            apply("Default", "".into(), &["guest".into()]).unwrap(),
            FormValue::from("guest")
        );
        assert_eq!(
            apply("Default", "Ada".into(), &["guest".into()]).unwrap(),
            FormValue::from("Ada")
        );
    }
}
