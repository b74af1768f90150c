//! Conversion from JSON documents

use super::observable::ObservableObject;
use super::value::FormValue;
use rust_decimal::Decimal;
use serde_json::Value;
use std::rc::Rc;
use std::str::FromStr;

impl FormValue {
    /// Convert a JSON value; objects become [`ObservableObject`]s
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Boolean(b),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| parse_decimal(&n.to_string()).map(Self::Decimal))
                .unwrap_or(Self::Null),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::collection(items.into_iter().map(Self::from_json)),
            Value::Object(_) => Self::Object(ObservableObject::from_json(value)),
        }
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl ObservableObject {
    /// Build an object from a JSON object; other JSON kinds give an empty object
    pub fn from_json(value: Value) -> Rc<Self> {
        match value {
            Value::Object(map) => Self::with_properties(
                map.into_iter()
                    .map(|(name, value)| (name, FormValue::from_json(value))),
            ),
            _ => Self::new(),
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataContext;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(FormValue::from_json(json!(null)), FormValue::Null);
        assert_eq!(FormValue::from_json(json!(3)), FormValue::Integer(3));
        assert_eq!(
            FormValue::from_json(json!(1.25)),
            FormValue::Decimal(Decimal::from_str("1.25").unwrap())
        );
        assert_eq!(FormValue::from_json(json!("x")), FormValue::from("x"));
    }

    #[test]
    fn test_nested_objects() {
        let value = FormValue::from_json(json!({
            "Name": "Ada",
            "Address": { "City": "London" },
            "Tags": [1, 2]
        }));

        let object = value.as_object().unwrap();
        assert_eq!(object.read_property("Name"), Some(FormValue::from("Ada")));
        assert_eq!(
            object.read_property("Tags"),
            Some(FormValue::collection([FormValue::from(1), FormValue::from(2)]))
        );

        let address = object.read_property("Address").unwrap();
        assert_eq!(
            address.as_object().unwrap().read_property("City"),
            Some(FormValue::from("London"))
        );
    }
}
