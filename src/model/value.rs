//! Core value types for binding expressions

use super::context::DataContext;
use crate::ast::LiteralValue;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Runtime value produced by evaluating an expression
///
/// `NoValue` is the resolution-miss sentinel (missing property, null
/// intermediate, failed filter). It is distinct from a real `Null` read from
/// the model, and filters may special-case it.
#[derive(Clone)]
pub enum FormValue {
    /// Nothing could be resolved
    NoValue,

    /// An explicit null
    Null,

    /// Boolean value
    Boolean(bool),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Decimal value with arbitrary precision
    Decimal(Decimal),

    /// String value
    String(String),

    /// Ordered collection of values
    Collection(Collection),

    /// Nested object exposing the data context capability
    Object(Rc<dyn DataContext>),
}

/// Collection type that wraps a vector of values
#[derive(Clone, PartialEq, Default)]
pub struct Collection(Vec<FormValue>);

impl Collection {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a collection from a vector
    pub fn from_vec(values: Vec<FormValue>) -> Self {
        Self(values)
    }

    /// Get the length of the collection
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator over the values
    pub fn iter(&self) -> std::slice::Iter<'_, FormValue> {
        self.0.iter()
    }

    /// Check if the collection contains a value
    pub fn contains(&self, value: &FormValue) -> bool {
        self.0.contains(value)
    }

    /// Take ownership of the inner vector
    pub fn into_vec(self) -> Vec<FormValue> {
        self.0
    }
}

impl From<Vec<FormValue>> for Collection {
    fn from(values: Vec<FormValue>) -> Self {
        Self(values)
    }
}

impl IntoIterator for Collection {
    type Item = FormValue;
    type IntoIter = std::vec::IntoIter<FormValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a FormValue;
    type IntoIter = std::slice::Iter<'a, FormValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FormValue {
    /// Create a collection value
    pub fn collection(values: impl IntoIterator<Item = FormValue>) -> Self {
        Self::Collection(Collection::from_vec(values.into_iter().collect()))
    }

    /// Wrap an object implementing the data context capability
    pub fn object(object: Rc<dyn DataContext>) -> Self {
        Self::Object(object)
    }

    /// Convert an AST literal
    pub fn from_literal(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Null => Self::Null,
            LiteralValue::Boolean(b) => Self::Boolean(*b),
            LiteralValue::Integer(i) => Self::Integer(*i),
            LiteralValue::Decimal(d) => Self::Decimal(*d),
            LiteralValue::String(s) => Self::String(s.clone()),
        }
    }

    /// True for `NoValue`
    pub fn is_no_value(&self) -> bool {
        matches!(self, Self::NoValue)
    }

    /// True for `Null` and `NoValue`
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::NoValue)
    }

    /// True for null values, empty strings and empty collections
    pub fn is_empty(&self) -> bool {
        match self {
            Self::NoValue | Self::Null => true,
            Self::String(s) => s.is_empty(),
            Self::Collection(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Fixed truthiness rule: non-null, non-empty and non-zero values are true
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::NoValue | Self::Null => false,
            Self::Boolean(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Decimal(d) => !d.is_zero(),
            Self::String(s) => !s.is_empty(),
            Self::Collection(items) => !items.is_empty(),
            Self::Object(_) => true,
        }
    }

    /// Numeric view of integers and decimals
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(i) => Some(Decimal::from(*i)),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Borrow a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow a collection value
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow an object value
    pub fn as_object(&self) -> Option<&Rc<dyn DataContext>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Ordering between numbers, strings or booleans; `None` across kinds
    pub fn compare(&self, other: &FormValue) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            _ => Some(self.as_decimal()?.cmp(&other.as_decimal()?)),
        }
    }

    /// Name of the value's kind, used in error messages
    pub fn type_name(&self) -> &str {
        match self {
            Self::NoValue => "NoValue",
            Self::Null => "Null",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Decimal(_) => "Decimal",
            Self::String(_) => "String",
            Self::Collection(_) => "Collection",
            Self::Object(object) => object.type_name(),
        }
    }
}

impl PartialEq for FormValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NoValue, Self::NoValue) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Integer(a), Self::Decimal(b)) | (Self::Decimal(b), Self::Integer(a)) => {
                Decimal::from(*a) == *b
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Collection(a), Self::Collection(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl fmt::Debug for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValue => write!(f, "NoValue"),
            Self::Null => write!(f, "Null"),
            Self::Boolean(b) => write!(f, "Boolean({b})"),
            Self::Integer(i) => write!(f, "Integer({i})"),
            Self::Decimal(d) => write!(f, "Decimal({d})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Collection(items) => f.debug_list().entries(items.iter()).finish(),
            Self::Object(object) => write!(f, "Object({})", object.type_name()),
        }
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FormValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Decimal> for FormValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<FormValue>> for FormValue {
    fn from(values: Vec<FormValue>) -> Self {
        Self::Collection(Collection::from_vec(values))
    }
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_truthiness() {
        assert!(!FormValue::NoValue.is_truthy());
        assert!(!FormValue::Null.is_truthy());
        assert!(!FormValue::from(0).is_truthy());
        assert!(!FormValue::from("").is_truthy());
        assert!(!FormValue::collection([]).is_truthy());
        assert!(!FormValue::Decimal(Decimal::ZERO).is_truthy());

        assert!(FormValue::from(-1).is_truthy());
        assert!(FormValue::from("no").is_truthy());
        assert!(FormValue::collection([FormValue::Null]).is_truthy());
    }

    #[test]
    fn test_numeric_equality_across_kinds() {
        assert_eq!(
            FormValue::from(2),
            FormValue::Decimal(Decimal::from_str("2.0").unwrap())
        );
        assert_ne!(FormValue::from(2), FormValue::from("2"));
    }

    #[test]
    fn test_no_value_is_not_null() {
        assert_ne!(FormValue::NoValue, FormValue::Null);
        assert!(FormValue::NoValue.is_null());
        assert!(FormValue::Null.is_null());
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            FormValue::from(3).compare(&FormValue::Decimal(Decimal::from_str("2.5").unwrap())),
            Some(Ordering::Greater)
        );
        assert_eq!(
            FormValue::from("a").compare(&FormValue::from("b")),
            Some(Ordering::Less)
        );
        assert_eq!(FormValue::from("1").compare(&FormValue::from(1)), None);
        assert_eq!(FormValue::Null.compare(&FormValue::from(1)), None);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FormValue::from(None::<i64>), FormValue::Null);
        assert_eq!(FormValue::from(Some("x")), FormValue::from("x"));
    }
}
