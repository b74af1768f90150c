//! Culture-aware stringification

use super::value::FormValue;

/// Formatting conventions used when values are stringified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Culture {
    /// Culture name, e.g. `"de-DE"`; empty for the invariant culture
    pub name: String,
    /// Separator between integer and fractional digits
    pub decimal_separator: char,
    /// Text for `true`
    pub true_text: String,
    /// Text for `false`
    pub false_text: String,
    /// Separator placed between collection items
    pub list_separator: String,
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

impl Culture {
    /// Culture-independent formatting
    pub fn invariant() -> Self {
        Self {
            name: String::new(),
            decimal_separator: '.',
            true_text: "true".to_string(),
            false_text: "false".to_string(),
            list_separator: ", ".to_string(),
        }
    }

    /// Invariant conventions with a different decimal separator
    pub fn new(name: impl Into<String>, decimal_separator: char) -> Self {
        Self {
            name: name.into(),
            decimal_separator,
            ..Self::invariant()
        }
    }

    /// Stringify a value for interpolation and string filters
    pub fn format(&self, value: &FormValue) -> String {
        let mut out = String::new();
        self.format_into(value, &mut out);
        out
    }

    fn format_into(&self, value: &FormValue, out: &mut String) {
        match value {
            FormValue::NoValue | FormValue::Null => {}
            FormValue::Boolean(true) => out.push_str(&self.true_text),
            FormValue::Boolean(false) => out.push_str(&self.false_text),
            FormValue::Integer(i) => out.push_str(&i.to_string()),
            FormValue::Decimal(d) => {
                let text = d.to_string();
                if self.decimal_separator == '.' {
                    out.push_str(&text);
                } else {
                    out.extend(text.chars().map(|c| {
                        if c == '.' {
                            self.decimal_separator
                        } else {
                            c
                        }
                    }));
                }
            }
            FormValue::String(s) => out.push_str(s),
            FormValue::Collection(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.push_str(&self.list_separator);
                    }
                    self.format_into(item, out);
                }
            }
            FormValue::Object(object) => out.push_str(object.type_name()),
        }
    }
}
