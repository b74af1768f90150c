//! Visibility of a compiled field

use crate::model::FormValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a field is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Shown
    #[default]
    Visible,
    /// Not shown, space still reserved
    Hidden,
    /// Not shown, no space reserved
    Collapsed,
}

impl Visibility {
    /// Convert a bound value
    ///
    /// Booleans map to visible or not visible, `Null` and `NoValue` to not
    /// visible, anything else to visible. `hidden_on_false` picks
    /// [`Hidden`](Visibility::Hidden) over [`Collapsed`](Visibility::Collapsed)
    /// for the not-visible case.
    pub fn from_value(value: &FormValue, hidden_on_false: bool) -> Self {
        let shown = match value {
            FormValue::Boolean(b) => *b,
            FormValue::Null | FormValue::NoValue => false,
            _ => true,
        };
        match (shown, hidden_on_false) {
            (true, _) => Visibility::Visible,
            (false, true) => Visibility::Hidden,
            (false, false) => Visibility::Collapsed,
        }
    }

    /// Whether the field is shown
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Visible => "Visible",
            Visibility::Hidden => "Hidden",
            Visibility::Collapsed => "Collapsed",
        })
    }
}
