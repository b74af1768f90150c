//! Data model and value types for binding expressions
//!
//! This module provides the runtime value model, the data context capability
//! that models and ambient contexts implement, and a stock observable object.

#![warn(missing_docs)]

pub mod context;
pub mod culture;
pub mod json;
pub mod observable;
pub mod value;

pub use context::{DataContext, PropertyChangedHandler, SubscriptionId};
pub use culture::Culture;
pub use observable::ObservableObject;
pub use value::{Collection, FormValue};
