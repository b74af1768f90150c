//! Declarative form definitions and their bound counterparts

pub mod compiled;
pub mod definition;
pub mod error;
pub mod visibility;

pub use compiled::{CompiledField, CompiledForm};
pub use definition::{ArgumentDefinition, FieldDefinition, ValidatorDefinition};
pub use error::{FormError, FormResult};
pub use visibility::Visibility;
