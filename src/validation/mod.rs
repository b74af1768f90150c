//! Validation rules, pipes and live field validators

pub mod comparator;
pub mod field;
pub mod pipe;
pub mod rule;

pub use comparator::{Comparator, ComparatorKind};
pub use field::{FieldValidator, ResultSubscription};
pub use pipe::{ValidationPipe, ValidationResult};
pub use rule::{MessageSource, NullValuePolicy, RuleOutcome, ValidationRule, ValueConverter};
