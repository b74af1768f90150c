//! Dynamic expression bindings and validation pipelines for declarative forms
//!
//! Field attributes carry small templates such as
//! `{Binding Title|IsNotEmpty}`. The engine parses each template once, binds it
//! to a model / ambient context pair through a [`Proxy`], keeps the cached
//! value current as properties change, and feeds field values through
//! [`ValidationPipe`]s.
//!
//! ```
//! use formbind::{BindingContext, FormEngine, FormValue, ObservableObject};
//!
//! let engine = FormEngine::default();
//! let model = ObservableObject::with_properties([("Title", "Hello")]);
//! let proxy = engine
//!     .bind("{Binding Title|IsNotEmpty}", &BindingContext::new(&model))
//!     .unwrap();
//! assert_eq!(proxy.value(), FormValue::Boolean(true));
//!
//! model.set("Title", "");
//! assert_eq!(proxy.value(), FormValue::Boolean(false));
//! ```

pub mod ast;
pub mod binding;
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod evaluator;
pub mod form;
pub mod model;
pub mod parser;
pub mod registry;
pub mod template;
pub mod validation;

// Re-export main types
pub use ast::{DependencySet, ExpressionNode, PathRoot};
pub use binding::{BindingContext, ChangeSubscription, Proxy};
pub use cache::CacheStats;
pub use config::EngineConfig;
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use engine::FormEngine;
pub use evaluator::{EvaluationError, Evaluator};
pub use form::{
    CompiledField, CompiledForm, FieldDefinition, FormError, ValidatorDefinition, Visibility,
};
pub use model::{Collection, Culture, DataContext, FormValue, ObservableObject};
pub use parser::{ParseError, parse};
pub use registry::{Arity, FilterError, FilterRegistry, FormFilter};
pub use template::Template;
pub use validation::{
    ComparatorKind, FieldValidator, NullValuePolicy, ValidationPipe, ValidationResult,
    ValidationRule,
};
