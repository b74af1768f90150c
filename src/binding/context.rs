//! Model / ambient context pair

use crate::ast::PathRoot;
use crate::model::DataContext;
use std::fmt;
use std::rc::{Rc, Weak};

/// The (model, ambient context) pair an expression is evaluated against
///
/// Both sides are held weakly: the creator owns the objects, and a side
/// that has been dropped reads as unresolved.
#[derive(Clone, Default)]
pub struct BindingContext {
    model: Option<Weak<dyn DataContext>>,
    context: Option<Weak<dyn DataContext>>,
}

impl BindingContext {
    /// Context with neither a model nor an ambient context
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context reading `Binding` paths from `model`
    pub fn new<M: DataContext + 'static>(model: &Rc<M>) -> Self {
        Self::empty().with_model(model)
    }

    /// Replace the model
    pub fn with_model<M: DataContext + 'static>(mut self, model: &Rc<M>) -> Self {
        let weak: Weak<M> = Rc::downgrade(model);
        self.model = Some(weak);
        self
    }

    /// Replace the ambient context read by `ContextBinding` paths
    pub fn with_context<C: DataContext + 'static>(mut self, context: &Rc<C>) -> Self {
        let weak: Weak<C> = Rc::downgrade(context);
        self.context = Some(weak);
        self
    }

    /// Replace the model with an already type-erased object
    pub fn with_model_object(mut self, model: &Rc<dyn DataContext>) -> Self {
        self.model = Some(Rc::downgrade(model));
        self
    }

    /// Replace the ambient context with an already type-erased object
    pub fn with_context_object(mut self, context: &Rc<dyn DataContext>) -> Self {
        self.context = Some(Rc::downgrade(context));
        self
    }

    /// Live model, if set and not dropped
    pub fn model(&self) -> Option<Rc<dyn DataContext>> {
        self.model.as_ref().and_then(Weak::upgrade)
    }

    /// Live ambient context, if set and not dropped
    pub fn context(&self) -> Option<Rc<dyn DataContext>> {
        self.context.as_ref().and_then(Weak::upgrade)
    }

    /// Object a path with the given root starts from
    pub fn root(&self, root: PathRoot) -> Option<Rc<dyn DataContext>> {
        match root {
            PathRoot::Model => self.model(),
            PathRoot::Context => self.context(),
        }
    }
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = |side: Option<Rc<dyn DataContext>>| {
            side.map(|object| object.type_name().to_string())
        };
        f.debug_struct("BindingContext")
            .field("model", &describe(self.model()))
            .field("context", &describe(self.context()))
            .finish()
    }
}
