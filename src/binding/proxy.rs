// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Binding proxy: a live, cached evaluation of one template

use super::coalesce::{RecomputeGuard, RunOutcome};
use super::context::BindingContext;
use super::listeners::{ListenerSet, Subscription};
use crate::ast::PathRoot;
use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use crate::evaluator::Evaluator;
use crate::model::{DataContext, FormValue, PropertyChangedHandler, SubscriptionId};
use crate::template::Template;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Keeps a proxy change listener attached; dropping it detaches the listener
pub type ChangeSubscription = Subscription<FormValue>;

enum ProxySource {
    Template {
        template: Arc<Template>,
        evaluator: Evaluator,
    },
    Constant(FormValue),
}

impl ProxySource {
    fn evaluate(&self, binding: &BindingContext) -> FormValue {
        match self {
            ProxySource::Template {
                template,
                evaluator,
            } => evaluator.evaluate(template.root(), binding),
            ProxySource::Constant(value) => value.clone(),
        }
    }

    fn describe(&self) -> String {
        match self {
            ProxySource::Template { template, .. } => template.source().to_string(),
            ProxySource::Constant(value) => format!("{value:?}"),
        }
    }
}

struct ActiveSubscription {
    object: Weak<dyn DataContext>,
    id: SubscriptionId,
}

struct ProxyState {
    binding: BindingContext,
    cached: FormValue,
    generation: u64,
    subscriptions: SmallVec<[ActiveSubscription; 4]>,
    disposed: bool,
    last_diagnostic: Option<Diagnostic>,
}

struct ProxyInner {
    source: ProxySource,
    guard: RecomputeGuard,
    state: RefCell<ProxyState>,
    listeners: ListenerSet<FormValue>,
}

/// Live handle binding one template to one [`BindingContext`]
///
/// The proxy caches the last evaluated value and re-evaluates when a
/// watched property changes. Listeners registered with
/// [`on_changed`](Proxy::on_changed) fire only when a recompute produces a
/// value different from the cached one, or on a context swap.
///
/// Clones share the same proxy; it is disposed when the last clone drops.
#[derive(Clone)]
pub struct Proxy {
    inner: Rc<ProxyInner>,
}

impl Proxy {
    /// Bind `template` to `binding` with the default pass limit
    pub fn new(template: Arc<Template>, binding: BindingContext, evaluator: Evaluator) -> Self {
        Self::with_pass_limit(
            template,
            binding,
            evaluator,
            EngineConfig::default().max_coalesced_passes,
        )
    }

    /// Bind `template` to `binding`, allowing `max_coalesced_passes` passes per recompute
    pub fn with_pass_limit(
        template: Arc<Template>,
        binding: BindingContext,
        evaluator: Evaluator,
        max_coalesced_passes: usize,
    ) -> Self {
        let source = ProxySource::Template {
            template,
            evaluator,
        };
        let proxy = Self::from_source(source, binding, max_coalesced_passes);
        ProxyInner::subscribe_all(&proxy.inner);
        proxy
    }

    /// Proxy whose value never changes
    pub fn constant(value: impl Into<FormValue>) -> Self {
        Self::from_source(ProxySource::Constant(value.into()), BindingContext::empty(), 1)
    }

    fn from_source(source: ProxySource, binding: BindingContext, max_passes: usize) -> Self {
        let cached = source.evaluate(&binding);
        Self {
            inner: Rc::new(ProxyInner {
                source,
                guard: RecomputeGuard::new(max_passes),
                state: RefCell::new(ProxyState {
                    binding,
                    cached,
                    generation: 0,
                    subscriptions: SmallVec::new(),
                    disposed: false,
                    last_diagnostic: None,
                }),
                listeners: ListenerSet::new(),
            }),
        }
    }

    /// Current cached value
    pub fn value(&self) -> FormValue {
        self.inner.state.borrow().cached.clone()
    }

    /// Truthiness of the cached value
    pub fn is_truthy(&self) -> bool {
        self.inner.state.borrow().cached.is_truthy()
    }

    /// Number of times the cached value has been replaced
    pub fn generation(&self) -> u64 {
        self.inner.state.borrow().generation
    }

    /// Template this proxy evaluates, `None` for constants
    pub fn template(&self) -> Option<&Arc<Template>> {
        match &self.inner.source {
            ProxySource::Template { template, .. } => Some(template),
            ProxySource::Constant(_) => None,
        }
    }

    /// Whether the proxy has a fixed value
    pub fn is_constant(&self) -> bool {
        matches!(self.inner.source, ProxySource::Constant(_))
    }

    /// Warning emitted when the last recompute was cut off
    pub fn last_diagnostic(&self) -> Option<Diagnostic> {
        self.inner.state.borrow().last_diagnostic.clone()
    }

    /// Current model / ambient context pair
    pub fn binding_context(&self) -> BindingContext {
        self.inner.state.borrow().binding.clone()
    }

    /// Register a change listener; it stays attached while the guard lives
    pub fn on_changed(&self, listener: impl Fn(&FormValue) + 'static) -> ChangeSubscription {
        self.inner.listeners.add(listener)
    }

    /// Re-evaluate now, notifying listeners if the value changed
    pub fn refresh(&self) {
        ProxyInner::recompute(&self.inner, false);
    }

    /// Swap the whole context pair
    ///
    /// Old subscriptions are released, new ones made, and listeners are
    /// notified once even if the value did not change.
    pub fn set_binding_context(&self, binding: BindingContext) {
        if self.is_disposed() {
            return;
        }
        self.inner.unsubscribe_all();
        self.inner.state.borrow_mut().binding = binding;
        ProxyInner::subscribe_all(&self.inner);
        log::trace!("Context swapped for `{}`", self.inner.source.describe());
        ProxyInner::recompute(&self.inner, true);
    }

    /// Swap the model, keeping the ambient context
    pub fn set_model<M: DataContext + 'static>(&self, model: &Rc<M>) {
        let binding = self.binding_context().with_model(model);
        self.set_binding_context(binding);
    }

    /// Swap the ambient context, keeping the model
    pub fn set_context<C: DataContext + 'static>(&self, context: &Rc<C>) {
        let binding = self.binding_context().with_context(context);
        self.set_binding_context(binding);
    }

    /// Release all subscriptions and listeners; idempotent
    pub fn dispose(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.disposed = true;
        }
        self.inner.unsubscribe_all();
        self.inner.listeners.clear();
        log::trace!("Disposed proxy for `{}`", self.inner.source.describe());
    }

    /// Whether [`dispose`](Proxy::dispose) has run
    pub fn is_disposed(&self) -> bool {
        self.inner.state.borrow().disposed
    }

    /// Whether two handles refer to the same proxy
    pub fn ptr_eq(&self, other: &Proxy) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ProxyInner {
    /// Subscribe to every segment of every path along the current object chain
    fn subscribe_all(this: &Rc<ProxyInner>) {
        let ProxySource::Template { template, .. } = &this.source else {
            return;
        };
        let binding = this.state.borrow().binding.clone();
        let mut subscriptions = SmallVec::new();
        let mut seen: FxHashSet<(*const (), &str)> = FxHashSet::default();

        for root in [PathRoot::Model, PathRoot::Context] {
            let Some(object) = binding.root(root) else {
                continue;
            };
            for path in template.dependencies().paths(root) {
                let mut current = Rc::clone(&object);
                for (index, segment) in path.iter().enumerate() {
                    if seen.insert((Rc::as_ptr(&current) as *const (), segment.as_str())) {
                        let id = current.subscribe(segment, Self::dependency_handler(this));
                        subscriptions.push(ActiveSubscription {
                            object: Rc::downgrade(&current),
                            id,
                        });
                    }
                    if index + 1 == path.len() {
                        break;
                    }
                    match current.read_property(segment) {
                        Some(FormValue::Object(nested)) => current = nested,
                        _ => break,
                    }
                }
            }
        }

        this.state.borrow_mut().subscriptions = subscriptions;
    }

    fn dependency_handler(this: &Rc<ProxyInner>) -> PropertyChangedHandler {
        let proxy = Rc::downgrade(this);
        Rc::new(move |_| {
            if let Some(proxy) = proxy.upgrade() {
                ProxyInner::dependency_changed(&proxy);
            }
        })
    }

    fn dependency_changed(this: &Rc<ProxyInner>) {
        if this.state.borrow().disposed {
            return;
        }
        // an intermediate object may have been replaced
        let nested = match &this.source {
            ProxySource::Template { template, .. } => template.dependencies().has_nested_paths(),
            ProxySource::Constant(_) => false,
        };
        if nested {
            this.unsubscribe_all();
            Self::subscribe_all(this);
        }
        Self::recompute(this, false);
    }

    fn recompute(this: &Rc<ProxyInner>, force: bool) {
        if this.state.borrow().disposed {
            return;
        }

        let outcome = this.guard.run(force, |force| {
            let binding = this.state.borrow().binding.clone();
            let value = this.source.evaluate(&binding);

            let changed = {
                let mut state = this.state.borrow_mut();
                if !state.disposed && (force || state.cached != value) {
                    state.cached = value.clone();
                    state.generation += 1;
                    true
                } else {
                    false
                }
            };

            if changed {
                log::trace!("`{}` changed to {value:?}", this.source.describe());
                this.listeners.notify(&value);
            }
        });

        if let RunOutcome::CutOff { passes } = outcome {
            let source = this.source.describe();
            log::warn!("`{source}` did not settle after {passes} coalesced passes");
            this.state.borrow_mut().last_diagnostic = Some(
                DiagnosticBuilder::warning(DiagnosticCode::DependencyCycle)
                    .with_message(format!(
                        "expression did not settle after {passes} coalesced passes"
                    ))
                    .with_source(source)
                    .build(),
            );
        }
    }

    fn unsubscribe_all(&self) {
        let subscriptions = std::mem::take(&mut self.state.borrow_mut().subscriptions);
        for subscription in subscriptions {
            if let Some(object) = subscription.object.upgrade() {
                object.unsubscribe(subscription.id);
            }
        }
    }
}

impl Drop for ProxyInner {
    fn drop(&mut self) {
        self.unsubscribe_all();
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Proxy")
            .field("source", &self.inner.source.describe())
            .field("value", &state.cached)
            .field("generation", &state.generation)
            .field("disposed", &state.disposed)
            .finish()
    }
}
