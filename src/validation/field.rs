//! Live validator bound to one field

use super::pipe::{ValidationPipe, ValidationResult};
use crate::binding::{
    ChangeSubscription, ListenerSet, Proxy, RecomputeGuard, RunOutcome, Subscription,
};
use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Keeps a result listener attached; dropping it detaches the listener
pub type ResultSubscription = Subscription<ValidationResult>;

struct ValidatorInner {
    field: Proxy,
    pipe: ValidationPipe,
    guard: RecomputeGuard,
    result: RefCell<ValidationResult>,
    listeners: ListenerSet<ValidationResult>,
    subscriptions: RefCell<Vec<ChangeSubscription>>,
    disposed: Cell<bool>,
    last_diagnostic: RefCell<Option<Diagnostic>>,
}

/// A [`ValidationPipe`] kept current against a field proxy
///
/// Re-validates when the field value changes and when any rule's argument,
/// enforcement or message proxy changes. Result listeners fire only when the
/// result differs from the cached one.
#[derive(Clone)]
pub struct FieldValidator {
    inner: Rc<ValidatorInner>,
}

impl FieldValidator {
    /// Bind `pipe` to `field`, allowing `max_coalesced_passes` passes per re-validation
    pub fn new(field: Proxy, pipe: ValidationPipe, max_coalesced_passes: usize) -> Self {
        let result = pipe.validate(&field.value());
        let inner = Rc::new(ValidatorInner {
            field,
            pipe,
            guard: RecomputeGuard::new(max_coalesced_passes),
            result: RefCell::new(result),
            listeners: ListenerSet::new(),
            subscriptions: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
            last_diagnostic: RefCell::new(None),
        });

        let mut subscriptions = Vec::new();
        let watched = std::iter::once(&inner.field)
            .chain(inner.pipe.rules().iter().flat_map(|rule| rule.proxies()));
        for proxy in watched {
            let validator = Rc::downgrade(&inner);
            subscriptions.push(proxy.on_changed(move |_| {
                if let Some(validator) = validator.upgrade() {
                    ValidatorInner::revalidate(&validator);
                }
            }));
        }
        *inner.subscriptions.borrow_mut() = subscriptions;

        Self { inner }
    }

    /// Latest result
    pub fn result(&self) -> ValidationResult {
        self.inner.result.borrow().clone()
    }

    /// Whether the latest result is valid
    pub fn is_valid(&self) -> bool {
        self.inner.result.borrow().is_valid
    }

    /// Error messages of the latest result
    pub fn errors(&self) -> Vec<String> {
        self.inner.result.borrow().errors.clone()
    }

    /// Field proxy being validated
    pub fn field(&self) -> &Proxy {
        &self.inner.field
    }

    /// Rules being applied
    pub fn pipe(&self) -> &ValidationPipe {
        &self.inner.pipe
    }

    /// Re-validate now and return the result
    pub fn validate(&self) -> ValidationResult {
        ValidatorInner::revalidate(&self.inner);
        self.result()
    }

    /// View pushed an edited value back into the source
    ///
    /// Re-validates only when some rule asks for target-updated validation.
    /// Returns whether validation ran.
    pub fn target_updated(&self) -> bool {
        if !self.inner.pipe.validates_on_target_updated() {
            return false;
        }
        ValidatorInner::revalidate(&self.inner);
        true
    }

    /// Register a result listener
    pub fn on_result_changed(
        &self,
        listener: impl Fn(&ValidationResult) + 'static,
    ) -> ResultSubscription {
        self.inner.listeners.add(listener)
    }

    /// Warning emitted when the last re-validation was cut off
    pub fn last_diagnostic(&self) -> Option<Diagnostic> {
        self.inner.last_diagnostic.borrow().clone()
    }

    /// Stop reacting to changes; idempotent
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.subscriptions.borrow_mut().clear();
        self.inner.listeners.clear();
    }

    /// Whether [`dispose`](FieldValidator::dispose) has run
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl ValidatorInner {
    fn revalidate(this: &Rc<ValidatorInner>) {
        if this.disposed.get() {
            return;
        }

        let outcome = this.guard.run(false, |_| {
            let result = this.pipe.validate(&this.field.value());
            let changed = {
                let mut cached = this.result.borrow_mut();
                if *cached != result {
                    *cached = result.clone();
                    true
                } else {
                    false
                }
            };
            if changed && !this.disposed.get() {
                log::trace!(
                    "Validation result changed: valid={} errors={:?}",
                    result.is_valid,
                    result.errors
                );
                this.listeners.notify(&result);
            }
        });

        if let RunOutcome::CutOff { passes } = outcome {
            log::warn!("Field validation did not settle after {passes} coalesced passes");
            *this.last_diagnostic.borrow_mut() = Some(
                DiagnosticBuilder::warning(DiagnosticCode::DependencyCycle)
                    .with_message(format!(
                        "validation did not settle after {passes} coalesced passes"
                    ))
                    .build(),
            );
        }
    }
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("field", &self.inner.field)
            .field("rules", &self.inner.pipe.len())
            .field("result", &*self.inner.result.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingContext;
    use crate::evaluator::Evaluator;
    use crate::model::{FormValue, ObservableObject};
    use crate::template::Template;
    use crate::validation::{ComparatorKind, ValidationRule};
    use pretty_assertions::assert_eq;

    fn bind(source: &str, model: &Rc<ObservableObject>) -> Proxy {
        Proxy::new(
            Template::shared(source).unwrap(),
            BindingContext::new(model),
            Evaluator::default(),
        )
    }

    #[test]
    fn test_revalidates_on_field_change() {
        let model = ObservableObject::with_properties([("Name", "Ada")]);
        let validator = FieldValidator::new(
            bind("{Binding Name}", &model),
            ValidationPipe::new()
                .with_rule(ValidationRule::new(ComparatorKind::Required).with_message("Required")),
            8,
        );
        assert!(validator.is_valid());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription =
            validator.on_result_changed(move |result| sink.borrow_mut().push(result.is_valid));

        model.set("Name", "");
        assert_eq!(validator.errors(), vec!["Required".to_string()]);

        // still empty: no second notification
        model.set("Name", FormValue::Null);
        model.set("Name", "Grace");
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn test_enforcement_change_revalidates_without_field_change() {
        let model = ObservableObject::with_properties([
            ("Name", FormValue::from("")),
            ("Check", FormValue::from(true)),
        ]);
        let validator = FieldValidator::new(
            bind("{Binding Name}", &model),
            ValidationPipe::new().with_rule(
                ValidationRule::new(ComparatorKind::Required)
                    .with_enforcement(bind("{Binding Check}", &model))
                    .with_message("Required"),
            ),
            8,
        );
        assert!(!validator.is_valid());

        model.set("Check", false);
        assert_eq!(validator.result(), ValidationResult::valid());
    }

    #[test]
    fn test_dynamic_argument_revalidates() {
        let model = ObservableObject::with_properties([("Age", 20), ("Minimum", 18)]);
        let validator = FieldValidator::new(
            bind("{Binding Age}", &model),
            ValidationPipe::new().with_rule(
                ValidationRule::new(ComparatorKind::GreaterThanOrEqual)
                    .with_argument(bind("{Binding Minimum}", &model))
                    .with_message(bind("Must be at least {Binding Minimum}", &model)),
            ),
            8,
        );
        assert!(validator.is_valid());

        model.set("Minimum", 21);
        assert_eq!(validator.errors(), vec!["Must be at least 21".to_string()]);
    }

    #[test]
    fn test_target_updated_respects_flag() {
        let model = ObservableObject::with_properties([("Name", "x")]);
        let quiet = FieldValidator::new(
            bind("{Binding Name}", &model),
            ValidationPipe::new().with_rule(ValidationRule::new(ComparatorKind::Required)),
            8,
        );
        assert!(!quiet.target_updated());

        let eager = FieldValidator::new(
            bind("{Binding Name}", &model),
            ValidationPipe::new().with_rule(
                ValidationRule::new(ComparatorKind::Required).with_validates_on_target_updated(true),
            ),
            8,
        );
        assert!(eager.target_updated());
    }

    #[test]
    fn test_dispose_stops_revalidation() {
        let model = ObservableObject::with_properties([("Name", "x")]);
        let validator = FieldValidator::new(
            bind("{Binding Name}", &model),
            ValidationPipe::new().with_rule(ValidationRule::new(ComparatorKind::Required)),
            8,
        );
        validator.dispose();
        validator.dispose();
        model.set("Name", "");
        assert!(validator.is_valid());
        assert!(validator.is_disposed());
    }
}
