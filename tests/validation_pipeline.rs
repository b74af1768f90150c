//! Validation rules, pipes and live validators against observable models

use formbind::validation::{MessageSource, RuleOutcome};
use formbind::{
    BindingContext, ComparatorKind, DiagnosticCode, EngineConfig, FieldValidator, FormEngine,
    FormValue, NullValuePolicy, ObservableObject, Proxy, ValidationPipe, ValidationResult,
    ValidationRule,
};
use pretty_assertions::assert_eq;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn numbers() -> Proxy {
    Proxy::constant(FormValue::collection([1.into(), 2.into(), 3.into()]))
}

#[test]
fn not_exists_in_against_collection() {
    let rule = ValidationRule::new(ComparatorKind::NotExistsIn)
        .with_argument(numbers())
        .with_message("already used");
    assert_eq!(
        rule.validate(&2.into()),
        RuleOutcome::Failed("already used".to_string())
    );
    assert_eq!(rule.validate(&5.into()), RuleOutcome::Passed);
}

#[test]
fn not_exists_in_passes_vacuously_without_collection() {
    let rule = ValidationRule::new(ComparatorKind::NotExistsIn)
        .with_argument(Proxy::constant(3))
        .with_message("already used");
    for value in [FormValue::from(3), FormValue::from("x"), FormValue::Null] {
        assert!(rule.validate(&value).is_pass());
    }
}

#[test]
fn strict_pipe_reports_failing_rule() {
    let pipe = ValidationPipe::new()
        .with_rule(
            ValidationRule::new(ComparatorKind::IsTrue)
                .with_message("A failed")
                .with_strict(true),
        )
        .with_rule(
            ValidationRule::new(ComparatorKind::IsFalse)
                .with_message("B failed")
                .with_strict(true),
        );
    assert_eq!(
        pipe.validate(&false.into()),
        ValidationResult {
            is_valid: false,
            errors: vec!["A failed".to_string()],
        }
    );
}

#[test]
fn non_strict_pipe_keeps_first_failure_only() {
    let pipe = ValidationPipe::new()
        .with_rule(ValidationRule::new(ComparatorKind::Required).with_message("Required"))
        .with_rule(ValidationRule::new(ComparatorKind::IsTrue).with_message("A failed"));
    assert_eq!(
        pipe.validate(&FormValue::Null).errors,
        vec!["Required".to_string()]
    );
}

#[test]
fn disabling_enforcement_skips_comparator() {
    struct Counting(Arc<AtomicUsize>);
    impl formbind::validation::Comparator for Counting {
        fn name(&self) -> &str {
            "Counting"
        }
        fn compare(&self, _: &FormValue, _: &FormValue) -> bool {
            self.0.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let model = ObservableObject::with_properties([("Value", "x"), ("Enforce", "yes")]);
    let engine = FormEngine::new(EngineConfig::testing());
    let binding = BindingContext::new(&model);

    let validator = FieldValidator::new(
        engine.bind("{Binding Value}", &binding).unwrap(),
        ValidationPipe::new().with_rule(
            ValidationRule::new(ComparatorKind::custom(Counting(Arc::clone(&calls))))
                .with_enforcement(engine.bind("{Binding Enforce}", &binding).unwrap())
                .with_message("nope"),
        ),
        4,
    );
    assert!(!validator.is_valid());
    let before = calls.load(Ordering::Relaxed);

    model.set("Enforce", "");
    assert_eq!(validator.result(), ValidationResult::valid());
    assert_eq!(calls.load(Ordering::Relaxed), before);
}

#[test]
fn null_policies_short_circuit() {
    let base = ValidationRule::new(ComparatorKind::MinLength)
        .with_argument(Proxy::constant(3))
        .with_message("too short");

    let valid = base.clone().with_null_policy(NullValuePolicy::TreatAsValid);
    let invalid = base.clone().with_null_policy(NullValuePolicy::TreatAsInvalid);
    let skipped = base.clone().with_null_policy(NullValuePolicy::Skip);

    assert_eq!(valid.validate(&FormValue::Null), RuleOutcome::Passed);
    assert_eq!(
        invalid.validate(&FormValue::NoValue),
        RuleOutcome::Failed("too short".to_string())
    );
    assert_eq!(skipped.validate(&FormValue::Null), RuleOutcome::Skipped);
    assert_eq!(
        base.validate(&FormValue::Null),
        RuleOutcome::Failed("too short".to_string())
    );
}

#[test]
fn dynamic_message_follows_model() {
    let model = ObservableObject::with_properties([("Limit", 5)]);
    let engine = FormEngine::default();
    let message = engine
        .bind("At most {Binding Limit} characters", &BindingContext::new(&model))
        .unwrap();
    let rule = ValidationRule::new(ComparatorKind::MaxLength)
        .with_argument(Proxy::constant(2))
        .with_message(MessageSource::Proxy(message));

    assert_eq!(
        rule.validate(&"abc".into()),
        RuleOutcome::Failed("At most 5 characters".to_string())
    );
    model.set("Limit", 8);
    assert_eq!(
        rule.validate(&"abc".into()),
        RuleOutcome::Failed("At most 8 characters".to_string())
    );
}

#[test]
fn enforcement_cycle_is_bounded() {
    let engine = FormEngine::new(EngineConfig::testing());
    let model = ObservableObject::with_properties([
        ("Name", FormValue::from("a")),
        ("IsValid", FormValue::from(true)),
    ]);
    let binding = BindingContext::new(&model);

    // the rule is only enforced while the field is valid
    let validator = FieldValidator::new(
        engine.bind("{Binding Name}", &binding).unwrap(),
        ValidationPipe::new().with_rule(
            ValidationRule::new(ComparatorKind::Required)
                .with_enforcement(engine.bind("{Binding IsValid}", &binding).unwrap())
                .with_message("Required"),
        ),
        engine.config().max_coalesced_passes,
    );

    let writer = Rc::downgrade(&model);
    let _subscription = validator.on_result_changed(move |result| {
        if let Some(model) = writer.upgrade() {
            model.set("IsValid", result.is_valid);
        }
    });

    model.set("Name", "");

    let diagnostic = validator.last_diagnostic().expect("oscillation is reported");
    assert_eq!(diagnostic.code, DiagnosticCode::DependencyCycle);
    // cached result and model agree after the cut-off
    assert_eq!(
        model.get("IsValid"),
        Some(FormValue::Boolean(validator.is_valid()))
    );
}

#[test]
fn converging_feedback_settles_without_diagnostic() {
    let engine = FormEngine::new(EngineConfig::testing());
    let model = ObservableObject::with_properties([
        ("Name", FormValue::from("ok")),
        ("Errors", FormValue::from(0)),
    ]);
    let binding = BindingContext::new(&model);

    let validator = FieldValidator::new(
        engine.bind("{Binding Name}", &binding).unwrap(),
        ValidationPipe::new().with_rule(
            ValidationRule::new(ComparatorKind::Required)
                .with_enforcement(
                    engine
                        .bind("{Binding Errors|LessThan:5}", &binding)
                        .unwrap(),
                )
                .with_message("Required"),
        ),
        engine.config().max_coalesced_passes,
    );

    let writer = Rc::downgrade(&model);
    let _subscription = validator.on_result_changed(move |result| {
        if let Some(model) = writer.upgrade() {
            model.set("Errors", result.errors.len() as i64);
        }
    });

    model.set("Name", "");
    assert!(!validator.is_valid());
    assert_eq!(model.get("Errors"), Some(FormValue::Integer(1)));
    assert!(validator.last_diagnostic().is_none());
}
