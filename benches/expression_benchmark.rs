use criterion::{Criterion, criterion_group, criterion_main};
use formbind::{BindingContext, FormEngine, FormValue, ObservableObject, parse};
use std::hint::black_box;

const EXPRESSIONS: &[&str] = &[
    "{Binding Title}",
    "{Binding Title|IsNotEmpty}",
    "Hello {ContextBinding Greeting}, {Binding Name|Trim|ToUpper}!",
    "{Binding Count|GreaterThan:10 ? 'many' : (Binding Count|ToString)}",
    "{Binding Address.City|Default:'unknown'}",
];

fn benchmark_parser(c: &mut Criterion) {
    c.bench_function("parse_single", |b| {
        b.iter(|| black_box(parse(black_box("{Binding Title|IsNotEmpty}"))))
    });

    c.bench_function("parse_mixed", |b| {
        b.iter(|| {
            for expression in EXPRESSIONS {
                let _ = black_box(parse(black_box(expression)));
            }
        })
    });
}

fn benchmark_evaluation(c: &mut Criterion) {
    let engine = FormEngine::default();
    let model = ObservableObject::with_properties([
        ("Title", FormValue::from("Hello")),
        ("Name", FormValue::from("  ada  ")),
        ("Count", FormValue::from(12)),
    ]);
    let ambient = ObservableObject::with_properties([("Greeting", "Hi")]);
    let binding = BindingContext::new(&model).with_context(&ambient);

    let templates: Vec<_> = EXPRESSIONS
        .iter()
        .map(|source| engine.template(source).unwrap())
        .collect();

    c.bench_function("evaluate_mixed", |b| {
        b.iter(|| {
            for template in &templates {
                black_box(engine.evaluator().evaluate(template.root(), &binding));
            }
        })
    });

    c.bench_function("evaluate_cached_source", |b| {
        b.iter(|| black_box(engine.evaluate(black_box(EXPRESSIONS[2]), &binding)))
    });
}

fn benchmark_recompute(c: &mut Criterion) {
    let engine = FormEngine::default();
    let model = ObservableObject::with_properties([("Title", "a")]);
    let proxy = engine
        .bind("{Binding Title|IsNotEmpty}", &BindingContext::new(&model))
        .unwrap();

    let mut flip = false;
    c.bench_function("proxy_recompute", |b| {
        b.iter(|| {
            flip = !flip;
            model.set("Title", if flip { "" } else { "a" });
            black_box(proxy.value())
        })
    });
}

criterion_group!(
    benches,
    benchmark_parser,
    benchmark_evaluation,
    benchmark_recompute
);
criterion_main!(benches);
