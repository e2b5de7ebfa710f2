//! Benchmarks for scope-watch
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use scope_watch::{Array, Interpreter, Node, Object, Scope, Value, bindings};

// =============================================================================
// APPLY BENCHMARKS
// =============================================================================

fn bench_apply_unchanged(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_unchanged");
    for watchers in [10usize, 100, 1000] {
        let scope = Scope::new();
        scope.set("value", 1);
        for _ in 0..watchers {
            scope.watch("value", |_, _| {});
        }
        scope.apply();
        group.bench_with_input(BenchmarkId::from_parameter(watchers), &scope, |b, scope| {
            b.iter(|| scope.apply())
        });
    }
    group.finish();
}

fn bench_apply_deep_tree(c: &mut Criterion) {
    let root = Scope::new();
    root.set("n", 0);
    let mut level = vec![root.clone()];
    for _ in 0..4 {
        let mut next = Vec::new();
        for scope in &level {
            for _ in 0..4 {
                let child = scope.generate();
                child.watch("n + 1", |_, _| {});
                next.push(child);
            }
        }
        level = next;
    }

    let mut n = 0;
    c.bench_function("apply_tree_341_scopes", |b| {
        b.iter(|| {
            n += 1;
            root.set("n", n);
            root.apply()
        })
    });
}

// =============================================================================
// EXPRESSION BENCHMARKS
// =============================================================================

fn bench_expression(c: &mut Criterion) {
    let scope = Scope::new();
    scope.set(
        "user",
        Object::from_pairs([("age", Value::from(36)), ("name", Value::from("Ada"))]),
    );
    let interpreter = Interpreter::new();

    c.bench_function("evaluate_cached", |b| {
        b.iter(|| black_box(interpreter.try_evaluate("user.age >= 18 && user.name", &scope)))
    });
}

// =============================================================================
// REPEAT BENCHMARKS
// =============================================================================

fn rows(ids: impl Iterator<Item = i32>) -> Array {
    Array::from_vec(
        ids.map(|id| Value::from(Object::from_pairs([("id", Value::from(id))])))
            .collect(),
    )
}

fn bench_repeat(c: &mut Criterion) {
    let mut group = c.benchmark_group("repeat");
    for len in [10i32, 100, 1000] {
        let scope = Scope::new();
        let forward = rows(0..len);
        let reversed = rows((0..len).rev());
        scope.set("rows", forward.clone());

        let body = Node::element("tbody");
        let reconciler = scope.repeat(
            "rows",
            "row",
            |row| {
                let tr = Node::element("tr");
                bindings::bind_text(row, "row.id", &tr);
                tr
            },
            Some("id"),
        );
        reconciler.mount(&body);
        scope.apply();

        let mut flip = false;
        group.bench_with_input(BenchmarkId::new("reverse", len), &len, |b, _| {
            b.iter(|| {
                flip = !flip;
                let next = if flip { &reversed } else { &forward };
                scope.set("rows", next.clone());
                scope.apply();
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_apply_unchanged,
    bench_apply_deep_tree,
    bench_expression,
    bench_repeat,
);
criterion_main!(benches);
