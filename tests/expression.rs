use scope_watch::{Evaluator, ExprError, Interpreter, Scope, Value};
use serde_json::json;

fn scope_with_user() -> Scope {
    let scope = Scope::new();
    scope.set(
        "user",
        json!({"name": "Ada", "age": 36, "roles": ["admin", "dev"], "manager": null}),
    );
    scope.set("limit", 18);
    scope
}

#[test]
fn test_paths_comparisons_and_negation() {
    let scope = scope_with_user();
    let interpreter = Interpreter::new();

    let cases = [
        ("user.name", Value::from("Ada")),
        ("user.roles[0]", Value::from("admin")),
        ("user.roles.length", Value::from(2)),
        ("user.age >= limit", Value::Bool(true)),
        ("user.name === 'Ada'", Value::Bool(true)),
        ("user.age == '36'", Value::Bool(true)),
        ("user.age === '36'", Value::Bool(false)),
        ("!!user.manager", Value::Bool(false)),
        ("user.manager == undefined", Value::Bool(true)),
        ("user.age > 30 && user.roles.length > 1", Value::Bool(true)),
        ("user.nickname || user.name", Value::from("Ada")),
        ("(user.age - 6) / 10", Value::from(3)),
    ];
    for (source, expected) in cases {
        assert_eq!(interpreter.evaluate(source, &scope), expected, "{source}");
    }
}

#[test]
fn test_child_scope_resolves_through_chain() {
    let parent = scope_with_user();
    let child = parent.generate();
    child.set("limit", 40);

    assert_eq!(child.evaluate("user.age >= limit"), Value::Bool(false));
    assert_eq!(parent.evaluate("user.age >= limit"), Value::Bool(true));
}

#[test]
fn test_assignment_through_scope() {
    let scope = scope_with_user();
    scope.assign("user.name", "Grace");
    scope.assign("user.roles[2]", "ops");
    scope.assign("visits", 1);

    assert_eq!(scope.evaluate("user.name"), Value::from("Grace"));
    assert_eq!(scope.evaluate("user.roles.length"), Value::from(3));
    assert_eq!(scope.get("visits"), Value::from(1));
}

#[test]
fn test_errors_are_typed() {
    let scope = scope_with_user();
    let interpreter = Interpreter::new();

    assert_eq!(
        interpreter.try_evaluate("user.manager.name", &scope),
        Err(ExprError::NilAccess {
            property: "name".into(),
            target: "null",
        })
    );
    assert_eq!(
        interpreter.try_evaluate("user.name()", &scope),
        Err(ExprError::NotCallable {
            callee: "user.name".into()
        })
    );
    assert!(matches!(
        interpreter.try_evaluate("user.", &scope),
        Err(ExprError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        interpreter.try_assign("user.name + 1", &scope, Value::Null),
        Err(ExprError::InvalidAssignmentTarget { .. })
    ));
    assert_eq!(
        ExprError::NilAccess {
            property: "name".into(),
            target: "null"
        }
        .to_string(),
        "cannot read property 'name' of null"
    );
}

#[test]
fn test_oversized_array_writes_are_refused() {
    let scope = Scope::new();
    scope.set("items", json!([1, 2]));
    scope.set("i", 1u32 << 31);
    let interpreter = Interpreter::new();

    scope.assign("items.length", Value::Number(f64::INFINITY));
    scope.assign("items[i * 8]", "x");
    assert_eq!(scope.evaluate("items.length"), Value::from(2));

    assert_eq!(
        interpreter.try_assign("items.length", &scope, Value::Number(f64::INFINITY)),
        Err(ExprError::InvalidArrayLength {
            value: "Infinity".into()
        })
    );
    assert!(matches!(
        interpreter.try_assign("items[i * 8]", &scope, Value::from("x")),
        Err(ExprError::NotAssignable { .. })
    ));

    scope.assign("items[2]", "x");
    scope.assign("items.length", 4);
    assert_eq!(scope.evaluate("items.length"), Value::from(4));
    assert_eq!(scope.evaluate("items[2]"), Value::from("x"));
}

#[test]
fn test_runaway_nesting_evaluates_to_undefined() {
    let scope = Scope::new();
    scope.set("a", 1);
    let source = format!("{}a{}", "(".repeat(100_000), ")".repeat(100_000));

    assert_eq!(scope.evaluate(&source), Value::Undefined);
    assert!(matches!(
        Interpreter::new().try_evaluate(&source, &scope),
        Err(ExprError::UnexpectedToken { .. })
    ));
}
