// ============================================================================
// scope-watch - Expression Interpreter
// Tree-walking evaluation of a parsed expression against a scope
// ============================================================================

use std::cmp::Ordering;

use crate::core::error::{ExprError, ExprResult};
use crate::core::value::{Value, format_number};
use crate::primitives::scope::Scope;
use crate::reactivity::equality::{loose_equals, strict_equals};

use super::parser::{BinaryOp, Expr, LogicalOp, UnaryOp};

pub(crate) fn evaluate(expr: &Expr, scope: &Scope) -> ExprResult<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Identifier(name) => Ok(scope.get(name)),
        Expr::Member { object, property } => {
            let target = evaluate(object, scope)?;
            read_member(&target, property)
        }
        Expr::Index { object, index } => {
            let target = evaluate(object, scope)?;
            let key = property_key(&evaluate(index, scope)?);
            read_member(&target, &key)
        }
        Expr::Call { callee, args } => {
            let function = evaluate(callee, scope)?;
            let Value::Function(function) = function else {
                return Err(ExprError::NotCallable {
                    callee: callee.describe(),
                });
            };
            let args = args
                .iter()
                .map(|arg| evaluate(arg, scope))
                .collect::<ExprResult<Vec<_>>>()?;
            Ok(function.call(&args))
        }
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, scope)?;
            Ok(match op {
                UnaryOp::Not => Value::Bool(!value.truthy()),
                UnaryOp::Negate => Value::Number(-value.to_number()),
                UnaryOp::Plus => Value::Number(value.to_number()),
            })
        }
        Expr::Binary { op, left, right } => {
            let left = evaluate(left, scope)?;
            let right = evaluate(right, scope)?;
            Ok(binary(*op, &left, &right))
        }
        Expr::Logical { op, left, right } => {
            let left = evaluate(left, scope)?;
            match (op, left.truthy()) {
                (LogicalOp::And, false) | (LogicalOp::Or, true) => Ok(left),
                _ => evaluate(right, scope),
            }
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if evaluate(test, scope)?.truthy() {
                evaluate(consequent, scope)
            } else {
                evaluate(alternate, scope)
            }
        }
        Expr::Assign { target, value } => {
            let value = evaluate(value, scope)?;
            assign(target, scope, value.clone())?;
            Ok(value)
        }
    }
}

/// Write `value` to the location `target` names.
pub(crate) fn assign(target: &Expr, scope: &Scope, value: Value) -> ExprResult<()> {
    match target {
        Expr::Identifier(name) => {
            scope.set(name, value);
            Ok(())
        }
        Expr::Member { object, property } => {
            let object = evaluate(object, scope)?;
            write_member(&object, property, value)
        }
        Expr::Index { object, index } => {
            let object = evaluate(object, scope)?;
            let key = property_key(&evaluate(index, scope)?);
            write_member(&object, &key, value)
        }
        other => Err(ExprError::InvalidAssignmentTarget {
            target: other.describe(),
        }),
    }
}

fn read_member(target: &Value, property: &str) -> ExprResult<Value> {
    if target.is_nullish() {
        return Err(ExprError::NilAccess {
            property: property.to_owned(),
            target: nil_name(target),
        });
    }
    Ok(target.member(property))
}

fn write_member(target: &Value, property: &str, value: Value) -> ExprResult<()> {
    if target.is_nullish() {
        return Err(ExprError::NilAccess {
            property: property.to_owned(),
            target: nil_name(target),
        });
    }
    target.set_member(property, value)
}

fn nil_name(value: &Value) -> &'static str {
    if value.is_null() { "null" } else { "undefined" }
}

fn property_key(index: &Value) -> String {
    match index {
        Value::Number(n) => format_number(*n),
        other => other.to_display_string(),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Eq => Value::Bool(loose_equals(left, right)),
        BinaryOp::NotEq => Value::Bool(!loose_equals(left, right)),
        BinaryOp::StrictEq => Value::Bool(strict_equals(left, right)),
        BinaryOp::StrictNotEq => Value::Bool(!strict_equals(left, right)),
        BinaryOp::Less => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::LessEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Greater => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::GreaterEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
    }
}

/// `+` concatenates when either side is a string or a reference value.
fn add(left: &Value, right: &Value) -> Value {
    let concatenates = |v: &Value| {
        matches!(
            v,
            Value::String(_) | Value::Array(_) | Value::Object(_) | Value::Function(_)
        )
    };
    if concatenates(left) || concatenates(right) {
        let mut text = left.to_display_string();
        text.push_str(&right.to_display_string());
        Value::from(text)
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

/// Relational ordering: two strings compare lexically, anything else
/// numerically. `None` when a side is `NaN`.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parser::parse;
    use serde_json::json;

    fn run(source: &str, scope: &Scope) -> ExprResult<Value> {
        evaluate(&parse(source)?, scope)
    }

    #[test]
    fn arithmetic_and_concatenation() {
        let scope = Scope::new();
        scope.set("n", 4);
        assert_eq!(run("n * 2 + 1", &scope), Ok(Value::from(9)));
        assert_eq!(run("7 % n", &scope), Ok(Value::from(3)));
        assert_eq!(run("'n=' + n", &scope), Ok(Value::from("n=4")));
        assert_eq!(run("-n", &scope), Ok(Value::from(-4)));
    }

    #[test]
    fn comparisons_follow_script_rules() {
        let scope = Scope::new();
        scope.set("a", 1);
        scope.set("s", "1");
        assert_eq!(run("a == s", &scope), Ok(Value::Bool(true)));
        assert_eq!(run("a === s", &scope), Ok(Value::Bool(false)));
        assert_eq!(run("null == undefined", &scope), Ok(Value::Bool(true)));
        assert_eq!(run("'b' > 'a'", &scope), Ok(Value::Bool(true)));
        assert_eq!(run("a < missing", &scope), Ok(Value::Bool(false)));
    }

    #[test]
    fn logical_operators_return_operands() {
        let scope = Scope::new();
        scope.set("name", "");
        assert_eq!(run("name || 'anonymous'", &scope), Ok(Value::from("anonymous")));
        assert_eq!(run("name && boom()", &scope), Ok(Value::from("")));
        assert_eq!(run("!!name", &scope), Ok(Value::Bool(false)));
    }

    #[test]
    fn member_paths_and_length() {
        let scope = Scope::new();
        scope.set("user", json!({"tags": ["a", "bc"], "profile": {"age": 30}}));
        assert_eq!(run("user.profile.age", &scope), Ok(Value::from(30)));
        assert_eq!(run("user.tags.length", &scope), Ok(Value::from(2)));
        assert_eq!(run("user.tags[1].length", &scope), Ok(Value::from(2)));
        assert_eq!(run("user['profile'].age >= 18", &scope), Ok(Value::Bool(true)));
        assert_eq!(run("user.nothing", &scope), Ok(Value::Undefined));
    }

    #[test]
    fn nil_access_is_an_error() {
        let scope = Scope::new();
        assert_eq!(
            run("missing.field", &scope),
            Err(ExprError::NilAccess {
                property: "field".into(),
                target: "undefined",
            })
        );
    }

    #[test]
    fn calls_native_functions() {
        let scope = Scope::new();
        scope.set(
            "sum",
            crate::core::value::Function::new(|args| {
                Value::Number(args.iter().map(Value::to_number).sum())
            }),
        );
        assert_eq!(run("sum(1, 2, 3)", &scope), Ok(Value::from(6)));
        assert_eq!(
            run("total(1)", &scope),
            Err(ExprError::NotCallable { callee: "total".into() })
        );
    }

    #[test]
    fn assignment_targets() {
        let scope = Scope::new();
        scope.set("form", json!({"email": ""}));
        scope.set("list", json!([0, 0]));

        assert_eq!(run("count = 3", &scope), Ok(Value::from(3)));
        assert_eq!(scope.get("count"), Value::from(3));

        run("form.email = 'a@b'", &scope).expect("member assignment");
        assert_eq!(scope.get("form").member("email"), Value::from("a@b"));

        run("list[1] = 'x'", &scope).expect("index assignment");
        assert_eq!(scope.get("list").member("1"), Value::from("x"));

        assert!(matches!(
            run("missing.a = 1", &scope),
            Err(ExprError::NilAccess { .. })
        ));
    }

    #[test]
    fn ternary_picks_branch() {
        let scope = Scope::new();
        scope.set("count", 0);
        assert_eq!(
            run("count ? 'some' : 'none'", &scope),
            Ok(Value::from("none"))
        );
    }
}
