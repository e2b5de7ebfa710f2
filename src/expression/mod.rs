// ============================================================================
// scope-watch - Expressions
// The evaluator seam between scopes and binding strings
// ============================================================================
//
// Scopes never interpret strings themselves. `Scope::evaluate` and
// `Scope::assign` forward to the thread's active `Evaluator`, which is the
// caching `Interpreter` unless an application installs its own with
// `set_evaluator`.
// ============================================================================

mod eval;
mod lexer;
mod parser;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::core::error::ExprResult;
use crate::core::value::Value;
use crate::primitives::scope::Scope;

pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{BinaryOp, Expr, LogicalOp, UnaryOp, parse};

/// Turns expression strings into values read from (or written to) a scope.
///
/// Implementations must not panic on bad input: failures resolve to
/// `Value::Undefined` for reads and are ignored for writes.
pub trait Evaluator {
    fn evaluate(&self, expression: &str, scope: &Scope) -> Value;

    fn assign(&self, expression: &str, scope: &Scope, value: Value);
}

/// Default evaluator: parses each distinct string once and walks the tree.
///
/// # Example
///
/// ```
/// use scope_watch::{Interpreter, Scope, Value};
///
/// let scope = Scope::new();
/// scope.set("count", 2);
///
/// let interpreter = Interpreter::new();
/// assert_eq!(interpreter.try_evaluate("count * 10", &scope), Ok(Value::from(20)));
/// assert!(interpreter.try_evaluate("count.", &scope).is_err());
/// ```
#[derive(Default)]
pub struct Interpreter {
    cache: RefCell<HashMap<String, Rc<Expr>>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source`, reusing an earlier parse of the same string.
    pub fn compile(&self, source: &str) -> ExprResult<Rc<Expr>> {
        if let Some(expr) = self.cache.borrow().get(source) {
            return Ok(expr.clone());
        }
        let expr = Rc::new(parse(source)?);
        self.cache
            .borrow_mut()
            .insert(source.to_owned(), expr.clone());
        Ok(expr)
    }

    pub fn try_evaluate(&self, source: &str, scope: &Scope) -> ExprResult<Value> {
        let expr = self.compile(source)?;
        eval::evaluate(&expr, scope)
    }

    pub fn try_assign(&self, source: &str, scope: &Scope, value: Value) -> ExprResult<()> {
        let expr = self.compile(source)?;
        eval::assign(&expr, scope, value)
    }

    /// Number of distinct expressions parsed so far.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl Evaluator for Interpreter {
    fn evaluate(&self, expression: &str, scope: &Scope) -> Value {
        match self.try_evaluate(expression, scope) {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(expression, %error, "expression evaluated to undefined");
                Value::Undefined
            }
        }
    }

    fn assign(&self, expression: &str, scope: &Scope, value: Value) {
        if let Err(error) = self.try_assign(expression, scope, value) {
            tracing::debug!(expression, %error, "expression assignment ignored");
        }
    }
}
