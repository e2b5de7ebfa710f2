// ============================================================================
// scope-watch - Expression Parser
//
// Recursive descent, one function per precedence level:
//   assignment > conditional > or > and > equality > relational
//   > additive > multiplicative > unary > postfix > primary
// ============================================================================

use std::rc::Rc;

use crate::core::constants::MAX_EXPRESSION_DEPTH;
use crate::core::error::{ExprError, ExprResult};
use crate::core::value::Value;

use super::lexer::{Token, TokenKind, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// Parsed expression tree.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Value),
    Identifier(Rc<str>),
    Member {
        object: Box<Expr>,
        property: Rc<str>,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

impl Expr {
    /// Short source-like rendering for error messages.
    pub fn describe(&self) -> String {
        match self {
            Expr::Literal(value) => value.to_display_string(),
            Expr::Identifier(name) => name.to_string(),
            Expr::Member { object, property } => format!("{}.{property}", object.describe()),
            Expr::Index { object, .. } => format!("{}[..]", object.describe()),
            Expr::Call { callee, .. } => format!("{}(..)", callee.describe()),
            _ => "expression".to_owned(),
        }
    }
}

/// Parse a complete expression.
///
/// Nesting deeper than [`MAX_EXPRESSION_DEPTH`] is rejected with
/// `ExprError::UnexpectedToken`.
pub fn parse(source: &str) -> ExprResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        descent: 0,
    };
    let (expr, _) = parser.parse_assignment()?;
    parser.expect_end()?;
    Ok(expr)
}

/// An expression together with the height of its tree.
type Parsed = (Expr, usize);

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Active recursive calls into `parse_assignment` / `parse_unary`
    descent: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, expected: &str) -> ExprError {
        match self.tokens.get(self.pos) {
            Some(Token { kind: TokenKind::Eof, .. }) | None => ExprError::UnexpectedEnd {
                expected: expected.to_owned(),
            },
            Some(token) => ExprError::UnexpectedToken {
                expected: expected.to_owned(),
                found: token.kind.to_string(),
                offset: token.offset,
            },
        }
    }

    fn too_deep(&self) -> ExprError {
        let (found, offset) = match self.tokens.get(self.pos.saturating_sub(1)) {
            Some(token) => (token.kind.to_string(), token.offset),
            None => (TokenKind::Eof.to_string(), 0),
        };
        ExprError::UnexpectedToken {
            expected: format!("at most {MAX_EXPRESSION_DEPTH} levels of nesting"),
            found,
            offset,
        }
    }

    /// Height of a node whose deepest child has height `child`.
    fn nest(&self, child: usize) -> ExprResult<usize> {
        let depth = child + 1;
        if depth > MAX_EXPRESSION_DEPTH {
            return Err(self.too_deep());
        }
        Ok(depth)
    }

    /// Run a recursive step with the descent counter raised.
    fn descend(&mut self, step: fn(&mut Self) -> ExprResult<Parsed>) -> ExprResult<Parsed> {
        if self.descent >= MAX_EXPRESSION_DEPTH {
            return Err(self.too_deep());
        }
        self.descent += 1;
        let parsed = step(self);
        self.descent -= 1;
        parsed
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ExprResult<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn expect_end(&self) -> ExprResult<()> {
        match self.peek() {
            TokenKind::Eof => Ok(()),
            _ => Err(self.error("end of input")),
        }
    }

    fn binary(&self, op: BinaryOp, left: Parsed, right: Parsed) -> ExprResult<Parsed> {
        let depth = self.nest(left.1.max(right.1))?;
        Ok((
            Expr::Binary {
                op,
                left: Box::new(left.0),
                right: Box::new(right.0),
            },
            depth,
        ))
    }

    fn logical(&self, op: LogicalOp, left: Parsed, right: Parsed) -> ExprResult<Parsed> {
        let depth = self.nest(left.1.max(right.1))?;
        Ok((
            Expr::Logical {
                op,
                left: Box::new(left.0),
                right: Box::new(right.0),
            },
            depth,
        ))
    }

    // =========================================================================
    // PRECEDENCE LEVELS
    // =========================================================================

    fn parse_assignment(&mut self) -> ExprResult<Parsed> {
        self.descend(Self::assignment)
    }

    fn assignment(&mut self) -> ExprResult<Parsed> {
        let (target, target_depth) = self.parse_conditional()?;
        if !self.eat(&TokenKind::Assign) {
            return Ok((target, target_depth));
        }
        match target {
            Expr::Identifier(_) | Expr::Member { .. } | Expr::Index { .. } => {
                let (value, value_depth) = self.parse_assignment()?;
                let depth = self.nest(target_depth.max(value_depth))?;
                Ok((
                    Expr::Assign {
                        target: Box::new(target),
                        value: Box::new(value),
                    },
                    depth,
                ))
            }
            other => Err(ExprError::InvalidAssignmentTarget {
                target: other.describe(),
            }),
        }
    }

    fn parse_conditional(&mut self) -> ExprResult<Parsed> {
        let test = self.parse_or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.expect(TokenKind::Colon, "':'")?;
        let alternate = self.parse_assignment()?;
        let depth = self.nest(test.1.max(consequent.1).max(alternate.1))?;
        Ok((
            Expr::Conditional {
                test: Box::new(test.0),
                consequent: Box::new(consequent.0),
                alternate: Box::new(alternate.0),
            },
            depth,
        ))
    }

    fn parse_or(&mut self) -> ExprResult<Parsed> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::OrOr) {
            let right = self.parse_and()?;
            left = self.logical(LogicalOp::Or, left, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ExprResult<Parsed> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::AndAnd) {
            let right = self.parse_equality()?;
            left = self.logical(LogicalOp::And, left, right)?;
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ExprResult<Parsed> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::EqEqEq => BinaryOp::StrictEq,
                TokenKind::NotEqEq => BinaryOp::StrictNotEq,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_relational()?;
            left = self.binary(op, left, right)?;
        }
    }

    fn parse_relational(&mut self) -> ExprResult<Parsed> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::LessEq => BinaryOp::LessEq,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::GreaterEq => BinaryOp::GreaterEq,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right)?;
        }
    }

    fn parse_additive(&mut self) -> ExprResult<Parsed> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right)?;
        }
    }

    fn parse_multiplicative(&mut self) -> ExprResult<Parsed> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.binary(op, left, right)?;
        }
    }

    fn parse_unary(&mut self) -> ExprResult<Parsed> {
        let op = match self.peek() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let (operand, operand_depth) = self.descend(Self::parse_unary)?;
        let depth = self.nest(operand_depth)?;
        Ok((
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            depth,
        ))
    }

    fn parse_postfix(&mut self) -> ExprResult<Parsed> {
        let (mut expr, mut depth) = self.parse_primary()?;
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let property = match self.advance() {
                        TokenKind::Identifier(name) => name,
                        // Keywords are valid property names: `a.null`
                        TokenKind::True => Rc::from("true"),
                        TokenKind::False => Rc::from("false"),
                        TokenKind::Null => Rc::from("null"),
                        TokenKind::Undefined => Rc::from("undefined"),
                        _ => {
                            self.pos -= 1;
                            return Err(self.error("property name"));
                        }
                    };
                    depth = self.nest(depth)?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let (index, index_depth) = self.parse_assignment()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    depth = self.nest(depth.max(index_depth))?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::LParen => {
                    self.advance();
                    let (args, args_depth) = self.parse_arguments()?;
                    depth = self.nest(depth.max(args_depth))?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                _ => return Ok((expr, depth)),
            }
        }
    }

    fn parse_arguments(&mut self) -> ExprResult<(Vec<Expr>, usize)> {
        let mut args = Vec::new();
        let mut depth = 0;
        if self.eat(&TokenKind::RParen) {
            return Ok((args, depth));
        }
        loop {
            let (arg, arg_depth) = self.parse_assignment()?;
            args.push(arg);
            depth = depth.max(arg_depth);
            if self.eat(&TokenKind::RParen) {
                return Ok((args, depth));
            }
            self.expect(TokenKind::Comma, "',' or ')'")?;
        }
    }

    fn parse_primary(&mut self) -> ExprResult<Parsed> {
        let expr = match self.peek().clone() {
            TokenKind::Number(n) => Expr::Literal(Value::Number(n)),
            TokenKind::String(s) => Expr::Literal(Value::String(s)),
            TokenKind::True => Expr::Literal(Value::Bool(true)),
            TokenKind::False => Expr::Literal(Value::Bool(false)),
            TokenKind::Null => Expr::Literal(Value::Null),
            TokenKind::Undefined => Expr::Literal(Value::Undefined),
            TokenKind::Identifier(name) => Expr::Identifier(name),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_assignment()?;
                self.expect(TokenKind::RParen, "')'")?;
                return Ok(inner);
            }
            _ => return Err(self.error("expression")),
        };
        self.advance();
        Ok((expr, 1))
    }
}

// =============================================================================
// TESTS
// =============================================================================
