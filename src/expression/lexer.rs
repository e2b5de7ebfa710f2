// ============================================================================
// scope-watch - Expression Lexer
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::core::error::{ExprError, ExprResult};
use crate::core::value::format_number;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    String(Rc<str>),
    Identifier(Rc<str>),
    True,
    False,
    Null,
    Undefined,

    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Question,
    Colon,

    Bang,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    AndAnd,
    OrOr,
    Assign,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Number(n) => return f.write_str(&format_number(*n)),
            TokenKind::String(s) => return write!(f, "'{s}'"),
            TokenKind::Identifier(name) => return f.write_str(name),
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Undefined => "undefined",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Bang => "!",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Less => "<",
            TokenKind::LessEq => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::EqEqEq => "===",
            TokenKind::NotEqEq => "!==",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Assign => "=",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token's first character
    pub offset: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Split `source` into tokens, ending with `Eof`.
pub fn tokenize(source: &str) -> ExprResult<Vec<Token>> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let here = i;
        let peek = |n: usize| chars.get(here + n).map(|&(_, c)| c);

        // Number: 12, 1.5, .5, 1e3
        if c.is_ascii_digit() || (c == '.' && peek(1).is_some_and(|d| d.is_ascii_digit())) {
            let start = i;
            while i < chars.len() && chars[i].1.is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i].1 == '.' {
                i += 1;
                while i < chars.len() && chars[i].1.is_ascii_digit() {
                    i += 1;
                }
            }
            if i < chars.len() && matches!(chars[i].1, 'e' | 'E') {
                let mut j = i + 1;
                if j < chars.len() && matches!(chars[j].1, '+' | '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].1.is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].1.is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let end = chars.get(i).map_or(source.len(), |&(o, _)| o);
            let text = &source[chars[start].0..end];
            let n = text
                .parse::<f64>()
                .map_err(|_| ExprError::UnexpectedChar { found: c, offset })?;
            tokens.push(Token { kind: TokenKind::Number(n), offset });
            continue;
        }

        if c == '\'' || c == '"' {
            let (text, next) = read_string(&chars, i, c)?;
            tokens.push(Token {
                kind: TokenKind::String(Rc::from(text)),
                offset,
            });
            i = next;
            continue;
        }

        if is_ident_start(c) {
            let start = i;
            while i < chars.len() && is_ident_continue(chars[i].1) {
                i += 1;
            }
            let end = chars.get(i).map_or(source.len(), |&(o, _)| o);
            let word = &source[chars[start].0..end];
            let kind = match word {
                "true" => TokenKind::True,
                "false" => TokenKind::False,
                "null" => TokenKind::Null,
                "undefined" => TokenKind::Undefined,
                _ => TokenKind::Identifier(Rc::from(word)),
            };
            tokens.push(Token { kind, offset });
            continue;
        }

        let (kind, width) = match (c, peek(1), peek(2)) {
            ('=', Some('='), Some('=')) => (TokenKind::EqEqEq, 3),
            ('!', Some('='), Some('=')) => (TokenKind::NotEqEq, 3),
            ('=', Some('='), _) => (TokenKind::EqEq, 2),
            ('!', Some('='), _) => (TokenKind::NotEq, 2),
            ('<', Some('='), _) => (TokenKind::LessEq, 2),
            ('>', Some('='), _) => (TokenKind::GreaterEq, 2),
            ('&', Some('&'), _) => (TokenKind::AndAnd, 2),
            ('|', Some('|'), _) => (TokenKind::OrOr, 2),
            ('=', _, _) => (TokenKind::Assign, 1),
            ('!', _, _) => (TokenKind::Bang, 1),
            ('<', _, _) => (TokenKind::Less, 1),
            ('>', _, _) => (TokenKind::Greater, 1),
            ('+', _, _) => (TokenKind::Plus, 1),
            ('-', _, _) => (TokenKind::Minus, 1),
            ('*', _, _) => (TokenKind::Star, 1),
            ('/', _, _) => (TokenKind::Slash, 1),
            ('%', _, _) => (TokenKind::Percent, 1),
            ('.', _, _) => (TokenKind::Dot, 1),
            (',', _, _) => (TokenKind::Comma, 1),
            ('(', _, _) => (TokenKind::LParen, 1),
            (')', _, _) => (TokenKind::RParen, 1),
            ('[', _, _) => (TokenKind::LBracket, 1),
            (']', _, _) => (TokenKind::RBracket, 1),
            ('?', _, _) => (TokenKind::Question, 1),
            (':', _, _) => (TokenKind::Colon, 1),
            _ => return Err(ExprError::UnexpectedChar { found: c, offset }),
        };
        tokens.push(Token { kind, offset });
        i += width;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: source.len(),
    });
    Ok(tokens)
}

/// Read a quoted string starting at `chars[start]`. Returns the unescaped
/// text and the index after the closing quote.
fn read_string(chars: &[(usize, char)], start: usize, quote: char) -> ExprResult<(String, usize)> {
    let offset = chars[start].0;
    let mut text = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        let c = chars[i].1;
        if c == quote {
            return Ok((text, i + 1));
        }
        if c == '\\' {
            i += 1;
            let Some(&(_, escaped)) = chars.get(i) else {
                break;
            };
            text.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                other => other,
            });
        } else {
            text.push(c);
        }
        i += 1;
    }

    Err(ExprError::UnterminatedString { offset })
}
