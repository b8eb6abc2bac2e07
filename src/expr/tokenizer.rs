use crate::error::{ObjError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Float(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    LParen,
    RParen,
    Comma,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token start in the formula.
    pub position: usize,
}

/// Split a formula into tokens, ending with a single `Eof`.
///
/// Anything outside the whitelisted grammar (string literals, attribute
/// access, brackets, assignment) is rejected here.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        if c.is_ascii_digit() || (c == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)) {
            let (kind, end) = lex_number(input, start)?;
            tokens.push(Token { kind, position: start });
            pos = end;
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(input[start..pos].to_string()),
                position: start,
            });
            continue;
        }

        let next = bytes.get(pos + 1).copied();
        let (kind, len) = match (c, next) {
            (b'*', Some(b'*')) => (TokenKind::StarStar, 2),
            (b'/', Some(b'/')) => (TokenKind::SlashSlash, 2),
            (b'=', Some(b'=')) => (TokenKind::EqEq, 2),
            (b'!', Some(b'=')) => (TokenKind::NotEq, 2),
            (b'<', Some(b'=')) => (TokenKind::Le, 2),
            (b'>', Some(b'=')) => (TokenKind::Ge, 2),
            (b'&', Some(b'&')) => (TokenKind::AndAnd, 2),
            (b'|', Some(b'|')) => (TokenKind::OrOr, 2),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', _) => (TokenKind::Minus, 1),
            (b'*', _) => (TokenKind::Star, 1),
            (b'/', _) => (TokenKind::Slash, 1),
            (b'%', _) => (TokenKind::Percent, 1),
            (b'<', _) => (TokenKind::Lt, 1),
            (b'>', _) => (TokenKind::Gt, 1),
            (b'!', _) => (TokenKind::Bang, 1),
            (b'(', _) => (TokenKind::LParen, 1),
            (b')', _) => (TokenKind::RParen, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b'"' | b'\'', _) => {
                return Err(ObjError::parse(start, "string literals are not allowed"));
            }
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(ObjError::parse(start, format!("unexpected character '{}'", ch)));
            }
        };
        tokens.push(Token { kind, position: start });
        pos += len;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: input.len(),
    });
    Ok(tokens)
}

/// Lex `123`, `1.5`, `.5`, `1.`, `2e-3`. Returns the token and the end offset.
fn lex_number(input: &str, start: usize) -> Result<(TokenKind, usize)> {
    let bytes = input.as_bytes();
    let mut pos = start;
    let mut is_float = false;

    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        is_float = true;
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            is_float = true;
            pos = exp;
        }
    }

    let text = &input[start..pos];
    let kind = if is_float {
        let f = text
            .parse::<f64>()
            .map_err(|_| ObjError::parse(start, format!("invalid number '{}'", text)))?;
        TokenKind::Float(f)
    } else {
        let i = text
            .parse::<i64>()
            .map_err(|_| ObjError::Overflow("integer literal"))?;
        TokenKind::Int(i)
    };
    Ok((kind, pos))
}
