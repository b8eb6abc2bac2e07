//! Precedence-climbing parser for objective formulas.
//!
//! Precedence follows the usual scientific-formula conventions, lowest first:
//! `or`, `and`, `not`, comparisons, `+ -`, `* / // %`, unary `+ -`, `**`.

use crate::error::{ObjError, Result};
use crate::expr::ast::{BinaryOp, CompareOp, Expr, LogicalOp, UnaryOp};
use crate::expr::functions;
use crate::expr::tokenizer::{tokenize, Token, TokenKind};
use crate::models::Value;

/// Operator precedence levels (higher = tighter binding).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest = 0,
    Or = 1,
    And = 2,
    Not = 3,
    Comparison = 4,
    Additive = 5,
    Multiplicative = 6,
    Unary = 7,
    Power = 8,
}

impl Precedence {
    /// Next level up, used for the right operand of left-associative operators.
    fn next_level(self) -> Self {
        match self {
            Precedence::Lowest => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Not,
            Precedence::Not => Precedence::Comparison,
            Precedence::Comparison => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Unary,
            Precedence::Unary => Precedence::Power,
            Precedence::Power => Precedence::Power,
        }
    }
}

enum Infix {
    Logical(LogicalOp),
    Compare(CompareOp),
    Binary(BinaryOp),
}

/// Parse a formula into an expression tree.
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(Precedence::Lowest)?;
    let trailing = parser.peek();
    if trailing.kind != TokenKind::Eof {
        return Err(ObjError::parse(trailing.position, "unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize always ends with Eof, and advance never moves past it
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        let token = self.advance();
        if token.kind == kind {
            Ok(())
        } else {
            Err(ObjError::parse(token.position, format!("expected {}", what)))
        }
    }

    fn parse_expr(&mut self, min: Precedence) -> Result<Expr> {
        let mut left = self.parse_prefix(min)?;

        loop {
            let Some((infix, prec)) = self.peek_infix() else {
                break;
            };
            if prec < min {
                break;
            }
            self.advance();

            left = match infix {
                Infix::Logical(op) => {
                    let right = self.parse_expr(prec.next_level())?;
                    Expr::Logical {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    }
                }
                Infix::Compare(op) => {
                    let mut rest = vec![(op, self.parse_expr(prec.next_level())?)];
                    while let Some((Infix::Compare(op), _)) = self.peek_infix() {
                        self.advance();
                        rest.push((op, self.parse_expr(prec.next_level())?));
                    }
                    Expr::Compare {
                        first: Box::new(left),
                        rest,
                    }
                }
                Infix::Binary(BinaryOp::Pow) => {
                    // Right-associative; the exponent may carry its own sign.
                    let right = self.parse_expr(Precedence::Unary)?;
                    Expr::Binary {
                        op: BinaryOp::Pow,
                        left: Box::new(left),
                        right: Box::new(right),
                    }
                }
                Infix::Binary(op) => {
                    let right = self.parse_expr(prec.next_level())?;
                    Expr::Binary {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    }
                }
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self, min: Precedence) -> Result<Expr> {
        let token = self.advance();
        match token.kind {
            TokenKind::Int(i) => Ok(Expr::Literal(Value::Int(i))),
            TokenKind::Float(f) => Ok(Expr::Literal(Value::Float(f))),
            TokenKind::Plus => self.parse_unary(UnaryOp::Plus),
            TokenKind::Minus => self.parse_unary(UnaryOp::Neg),
            TokenKind::Bang => self.parse_not(token.position, min),
            TokenKind::LParen => {
                let inner = self.parse_expr(Precedence::Lowest)?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.parse_identifier(name, token.position, min),
            TokenKind::Eof => Err(ObjError::parse(token.position, "unexpected end of formula")),
            other => Err(ObjError::parse(
                token.position,
                format!("unexpected token {:?}", other),
            )),
        }
    }

    fn parse_unary(&mut self, op: UnaryOp) -> Result<Expr> {
        let operand = self.parse_expr(Precedence::Unary)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_identifier(&mut self, name: String, position: usize, min: Precedence) -> Result<Expr> {
        match name.as_str() {
            "True" | "true" => return Ok(Expr::Literal(Value::Bool(true))),
            "False" | "false" => return Ok(Expr::Literal(Value::Bool(false))),
            "not" => return self.parse_not(position, min),
            "and" | "or" => {
                return Err(ObjError::parse(position, format!("unexpected '{}'", name)));
            }
            _ => {}
        }

        if self.peek().kind == TokenKind::LParen {
            self.parse_call(name)
        } else {
            Ok(Expr::Variable(name))
        }
    }

    fn parse_not(&mut self, position: usize, min: Precedence) -> Result<Expr> {
        if min > Precedence::Not {
            return Err(ObjError::parse(position, "'not' is not allowed here"));
        }
        let operand = self.parse_expr(Precedence::Not)?;
        Ok(Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        })
    }

    fn parse_call(&mut self, name: String) -> Result<Expr> {
        if !functions::is_known(&name) {
            return Err(ObjError::UnknownFunction(name));
        }
        self.expect(TokenKind::LParen, "'('")?;

        let mut args = Vec::new();
        if self.peek().kind != TokenKind::RParen {
            loop {
                args.push(self.parse_expr(Precedence::Lowest)?);
                if self.peek().kind == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(Expr::Call { name, args })
    }

    fn peek_infix(&self) -> Option<(Infix, Precedence)> {
        let infix = match &self.peek().kind {
            TokenKind::OrOr => (Infix::Logical(LogicalOp::Or), Precedence::Or),
            TokenKind::AndAnd => (Infix::Logical(LogicalOp::And), Precedence::And),
            TokenKind::Ident(word) if word == "or" => {
                (Infix::Logical(LogicalOp::Or), Precedence::Or)
            }
            TokenKind::Ident(word) if word == "and" => {
                (Infix::Logical(LogicalOp::And), Precedence::And)
            }
            TokenKind::EqEq => (Infix::Compare(CompareOp::Eq), Precedence::Comparison),
            TokenKind::NotEq => (Infix::Compare(CompareOp::NotEq), Precedence::Comparison),
            TokenKind::Lt => (Infix::Compare(CompareOp::Lt), Precedence::Comparison),
            TokenKind::Le => (Infix::Compare(CompareOp::Le), Precedence::Comparison),
            TokenKind::Gt => (Infix::Compare(CompareOp::Gt), Precedence::Comparison),
            TokenKind::Ge => (Infix::Compare(CompareOp::Ge), Precedence::Comparison),
            TokenKind::Plus => (Infix::Binary(BinaryOp::Add), Precedence::Additive),
            TokenKind::Minus => (Infix::Binary(BinaryOp::Sub), Precedence::Additive),
            TokenKind::Star => (Infix::Binary(BinaryOp::Mul), Precedence::Multiplicative),
            TokenKind::Slash => (Infix::Binary(BinaryOp::Div), Precedence::Multiplicative),
            TokenKind::SlashSlash => {
                (Infix::Binary(BinaryOp::FloorDiv), Precedence::Multiplicative)
            }
            TokenKind::Percent => (Infix::Binary(BinaryOp::Mod), Precedence::Multiplicative),
            TokenKind::StarStar => (Infix::Binary(BinaryOp::Pow), Precedence::Power),
            _ => return None,
        };
        Some(infix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Variable(name.to_string()))
    }

    fn int(i: i64) -> Box<Expr> {
        Box::new(Expr::Literal(Value::Int(i)))
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let expr = parse("a + b * c").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                left: var("a"),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    left: var("b"),
                    right: var("c"),
                }),
            }
        );
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = parse("a - b - c").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Sub,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Sub,
                    left: var("a"),
                    right: var("b"),
                }),
                right: var("c"),
            }
        );
    }

    #[test]
    fn test_power_is_right_associative_and_binds_over_negation() {
        let expr = parse("-2 ** 3 ** 2").unwrap();
        assert_eq!(
            expr,
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(Expr::Binary {
                    op: BinaryOp::Pow,
                    left: int(2),
                    right: Box::new(Expr::Binary {
                        op: BinaryOp::Pow,
                        left: int(3),
                        right: int(2),
                    }),
                }),
            }
        );
    }

    #[test]
    fn test_comparison_chain() {
        let expr = parse("0 < x <= 10").unwrap();
        assert_eq!(
            expr,
            Expr::Compare {
                first: int(0),
                rest: vec![
                    (CompareOp::Lt, Expr::Variable("x".to_string())),
                    (CompareOp::Le, Expr::Literal(Value::Int(10))),
                ],
            }
        );
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        let expr = parse("not x > 1 and y").unwrap();
        assert_eq!(
            expr,
            Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(Expr::Compare {
                        first: var("x"),
                        rest: vec![(CompareOp::Gt, Expr::Literal(Value::Int(1)))],
                    }),
                }),
                right: var("y"),
            }
        );
    }

    #[test]
    fn test_call_and_variables() {
        let expr = parse("max(x, latency) / x").unwrap();
        assert_eq!(expr.variables(), vec!["x", "latency"]);
    }

    #[test]
    fn test_rejects_unknown_function() {
        assert!(matches!(
            parse("eval(x)"),
            Err(ObjError::UnknownFunction(name)) if name == "eval"
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(parse("").is_err());
        assert!(parse("x +").is_err());
        assert!(parse("(x + 1").is_err());
        assert!(parse("x y").is_err());
        assert!(parse("1 + not x").is_err());
        assert!(parse("and x").is_err());
    }
}
