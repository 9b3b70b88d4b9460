//! Recursive-descent parser for the restricted expression language.
//!
//! Grammar, loosest first:
//!   expression := additive (CMP additive)?
//!   additive   := term (('+' | '-') term)*
//!   term       := unary (('*' | '/' | '%') unary)*
//!   unary      := '-' unary | power
//!   power      := atom ('**' unary)?          (right-associative)
//!   atom       := INT | FLOAT | IDENT | IDENT '(' args ')' | '(' expression ')'

use super::lexer::Token;

/// Expression AST.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Int(i64),
    Float(f64),
    Var(String),
    Neg(Box<Expr>),
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr> },
    Call { function: String, args: Vec<Expr> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// A preamble statement: `name = expr`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Assignment {
    pub name: String,
    pub expr: Expr,
}

/// Parse a complete expression; trailing tokens are an error.
pub(crate) fn parse_expression(tokens: &[Token]) -> Result<Expr, String> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parse a preamble: newline/`;`-separated `name = expr` assignments.
pub(crate) fn parse_statements(tokens: &[Token]) -> Result<Vec<Assignment>, String> {
    let mut parser = Parser { tokens, pos: 0 };
    let mut statements = Vec::new();
    loop {
        parser.skip_newlines();
        if parser.peek().is_none() {
            return Ok(statements);
        }
        statements.push(parser.assignment()?);
        match parser.peek() {
            None => return Ok(statements),
            Some(Token::Newline) => {}
            Some(other) => return Err(format!("expected end of statement, found {other:?}")),
        }
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn skip_newlines(&mut self) {
        while self.peek() == Some(&Token::Newline) {
            self.pos += 1;
        }
    }

    fn expect_end(&self) -> Result<(), String> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(format!("unexpected trailing token {token:?}")),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected {expected:?}, found {token:?}")),
            None => Err(format!("expected {expected:?}, found end of input")),
        }
    }

    fn assignment(&mut self) -> Result<Assignment, String> {
        let name = match self.advance() {
            Some(Token::Ident(name)) => name.clone(),
            other => return Err(format!("expected a variable name, found {other:?}")),
        };
        self.expect(&Token::Assign)?;
        let expr = self.expression()?;
        Ok(Assignment { name, expr })
    }

    fn expression(&mut self) -> Result<Expr, String> {
        let lhs = self.additive()?;
        let op = match self.peek() {
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::NotEq) => BinaryOp::NotEq,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::LtEq) => BinaryOp::LtEq,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::GtEq) => BinaryOp::GtEq,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.additive()?;
        Ok(Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
    }

    fn additive(&mut self) -> Result<Expr, String> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
    }

    fn term(&mut self) -> Result<Expr, String> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
    }

    fn unary(&mut self) -> Result<Expr, String> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, String> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::StarStar) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, String> {
        match self.advance().cloned() {
            Some(Token::Int(v)) => Ok(Expr::Int(v)),
            Some(Token::Float(v)) => Ok(Expr::Float(v)),
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let args = self.call_args()?;
                    Ok(Expr::Call { function: name, args })
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(Token::LParen) => {
                let expr = self.expression()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            other => Err(format!("expected a value, found {other:?}")),
        }
    }

    fn call_args(&mut self) -> Result<Vec<Expr>, String> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            match self.advance() {
                Some(Token::Comma) => {}
                Some(Token::RParen) => return Ok(args),
                other => return Err(format!("expected ',' or ')', found {other:?}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::lexer::tokenize;

    fn parse(source: &str) -> Result<Expr, String> {
        parse_expression(&tokenize(source).unwrap())
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            Expr::Binary {
                op: BinaryOp::Add,
                lhs: Box::new(Expr::Int(1)),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    lhs: Box::new(Expr::Int(2)),
                    rhs: Box::new(Expr::Int(3)),
                }),
            }
        );
    }

    #[test]
    fn power_binds_tighter_than_negation() {
        // -2**2 parses as -(2**2)
        assert_eq!(
            parse("-2**2").unwrap(),
            Expr::Neg(Box::new(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(Expr::Int(2)),
                rhs: Box::new(Expr::Int(2)),
            }))
        );
    }

    #[test]
    fn parses_function_calls() {
        assert_eq!(
            parse("max(i, 2)").unwrap(),
            Expr::Call {
                function: "max".to_string(),
                args: vec![Expr::Var("i".to_string()), Expr::Int(2)],
            }
        );
    }

    #[test]
    fn rejects_trailing_tokens() {
        assert!(parse("1 2").is_err());
    }

    #[test]
    fn parses_assignment_statements() {
        let tokens = tokenize("a = 1\n\nb = a + 1;c = 2").unwrap();
        let statements = parse_statements(&tokens).unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].name, "a");
        assert_eq!(statements[2].expr, Expr::Int(2));
    }

    #[test]
    fn assignment_requires_a_name() {
        let tokens = tokenize("1 = 2").unwrap();
        assert!(parse_statements(&tokens).is_err());
    }
}
