//! Recursive-descent parser for circuit-construction scripts.
//!
//! The grammar covers the statement and expression subset the fluent
//! gate-construction API uses: imports, assignments (including tuple and
//! subscript targets), expression statements, calls with positional and
//! keyword arguments, attribute access, subscripting, list/tuple/dict
//! literals, unary minus, and binary arithmetic.

use tracing::debug;

use crate::ast::{BinOpKind, CallExpr, Expr, Keyword, Module, Stmt};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a source string into a [`Module`].
pub fn parse(source: &str) -> ParseResult<Module> {
    let mut parser = Parser::new(source)?;
    let module = parser.parse_module()?;
    debug!("parsed {} statements", module.statements.len());
    Ok(module)
}

/// Parser state.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> ParseResult<Self> {
        let tokens = tokenize(source)
            .map_err(|(line, token)| ParseError::Lexer { line, token })?;
        Ok(Self { tokens, pos: 0 })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek one token past the current one.
    fn peek_second(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|t| &t.token)
    }

    /// The line of the current token, or of the last token at EOF.
    fn line(&self) -> u32 {
        self.tokens
            .get(self.pos.min(self.tokens.len().saturating_sub(1)))
            .map_or(1, |t| t.line)
    }

    /// Advance and return the current token.
    fn advance(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let token = self.tokens[self.pos].token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Check if the current token matches, comparing discriminants only.
    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume the current token if it matches.
    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token.
    fn expect(&mut self, expected: &Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(expected.to_string()))?;
        if std::mem::discriminant(&found) != std::mem::discriminant(expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    fn unexpected(&self, expected: &str, found: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            line: self.line(),
            expected: expected.into(),
            found: found.to_string(),
        }
    }

    /// Parse the whole token stream.
    fn parse_module(&mut self) -> ParseResult<Module> {
        let mut statements = Vec::new();
        while !self.is_eof() {
            if self.consume(&Token::Newline) {
                continue;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(Module { statements })
    }

    /// Parse one statement, terminated by a newline or EOF.
    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        let stmt = match self.peek() {
            Some(Token::Import | Token::From) => self.parse_import(line)?,
            Some(_) => self.parse_assign_or_expr(line)?,
            None => return Err(ParseError::UnexpectedEof("statement".into())),
        };
        self.end_statement()?;
        Ok(stmt)
    }

    /// Consume the statement terminator.
    fn end_statement(&mut self) -> ParseResult<()> {
        match self.peek() {
            Some(Token::Newline) => {
                self.advance();
                Ok(())
            }
            None => Ok(()),
            Some(other) => Err(self.unexpected("end of statement", &other.clone())),
        }
    }

    /// Parse an import statement loosely: imports carry no facts, so the
    /// module path is kept for logging and everything else on the line is
    /// discarded.
    fn parse_import(&mut self, line: u32) -> ParseResult<Stmt> {
        let mut module = String::new();
        while let Some(token) = self.peek() {
            if matches!(token, Token::Newline) {
                break;
            }
            if module.is_empty() {
                if let Token::Identifier(name) = token {
                    module = name.clone();
                }
            }
            self.advance();
        }
        Ok(Stmt::Import { module, line })
    }

    /// Parse `target = value` or a bare expression statement.
    fn parse_assign_or_expr(&mut self, line: u32) -> ParseResult<Stmt> {
        let first = self.parse_expr_list()?;
        if self.consume(&Token::Assign) {
            let value = self.parse_expr_list()?;
            Ok(Stmt::Assign {
                target: first,
                value,
                line,
            })
        } else {
            Ok(Stmt::Expr { value: first, line })
        }
    }

    /// Parse an expression, folding `a, b, c` into a tuple.
    fn parse_expr_list(&mut self) -> ParseResult<Expr> {
        let first = self.parse_expr()?;
        if !self.check(&Token::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.consume(&Token::Comma) {
            // A trailing comma ends the list.
            if matches!(self.peek(), Some(Token::Newline | Token::Assign) | None) {
                break;
            }
            items.push(self.parse_expr()?);
        }
        Ok(Expr::Tuple(items))
    }

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOpKind::Add,
                Some(Token::Minus) => BinOpKind::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOpKind::Mul,
                Some(Token::Slash) => BinOpKind::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.consume(&Token::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Neg(Box::new(operand)));
        }
        self.parse_postfix()
    }

    /// Parse a primary expression followed by any number of call,
    /// attribute, and subscript trailers. This is where method chains
    /// take their nested shape.
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    let line = self.line();
                    self.advance();
                    let (args, kwargs) = self.parse_arguments()?;
                    self.expect(&Token::RParen)?;
                    expr = Expr::Call(CallExpr {
                        callee: Box::new(expr),
                        args,
                        kwargs,
                        line,
                    });
                }
                Some(Token::Dot) => {
                    self.advance();
                    let attr = self.expect_identifier("attribute name")?;
                    expr = Expr::Attribute {
                        base: Box::new(expr),
                        attr,
                    };
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&Token::RBracket)?;
                    expr = Expr::Subscript {
                        base: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(v) => {
                self.advance();
                Ok(Expr::Int(v))
            }
            Token::FloatLiteral(v) => {
                self.advance();
                Ok(Expr::Float(v))
            }
            Token::StringLiteral(s) => {
                self.advance();
                Ok(Expr::Str(s))
            }
            Token::Identifier(name) => {
                self.advance();
                Ok(Expr::Name(name))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_paren_contents()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::LBracket => {
                self.advance();
                let items = self.parse_bracketed_items(&Token::RBracket)?;
                self.expect(&Token::RBracket)?;
                Ok(Expr::List(items))
            }
            Token::LBrace => {
                self.advance();
                let entries = self.parse_dict_entries()?;
                self.expect(&Token::RBrace)?;
                Ok(Expr::Dict(entries))
            }
            other => Err(self.unexpected("expression", &other)),
        }
    }

    /// Contents of a parenthesized group: a plain expression, or a tuple
    /// when commas appear.
    fn parse_paren_contents(&mut self) -> ParseResult<Expr> {
        if self.check(&Token::RParen) {
            return Ok(Expr::Tuple(vec![]));
        }
        let first = self.parse_expr()?;
        if !self.check(&Token::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.consume(&Token::Comma) {
            if self.check(&Token::RParen) {
                break;
            }
            items.push(self.parse_expr()?);
        }
        Ok(Expr::Tuple(items))
    }

    fn parse_bracketed_items(&mut self, close: &Token) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(self.parse_expr()?);
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        Ok(items)
    }

    fn parse_dict_entries(&mut self) -> ParseResult<Vec<(Expr, Expr)>> {
        let mut entries = Vec::new();
        while !self.check(&Token::RBrace) {
            let key = self.parse_expr()?;
            self.expect(&Token::Colon)?;
            let value = self.parse_expr()?;
            entries.push((key, value));
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        Ok(entries)
    }

    /// Parse a call argument list: positional arguments, then keywords.
    fn parse_arguments(&mut self) -> ParseResult<(Vec<Expr>, Vec<Keyword>)> {
        let mut args = Vec::new();
        let mut kwargs = Vec::new();

        while !self.check(&Token::RParen) {
            if let (Some(Token::Identifier(name)), Some(Token::Assign)) =
                (self.peek(), self.peek_second())
            {
                let name = name.clone();
                self.advance();
                self.advance();
                let value = self.parse_expr()?;
                kwargs.push(Keyword { name, value });
            } else {
                args.push(self.parse_expr()?);
            }
            if !self.consume(&Token::Comma) {
                break;
            }
        }

        Ok((args, kwargs))
    }

    fn expect_identifier(&mut self, what: &str) -> ParseResult<String> {
        let line = self.line();
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => Err(ParseError::UnexpectedToken {
                line,
                expected: what.into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof(what.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> Stmt {
        let module = parse(source).unwrap();
        assert_eq!(module.statements.len(), 1, "source: {source}");
        module.statements.into_iter().next().unwrap()
    }

    #[test]
    fn test_simple_assignment() {
        let Stmt::Assign { target, value, line } = parse_one("n = 3") else {
            panic!("expected assignment");
        };
        assert_eq!(target, Expr::Name("n".into()));
        assert_eq!(value, Expr::Int(3));
        assert_eq!(line, 1);
    }

    #[test]
    fn test_tuple_assignment() {
        let Stmt::Assign { target, .. } = parse_one("a, b = f()") else {
            panic!("expected assignment");
        };
        assert_eq!(
            target,
            Expr::Tuple(vec![Expr::Name("a".into()), Expr::Name("b".into())])
        );
    }

    #[test]
    fn test_subscript_assignment_target() {
        let Stmt::Assign { target, .. } = parse_one("params[0] = 1") else {
            panic!("expected assignment");
        };
        assert!(matches!(target, Expr::Subscript { .. }));
    }

    #[test]
    fn test_method_chain() {
        let Stmt::Expr { value, .. } = parse_one("Circuit().h(0).x(1)") else {
            panic!("expected expression");
        };
        let Expr::Call(outer) = value else {
            panic!("expected call");
        };
        assert_eq!(outer.name(), Some("x"));
        let Expr::Attribute { base, .. } = outer.callee.as_ref() else {
            panic!("expected attribute callee");
        };
        assert!(matches!(base.as_ref(), Expr::Call(_)));
    }

    #[test]
    fn test_keyword_arguments() {
        let Stmt::Expr { value, .. } = parse_one("Simulator(\"mqvector\", n_qubits=3)") else {
            panic!("expected expression");
        };
        let Expr::Call(call) = value else {
            panic!("expected call");
        };
        assert_eq!(call.args.len(), 1);
        assert_eq!(call.kwargs.len(), 1);
        assert_eq!(call.kwargs[0].name, "n_qubits");
        assert_eq!(call.kwargs[0].value, Expr::Int(3));
    }

    #[test]
    fn test_dict_literal() {
        let Stmt::Assign { value, .. } = parse_one("params = {\"theta\": 1, \"phi\": 2}") else {
            panic!("expected assignment");
        };
        let Expr::Dict(entries) = value else {
            panic!("expected dict");
        };
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_imports_are_skipped() {
        let module = parse("from mindquantum import Circuit, Simulator\nimport numpy as np\n")
            .unwrap();
        assert_eq!(module.statements.len(), 2);
        assert!(matches!(module.statements[0], Stmt::Import { .. }));
        assert!(matches!(module.statements[1], Stmt::Import { .. }));
    }

    #[test]
    fn test_multiline_call() {
        let module = parse("Simulator(\n    \"mqvector\",\n    3,\n)\nx = 1\n").unwrap();
        assert_eq!(module.statements.len(), 2);
        assert_eq!(module.statements[1].line(), 5);
    }

    #[test]
    fn test_unary_minus() {
        let Stmt::Expr { value, .. } = parse_one("rx(-1.5)") else {
            panic!("expected expression");
        };
        let Expr::Call(call) = value else {
            panic!("expected call");
        };
        assert_eq!(call.args[0], Expr::Neg(Box::new(Expr::Float(1.5))));
    }

    #[test]
    fn test_binary_arithmetic_parses() {
        let Stmt::Assign { value, .. } = parse_one("n = 2 + 3") else {
            panic!("expected assignment");
        };
        assert!(matches!(value, Expr::BinOp { .. }));
    }

    #[test]
    fn test_parse_error_has_no_partial_tree() {
        let err = parse("x = (1").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn test_unexpected_token_reports_line() {
        let err = parse("x = 1\n= 2\n").unwrap_err();
        let ParseError::UnexpectedToken { line, .. } = err else {
            panic!("expected unexpected-token error");
        };
        assert_eq!(line, 2);
    }

    #[test]
    fn test_statement_lines() {
        let module = parse("a = 1\n\nb = 2\n").unwrap();
        assert_eq!(module.statements[0].line(), 1);
        assert_eq!(module.statements[1].line(), 3);
    }
}
