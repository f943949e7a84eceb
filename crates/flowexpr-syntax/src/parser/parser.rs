use crate::ast::*;
use crate::error::{SyntaxError, SyntaxResult};
use crate::lexer::{Token, TokenKind};
use crate::params::PARAMETER_PREFIX;
use miette::SourceSpan;

/// Our hand-rolled parser structure.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    source_len: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token<'a>], source_len: usize) -> Self {
        Self { tokens, pos: 0, source_len }
    }

    /// Peek at the current token without consuming it.
    fn peek(&self) -> Option<&'a Token<'a>> {
        self.tokens.get(self.pos)
    }

    /// Peek `n` tokens past the current one.
    fn peek_nth(&self, n: usize) -> Option<&'a Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Consume and return the current token.
    fn next(&mut self) -> Option<&'a Token<'a>> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn eof_span(&self) -> SourceSpan {
        SourceSpan::new(self.source_len.into(), 0usize)
    }

    /// Expect the next token to be of a specific kind.
    fn expect(&mut self, expected: TokenKind) -> SyntaxResult<&'a Token<'a>> {
        match self.next() {
            Some(t) if t.kind == expected => Ok(t),
            Some(t) => Err(SyntaxError::Parser {
                span: t.span,
                message: format!("Expected {}, found {}", expected.describe(), t.kind.describe()),
            }),
            None => Err(SyntaxError::UnexpectedEof {
                span: self.eof_span(),
                message: format!("expected {}", expected.describe()),
            }),
        }
    }

    fn join(start: SourceSpan, end: SourceSpan) -> SourceSpan {
        let end_offset = end.offset() + end.len();
        SourceSpan::new(start.offset().into(), end_offset.saturating_sub(start.offset()))
    }

    //--------------------------------------------------------------------------
    // <Root> ::= <Expression> EOF
    //--------------------------------------------------------------------------

    pub fn parse_root(&mut self) -> SyntaxResult<Expr> {
        let expr = self.parse_expression()?;
        if let Some(tok) = self.peek() {
            return Err(SyntaxError::Parser {
                span: tok.span,
                message: format!("Unexpected {} after the end of the expression", tok.kind.describe()),
            });
        }
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> SyntaxResult<Expr> {
        self.parse_binary(1)
    }

    //--------------------------------------------------------------------------
    // <Binary> ::= <Unary> (<op> <Unary>)*, by precedence climbing
    //--------------------------------------------------------------------------

    fn parse_binary(&mut self, min_precedence: u8) -> SyntaxResult<Expr> {
        let mut lhs = self.parse_unary()?;

        while let Some(op) = self.peek_kind().and_then(binary_op) {
            if op.precedence() < min_precedence {
                break;
            }
            self.next();
            let rhs = self.parse_binary(op.precedence() + 1)?;
            let span = Self::join(lhs.span, rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> SyntaxResult<Expr> {
        let op = match self.peek_kind() {
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Bang) => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.next().map(|t| t.span).unwrap_or_else(|| self.eof_span());
        let operand = self.parse_unary()?;
        let span = Self::join(start, operand.span);
        Ok(Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }, span))
    }

    //--------------------------------------------------------------------------
    // <Postfix> ::= <Primary> ( "." <ident> [<Args>] | "." "class" | "[" <Expression> "]" | ("[" "]")+ "." "class" )*
    //--------------------------------------------------------------------------

    fn parse_postfix(&mut self) -> SyntaxResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek_kind() {
                Some(TokenKind::Dot) => {
                    self.next(); // consume '.'
                    let tok = match self.next() {
                        Some(tok) => tok,
                        None => {
                            return Err(SyntaxError::UnexpectedEof {
                                span: self.eof_span(),
                                message: "expected a member name after `.`".to_string(),
                            })
                        }
                    };
                    match tok.kind {
                        TokenKind::Ident => {
                            if self.peek_kind() == Some(TokenKind::LParen) {
                                let (arguments, end) = self.parse_arguments()?;
                                let span = Self::join(expr.span, end);
                                expr = Expr::new(
                                    ExprKind::MethodCall {
                                        scope: Some(Box::new(expr)),
                                        name: tok.lexeme.to_string(),
                                        arguments,
                                    },
                                    span,
                                );
                            } else {
                                let span = Self::join(expr.span, tok.span);
                                expr = Expr::new(
                                    ExprKind::FieldAccess {
                                        scope: Box::new(expr),
                                        name: tok.lexeme.to_string(),
                                    },
                                    span,
                                );
                            }
                        }
                        TokenKind::Class => {
                            expr = self.finish_class_literal(expr, 0, tok.span)?;
                        }
                        other => {
                            return Err(SyntaxError::Parser {
                                span: tok.span,
                                message: format!("Expected a member name after `.`, found {}", other.describe()),
                            })
                        }
                    }
                }
                Some(TokenKind::LBracket) => {
                    if self.peek_nth(1).map(|t| t.kind) == Some(TokenKind::RBracket) {
                        let mut dimensions = 0;
                        while self.peek_kind() == Some(TokenKind::LBracket) {
                            self.expect(TokenKind::LBracket)?;
                            self.expect(TokenKind::RBracket)?;
                            dimensions += 1;
                        }
                        self.expect(TokenKind::Dot)?;
                        let class_tok = self.expect(TokenKind::Class)?;
                        expr = self.finish_class_literal(expr, dimensions, class_tok.span)?;
                    } else {
                        self.next(); // consume '['
                        let index = self.parse_expression()?;
                        let close = self.expect(TokenKind::RBracket)?;
                        let span = Self::join(expr.span, close.span);
                        expr = Expr::new(
                            ExprKind::ArrayAccess {
                                array: Box::new(expr),
                                index: Box::new(index),
                            },
                            span,
                        );
                    }
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn finish_class_literal(&self, base: Expr, dimensions: usize, end: SourceSpan) -> SyntaxResult<Expr> {
        let dotted = base.as_dotted_name().ok_or_else(|| SyntaxError::Parser {
            span: base.span,
            message: format!("`{}` is not a type name and cannot precede `.class`", base),
        })?;
        let span = Self::join(base.span, end);
        let ty = TypeName {
            segments: dotted.split('.').map(str::to_string).collect(),
            dimensions,
            span: base.span,
        };
        Ok(Expr::new(ExprKind::ClassLiteral(ty), span))
    }

    /// Parse `( <Expression> ("," <Expression>)* )`, returning the arguments and the span of `)`.
    fn parse_arguments(&mut self) -> SyntaxResult<(Vec<Expr>, SourceSpan)> {
        self.expect(TokenKind::LParen)?;
        let mut arguments = Vec::new();

        if self.peek_kind() == Some(TokenKind::RParen) {
            let close = self.expect(TokenKind::RParen)?;
            return Ok((arguments, close.span));
        }

        loop {
            arguments.push(self.parse_expression()?);
            match self.peek_kind() {
                Some(TokenKind::Comma) => {
                    self.next();
                }
                _ => break,
            }
        }

        let close = self.expect(TokenKind::RParen)?;
        Ok((arguments, close.span))
    }

    //--------------------------------------------------------------------------
    // <Primary> ::= <Literal> | "this" | "super" | "(" <Expression> ")" | <ident> [<Args>] | <ParamRef>
    //--------------------------------------------------------------------------

    fn parse_primary(&mut self) -> SyntaxResult<Expr> {
        let tok = match self.next() {
            Some(tok) => tok,
            None => {
                return Err(SyntaxError::UnexpectedEof {
                    span: self.eof_span(),
                    message: "expected an expression".to_string(),
                })
            }
        };

        let kind = match tok.kind {
            TokenKind::Null => ExprKind::Literal(Literal::Null),
            TokenKind::True => ExprKind::Literal(Literal::Boolean(true)),
            TokenKind::False => ExprKind::Literal(Literal::Boolean(false)),
            TokenKind::IntLiteral => ExprKind::Literal(parse_int_literal(tok)?),
            TokenKind::LongLiteral => ExprKind::Literal(parse_long_literal(tok)?),
            TokenKind::DoubleLiteral => ExprKind::Literal(parse_double_literal(tok)?),
            TokenKind::CharLiteral => ExprKind::Literal(parse_char_literal(tok)?),
            TokenKind::StringLiteral => {
                let inner = &tok.lexeme[1..tok.lexeme.len() - 1];
                ExprKind::Literal(Literal::String(unescape(inner, tok)?))
            }
            TokenKind::This => ExprKind::This,
            TokenKind::Super => ExprKind::Super,
            TokenKind::ParamRef => ExprKind::Name(format!("{}{}", PARAMETER_PREFIX, &tok.lexeme[1..])),
            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                let close = self.expect(TokenKind::RParen)?;
                let span = Self::join(tok.span, close.span);
                return Ok(Expr::new(ExprKind::Enclosed(Box::new(inner)), span));
            }
            TokenKind::Ident => {
                if self.peek_kind() == Some(TokenKind::LParen) {
                    let (arguments, end) = self.parse_arguments()?;
                    let span = Self::join(tok.span, end);
                    return Ok(Expr::new(
                        ExprKind::MethodCall {
                            scope: None,
                            name: tok.lexeme.to_string(),
                            arguments,
                        },
                        span,
                    ));
                }
                ExprKind::Name(tok.lexeme.to_string())
            }
            other => {
                return Err(SyntaxError::Parser {
                    span: tok.span,
                    message: format!("Expected an expression, found {}", other.describe()),
                })
            }
        };

        Ok(Expr::new(kind, tok.span))
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::OrOr => Some(BinaryOp::Or),
        TokenKind::AndAnd => Some(BinaryOp::And),
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Rem),
        _ => None,
    }
}

fn invalid_literal(tok: &Token<'_>, message: impl Into<String>) -> SyntaxError {
    SyntaxError::InvalidLiteral {
        lexeme: tok.lexeme.to_string(),
        message: message.into(),
        span: tok.span,
    }
}

/// Splits an integral lexeme into digits and radix, dropping `_` separators.
fn integral_digits(text: &str) -> (String, u32) {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        (hex.to_string(), 16)
    } else if cleaned.len() > 1 && cleaned.starts_with('0') {
        (cleaned[1..].to_string(), 8)
    } else {
        (cleaned, 10)
    }
}

fn parse_int_literal(tok: &Token<'_>) -> SyntaxResult<Literal> {
    let (digits, radix) = integral_digits(tok.lexeme);
    let value = if radix == 10 {
        digits.parse::<i32>().ok()
    } else {
        // Hexadecimal and octal literals cover the full 32-bit pattern.
        u32::from_str_radix(&digits, radix).ok().map(|v| v as i32)
    };
    value
        .map(Literal::Int)
        .ok_or_else(|| invalid_literal(tok, "integer number too large"))
}

fn parse_long_literal(tok: &Token<'_>) -> SyntaxResult<Literal> {
    let without_suffix = &tok.lexeme[..tok.lexeme.len() - 1];
    let (digits, radix) = integral_digits(without_suffix);
    let value = if radix == 10 {
        digits.parse::<i64>().ok()
    } else {
        u64::from_str_radix(&digits, radix).ok().map(|v| v as i64)
    };
    value
        .map(Literal::Long)
        .ok_or_else(|| invalid_literal(tok, "long number too large"))
}

fn parse_double_literal(tok: &Token<'_>) -> SyntaxResult<Literal> {
    let mut text: String = tok.lexeme.chars().filter(|c| *c != '_').collect();
    if text.ends_with(&['d', 'D', 'f', 'F'][..]) {
        text.pop();
    }
    if text.starts_with('.') {
        text.insert(0, '0');
    }
    let text = text.replace(".e", ".0e").replace(".E", ".0E");
    let text = if text.ends_with('.') { format!("{}0", text) } else { text };
    text.parse::<f64>()
        .map(Literal::Double)
        .map_err(|e| invalid_literal(tok, e.to_string()))
}

fn parse_char_literal(tok: &Token<'_>) -> SyntaxResult<Literal> {
    let inner = &tok.lexeme[1..tok.lexeme.len() - 1];
    let value = unescape(inner, tok)?;
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Literal::Char(c)),
        _ => Err(invalid_literal(tok, "a character literal must hold exactly one character")),
    }
}

/// Resolves the escape sequences of a string or character literal body.
fn unescape(body: &str, tok: &Token<'_>) -> SyntaxResult<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = chars
            .next()
            .ok_or_else(|| invalid_literal(tok, "dangling `\\` at the end of the literal"))?;
        match escaped {
            'b' => out.push('\u{8}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'f' => out.push('\u{c}'),
            'r' => out.push('\r'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            'u' => {
                let hex: String = (0..4).filter_map(|_| chars.next()).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid_literal(tok, format!("invalid unicode escape `\\u{}`", hex)))?;
                out.push(code);
            }
            '0'..='7' => {
                let mut value = escaped.to_digit(8).unwrap_or(0);
                // Octal escapes take up to three digits and stay below \377.
                let max_digits = if escaped <= '3' { 2 } else { 1 };
                for _ in 0..max_digits {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\0'));
            }
            other => {
                return Err(invalid_literal(tok, format!("invalid escape sequence `\\{}`", other)));
            }
        }
    }

    Ok(out)
}
