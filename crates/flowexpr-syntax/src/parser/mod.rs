#[allow(clippy::module_inception)]
mod parser;

pub use parser::Parser;

use crate::ast::Expr;
use crate::error::SyntaxResult;
use crate::lexer::lex;

/// Lexes and parses a complete expression. Trailing input is an error.
pub fn parse(input: &str) -> SyntaxResult<Expr> {
    let tokens = lex(input)?;
    let mut parser = Parser::new(&tokens, input.len());
    let expr = parser.parse_root()?;
    log::trace!("parsed `{}` as `{}`", input, expr);
    Ok(expr)
}
