//! Front end for restricted annotation expressions.
//!
//! An expression such as `get(#1).length` goes through two steps here:
//!
//! 1. [`preprocess`] rewrites the positional parameter markers into plain
//!    identifiers (`get(_param_1).length`) and records which indices were
//!    referenced.
//! 2. [`parse_expression`] lexes and parses the rewritten text into an
//!    [`Expr`] tree.
//!
//! Deciding what the tree *means* is left to `flowexpr-resolve`.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod params;
pub mod parser;

pub use ast::{BinaryOp, Expr, ExprKind, Literal, TypeName, UnaryOp};
pub use error::{SyntaxError, SyntaxResult};
pub use params::{
    parameter_digits, parameter_indices, preprocess, replace_parameter_syntax, Preprocessed,
    PARAMETER_PREFIX,
};

/// Parses an already preprocessed expression string.
pub fn parse_expression(input: &str) -> SyntaxResult<Expr> {
    parser::parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_then_parse() {
        let pre = preprocess("get(#1).length");
        let expr = parse_expression(&pre.text).unwrap();
        expect_test::expect!["get(_param_1).length"].assert_eq(&expr.to_string());
        assert_eq!(pre.indices, vec![1]);
    }

    #[test]
    fn test_normalized_display() {
        let expr = parse_expression("( a+b )*c [ 0 ]").unwrap();
        expect_test::expect!["(a + b) * c[0]"].assert_eq(&expr.to_string());

        let expr = parse_expression("java.util.Map.Entry[].class").unwrap();
        expect_test::expect!["java.util.Map.Entry[].class"].assert_eq(&expr.to_string());

        let expr = parse_expression(r#"m("x\ty", 'c', 3L, 1.5)"#).unwrap();
        expect_test::expect![[r#"m("x\ty", 'c', 3L, 1.5)"#]].assert_eq(&expr.to_string());
    }

    #[test]
    fn test_error_display() {
        let err = parse_expression("a.?").unwrap_err();
        expect_test::expect!["Lexer error: Unrecognized token: '?'"].assert_eq(&err.to_string());
    }
}
