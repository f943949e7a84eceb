use thiserror::Error;
use miette::{Diagnostic, SourceSpan};

/// Result type for lexing and parsing operations.
pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Lexer error: {message}")]
    #[diagnostic(code(flowexpr_syntax::lexer_error))]
    Lexer {
        message: String,
        #[label("unrecognized input")]
        span: SourceSpan,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(flowexpr_syntax::parse_error))]
    Parser {
        message: String,
        #[label("error occurred here")]
        span: SourceSpan,
    },

    #[error("Invalid literal `{lexeme}`: {message}")]
    #[diagnostic(code(flowexpr_syntax::invalid_literal))]
    InvalidLiteral {
        lexeme: String,
        message: String,
        #[label("in this literal")]
        span: SourceSpan,
    },

    #[error("Unexpected end of input: {message}")]
    #[diagnostic(code(flowexpr_syntax::unexpected_eof))]
    UnexpectedEof {
        message: String,
        #[label("input ends here")]
        span: SourceSpan,
    },
}

impl SyntaxError {
    /// The source location the error points at.
    pub fn span(&self) -> SourceSpan {
        match self {
            SyntaxError::Lexer { span, .. }
            | SyntaxError::Parser { span, .. }
            | SyntaxError::InvalidLiteral { span, .. }
            | SyntaxError::UnexpectedEof { span, .. } => *span,
        }
    }
}
