use crate::lookup::LookupError;
use miette::Diagnostic;
use thiserror::Error;

pub type FlowExprResult<T> = Result<T, FlowExprError>;

/// Message key shared by every recoverable resolution failure.
pub const PARSE_ERROR_KEY: &str = "flowexpr.parse.error";
pub const INDEX_TOO_BIG_KEY: &str = "flowexpr.parse.index.too.big";
pub const INTERNAL_ERROR_KEY: &str = "flowexpr.internal.error";

/// Why an expression string could not be turned into a receiver.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum FlowExprError {
    /// The expression is malformed or names something that does not resolve.
    #[error("Invalid '{expression}' because {explanation}")]
    #[diagnostic(code(flowexpr::parse_error))]
    ParseError {
        expression: String,
        explanation: String,
    },

    /// A formal parameter was referred to by name instead of by position.
    #[error("Invalid '{name}' because use \"#{index}\" rather than \"{name}\"")]
    #[diagnostic(
        code(flowexpr::formal_parameter_name),
        help("formal parameters are written positionally, starting at #1")
    )]
    FormalParameterName { name: String, index: usize },

    #[error("Parameter index {index} is too big: only {count} parameter(s) available")]
    #[diagnostic(code(flowexpr::index_too_big))]
    IndexTooBig { index: usize, count: usize },

    /// A lookup service failed without saying why.
    #[error("Internal error: {message}")]
    #[diagnostic(code(flowexpr::internal_error))]
    Internal { message: String },
}

impl FlowExprError {
    pub fn parse_error(expression: impl Into<String>, explanation: impl Into<String>) -> Self {
        FlowExprError::ParseError {
            expression: expression.into(),
            explanation: explanation.into(),
        }
    }

    /// Converts a failed lookup made while resolving `expression`.
    pub fn from_lookup(expression: &str, error: LookupError) -> Self {
        match error.message {
            Some(message) => FlowExprError::parse_error(expression, message),
            None => FlowExprError::Internal {
                message: format!("no detail message in lookup failure while resolving '{}'", expression),
            },
        }
    }

    pub fn message_key(&self) -> &'static str {
        match self {
            FlowExprError::ParseError { .. } | FlowExprError::FormalParameterName { .. } => PARSE_ERROR_KEY,
            FlowExprError::IndexTooBig { .. } => INDEX_TOO_BIG_KEY,
            FlowExprError::Internal { .. } => INTERNAL_ERROR_KEY,
        }
    }

    /// The arguments reported alongside [`message_key`](Self::message_key).
    pub fn args(&self) -> Vec<String> {
        match self {
            FlowExprError::ParseError { .. } | FlowExprError::FormalParameterName { .. } => {
                vec![self.to_string()]
            }
            FlowExprError::IndexTooBig { index, .. } => vec![index.to_string()],
            FlowExprError::Internal { message } => vec![message.clone()],
        }
    }

    pub fn is_flow_parse_error(&self) -> bool {
        self.message_key() == PARSE_ERROR_KEY
    }

    /// Fatal errors indicate a broken lookup service rather than a bad expression.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FlowExprError::Internal { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = FlowExprError::parse_error("foo", "identifier not found");
        expect_test::expect!["Invalid 'foo' because identifier not found"].assert_eq(&err.to_string());
        assert_eq!(err.message_key(), "flowexpr.parse.error");
        assert_eq!(err.args(), vec![err.to_string()]);
        assert!(err.is_flow_parse_error());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_formal_parameter_name_message() {
        let err = FlowExprError::FormalParameterName { name: "amount".to_string(), index: 2 };
        expect_test::expect![[r##"Invalid 'amount' because use "#2" rather than "amount""##]]
            .assert_eq(&err.to_string());
        assert!(err.is_flow_parse_error());
    }

    #[test]
    fn test_index_too_big() {
        let err = FlowExprError::IndexTooBig { index: 3, count: 1 };
        assert_eq!(err.message_key(), "flowexpr.parse.index.too.big");
        assert_eq!(err.args(), vec!["3".to_string()]);
        assert!(!err.is_flow_parse_error());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_from_lookup() {
        let err = FlowExprError::from_lookup("get()", LookupError::new("ambiguous call"));
        assert_eq!(err, FlowExprError::parse_error("get()", "ambiguous call"));

        let err = FlowExprError::from_lookup("get()", LookupError::without_message());
        assert!(err.is_fatal());
        assert!(!err.is_flow_parse_error());
    }
}
