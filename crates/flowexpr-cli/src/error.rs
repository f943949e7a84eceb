use std::path::PathBuf;

use flowexpr_resolve::FlowExprError;
use miette::Diagnostic;
use thiserror::Error;

/// CLI-specific error type that provides rich diagnostics
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Failed to read file {path}")]
    #[diagnostic(code(flowexpr::cli::io_error))]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid program description {path}")]
    #[diagnostic(code(flowexpr::cli::config_error))]
    ConfigError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid type '{ty}' in class {class}")]
    #[diagnostic(
        code(flowexpr::cli::invalid_type),
        help("types are written fully qualified, e.g. `java.lang.String`, `int[]` or `java.util.List<T>`")
    )]
    InvalidType { ty: String, class: String },

    #[error("Class {class} is nested in {enclosing}, which is not declared before it")]
    #[diagnostic(code(flowexpr::cli::unknown_enclosing))]
    UnknownEnclosing { class: String, enclosing: String },

    #[error("Class {name} is not declared in the program")]
    #[diagnostic(code(flowexpr::cli::unknown_class))]
    UnknownClass { name: String },

    #[error("Method {method} is not declared in class {class}")]
    #[diagnostic(code(flowexpr::cli::unknown_method))]
    UnknownMethod { class: String, method: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolution(#[from] FlowExprError),
}

/// Convert IO errors with context
pub fn convert_io_error(error: std::io::Error, path: PathBuf) -> CliError {
    CliError::IoError {
        path,
        source: error,
    }
}
