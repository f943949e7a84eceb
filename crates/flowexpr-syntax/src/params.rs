//! Positional parameter markers.
//!
//! Expressions refer to formal parameters as `#1`, `#2`, ... Before parsing,
//! each marker is rewritten into an ordinary identifier (`#2` becomes
//! `_param_2`) so the parser sees a plain name. The scan is textual: a marker
//! inside a string literal is rewritten and reported like any other.

use lazy_static::lazy_static;
use regex::Regex;

/// Identifier prefix a rewritten parameter marker carries.
pub const PARAMETER_PREFIX: &str = "_param_";

lazy_static! {
    static ref PARAMETER_MARKER: Regex = Regex::new(r"#([1-9][0-9]*)").unwrap();
}

/// An expression string with its parameter markers rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    pub text: String,
    /// Distinct referenced indices, in order of first occurrence.
    pub indices: Vec<usize>,
}

/// The 1-based index of every parameter marker in `text`, in order of
/// occurrence. Repeated markers are repeated here.
///
/// Indices too large for `usize` are skipped.
pub fn parameter_indices(text: &str) -> Vec<usize> {
    PARAMETER_MARKER
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<usize>().ok())
        .collect()
}

/// Rewrites every `#N` (N >= 1, no leading zero) into `_param_N`.
pub fn replace_parameter_syntax(text: &str) -> String {
    PARAMETER_MARKER
        .replace_all(text, format!("{}${{1}}", PARAMETER_PREFIX).as_str())
        .into_owned()
}

pub fn preprocess(text: &str) -> Preprocessed {
    let mut indices = Vec::new();
    for index in parameter_indices(text) {
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    let rewritten = replace_parameter_syntax(text);
    log::trace!("preprocessed `{}` into `{}`", text, rewritten);
    Preprocessed { text: rewritten, indices }
}

/// The index encoded in a rewritten marker name, e.g. `Some("2")` for `_param_2`.
///
/// Returns the raw digit text so the caller decides how to treat `0` and
/// out-of-range values.
pub fn parameter_digits(name: &str) -> Option<&str> {
    name.strip_prefix(PARAMETER_PREFIX)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
