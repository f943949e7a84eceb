use crate::error::CliError;
use flowexpr_syntax::preprocess;

/// Prints the expression with `#N` markers rewritten, and the indices it refers to.
pub fn handle_params(expression: &str) -> Result<(), CliError> {
    let preprocessed = preprocess(expression);
    println!("{}", preprocessed.text);
    let indices: Vec<String> = preprocessed.indices.iter().map(|i| i.to_string()).collect();
    println!("parameters: [{}]", indices.join(", "));
    Ok(())
}
