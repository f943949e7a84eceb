use std::path::Path;

use crate::config::Program;
use crate::error::CliError;
use flowexpr_resolve::parse_receiver;

pub struct ResolveOptions<'a> {
    pub expression: &'a str,
    pub program: &'a Path,
    pub class: &'a str,
    pub method: Option<&'a str>,
    pub use_local_scope: bool,
}

pub fn handle_resolve(options: ResolveOptions<'_>) -> Result<(), CliError> {
    let mut program = Program::load(options.program)?;
    let (context, scope) = program.context(options.class, options.method)?;
    log::debug!("resolving in {:?}", program.table.scope_kind(scope));

    let receiver = parse_receiver(
        options.expression,
        &context,
        &program.table,
        &scope,
        options.use_local_scope,
    )?;

    println!("{}", receiver);
    println!("kind: {}", receiver.kind_name());
    if let Some(ty) = receiver.ty() {
        println!("type: {}", ty);
    }
    Ok(())
}
