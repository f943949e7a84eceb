use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::PathBuf;

mod commands;
mod config;
mod error;
mod io;

use commands::resolve::ResolveOptions;

#[derive(Parser, Debug)]
#[command(name = "flowexpr")]
#[command(about = "Resolve flow expression strings against a program description", long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Resolve an expression to a receiver
    Resolve {
        /// Expression to resolve, e.g. `this.owner.name` or `#1`
        #[arg(value_name = "EXPR")]
        expression: String,
        /// Program description in TOML
        #[arg(short, long, value_name = "FILE")]
        program: PathBuf,
        /// Qualified name of the class the expression is written on
        #[arg(short, long, value_name = "NAME")]
        class: String,
        /// Method of the class the expression is written on
        #[arg(short, long, value_name = "NAME")]
        method: Option<String>,
        /// Do not resolve bare names to locals or parameters
        #[arg(long)]
        no_local_scope: bool,
    },

    /// Show the parameter markers an expression refers to
    Params {
        /// Expression to inspect
        #[arg(value_name = "EXPR")]
        expression: String,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Command::Resolve { expression, program, class, method, no_local_scope } => {
            commands::resolve::handle_resolve(ResolveOptions {
                expression: &expression,
                program: &program,
                class: &class,
                method: method.as_deref(),
                use_local_scope: !no_local_scope,
            })?;
        }
        Command::Params { expression } => commands::params::handle_params(&expression)?,
    }
    Ok(())
}
