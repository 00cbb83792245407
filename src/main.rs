mod cli;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, RunArgs};
use llisp::engine::env::Environment;
use llisp::evaluate_source;
use llisp::logging::init_logging;
use std::fs;
use tracing::info;

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    run(cli)
}

#[tracing::instrument(skip(cli))]
fn run(cli: Cli) -> Result<()> {
    let env = if cli.no_prelude {
        info!("Starting without prelude");
        Environment::new()
    } else {
        Environment::new_with_prelude().context("Failed to load the prelude")?
    };
    let mut env = env.with_max_depth(cli.max_depth);

    match cli.command {
        Some(Commands::Run(args)) => run_program(args, &mut env),
        Some(Commands::Repl) | None => repl::start_repl(&mut env),
    }
}

fn run_program(args: RunArgs, env: &mut Environment<'_>) -> Result<()> {
    if let Some(expr) = args.expr {
        info!(expression = %expr, "Evaluating expression from command line");
        let result = evaluate_source(&expr, env, "command line")?;
        println!("{}", result);
        return Ok(());
    }

    if let Some(path) = args.file {
        info!(file = %path.display(), "Executing file");
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        evaluate_source(&source, env, &path.display().to_string())
            .with_context(|| format!("Failed to execute {}", path.display()))?;
        info!("Finished executing file");
    }
    Ok(())
}
