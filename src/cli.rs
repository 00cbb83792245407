use clap::{Args, Parser, Subcommand};
use llisp::engine::env::DEFAULT_MAX_CALL_DEPTH;
use std::path::PathBuf;

/// A small Lisp with dynamic binding.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(name = "llisp", bin_name = "llisp")]
pub struct Cli {
    /// Start without the standard prelude definitions.
    #[clap(long, global = true, env = "LLISP_NO_PRELUDE")]
    pub no_prelude: bool,

    /// Maximum nesting of procedure calls.
    #[clap(long, global = true, value_name = "N", env = "LLISP_MAX_DEPTH", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    pub max_depth: usize,

    /// Starts the REPL when omitted.
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluates a Lisp expression from a string or executes a Lisp file.
    Run(RunArgs),
    /// Starts an interactive session.
    Repl,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Lisp expression string to evaluate.
    #[clap(short, long, value_name = "LISP_CODE", conflicts_with = "file")]
    pub expr: Option<String>,

    /// Path to a Lisp file to execute.
    #[clap(value_name = "FILE_PATH", conflicts_with = "expr", required_unless_present = "expr")]
    pub file: Option<PathBuf>,
}
