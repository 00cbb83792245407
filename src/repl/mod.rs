mod highlighter;
mod history;

use highlighter::ReplHelper;
use history::HistoryFile;
use llisp::engine::env::Environment;
use llisp::engine::eval::LispError;
use llisp::engine::value::Value;
use llisp::evaluate_source;
use owo_colors::OwoColorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use tracing::{info, warn};

/// What a single input line asks the REPL to do.
#[derive(Debug, PartialEq)]
enum LineOutcome {
    Skip,
    Exit,
    Evaluated(Result<Value, LispError>),
}

fn handle_line(line: &str, env: &mut Environment<'_>) -> LineOutcome {
    let trimmed_input = line.trim();
    if trimmed_input.is_empty() {
        return LineOutcome::Skip;
    }
    if trimmed_input == "exit" || trimmed_input == ".exit" {
        return LineOutcome::Exit;
    }
    LineOutcome::Evaluated(evaluate_source(trimmed_input, env, "repl"))
}

#[tracing::instrument(skip(env))]
pub fn start_repl(env: &mut Environment<'_>) -> anyhow::Result<()> {
    info!("Starting REPL session with rustyline");
    let mut rl = Editor::<ReplHelper, FileHistory>::new()?;
    rl.set_helper(Some(ReplHelper::new()));
    let mut line_number = 1;

    let history = HistoryFile::locate();
    match &history {
        Some(file) => file.load(&mut rl),
        None => warn!("Could not determine history file path. History will not be saved."),
    }

    loop {
        let prompt = format!("llisp ({})> ", line_number);
        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = rl.add_history_entry(line.as_str()) {
                        warn!("Failed to add line to history: {}", err);
                    }
                }
                match handle_line(&line, env) {
                    LineOutcome::Skip => {}
                    LineOutcome::Exit => {
                        info!("Exiting REPL session via user command.");
                        break;
                    }
                    LineOutcome::Evaluated(Ok(value)) => println!("<<< {}", value),
                    LineOutcome::Evaluated(Err(e)) => {
                        eprintln!("{}", format!("Error: {}", e).red())
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("REPL interrupted (Ctrl-C).");
                println!("Interrupted. Type exit, .exit or Ctrl-D to leave.");
            }
            Err(ReadlineError::Eof) => {
                info!("REPL EOF detected (Ctrl-D).");
                break;
            }
            Err(err) => {
                eprintln!("REPL Readline Error: {:?}", err);
                break;
            }
        }
        line_number += 1;
    }

    if let Some(file) = &history {
        file.save(&mut rl);
    }
    Ok(())
}
