use rustyline::history::FileHistory;
use rustyline::{Editor, Helper};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const HISTORY_FILE_NAME: &str = "history.txt";

/// Where REPL lines persist between sessions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    /// `<data dir>/llisp/history.txt`, falling back to the config dir.
    pub(crate) fn locate() -> Option<Self> {
        let base = dirs::data_dir().or_else(dirs::config_dir)?;
        Some(Self::at(base.join(env!("CARGO_PKG_NAME")).join(HISTORY_FILE_NAME)))
    }

    pub(crate) fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Loads earlier sessions into `rl`. A missing file is not an error;
    /// its directory is created so that `save` can write it later.
    pub(crate) fn load<H: Helper>(&self, rl: &mut Editor<H, FileHistory>) {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.exists()) {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!(dir = %dir.display(), error = %e, "Failed to create history directory");
            }
        }
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No history yet");
            return;
        }
        match rl.load_history(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "Loaded REPL history"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Could not load REPL history"),
        }
    }

    pub(crate) fn save<H: Helper>(&self, rl: &mut Editor<H, FileHistory>) {
        match rl.save_history(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "Saved REPL history"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Could not save REPL history"),
        }
    }
}
