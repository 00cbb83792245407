use crate::engine::eval::LispError;
use crate::engine::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::rc::Rc;
use tracing::{debug, error, trace};

/// Maximum nesting of procedure calls before evaluation gives up.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 2000;

/// Where `echo` and `print` write. Shared by every overlay of a root environment.
pub type OutputSink = Rc<RefCell<dyn Write>>;

/// Name-to-value bindings.
///
/// A root environment owns the global bindings of a run. A procedure call
/// builds an overlay with [`Environment::new_enclosed`]: the overlay is
/// consulted first, falls back to its parent for reads, and receives every
/// write made during the call. It is dropped when the call returns, so
/// `var`/`def` inside a body never reach the caller.
pub struct Environment<'p> {
    bindings: HashMap<String, Value>,
    outer: Option<&'p Environment<'p>>,
    output: OutputSink,
    depth: usize,
    max_depth: usize,
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("bindings", &self.bindings)
            .field("outer", &self.outer.map(|_| "<outer_env>"))
            .field("output", &"<output_sink>")
            .field("depth", &self.depth)
            .finish()
    }
}

impl Default for Environment<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p> Environment<'p> {
    /// Creates an empty root environment writing to stdout.
    pub fn new() -> Self {
        Self::with_output(Rc::new(RefCell::new(std::io::stdout())))
    }

    /// Creates an empty root environment writing to `output`.
    pub fn with_output(output: OutputSink) -> Self {
        debug!("Creating new root environment");
        Environment {
            bindings: HashMap::new(),
            outer: None,
            output,
            depth: 0,
            max_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Creates a root environment writing to stdout with the standard prelude loaded.
    pub fn new_with_prelude() -> Result<Self, LispError> {
        let mut env = Self::new();
        crate::engine::prelude::load_prelude(&mut env)?;
        Ok(env)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Creates a call overlay on top of `outer`, one call level deeper.
    pub fn new_enclosed(outer: &'p Environment<'p>) -> Result<Self, LispError> {
        if outer.depth >= outer.max_depth {
            error!(limit = outer.max_depth, "Procedure call depth exceeded");
            return Err(LispError::StackExhausted {
                limit: outer.max_depth,
            });
        }
        trace!(depth = outer.depth + 1, "Creating new enclosed environment");
        Ok(Environment {
            bindings: HashMap::new(),
            outer: Some(outer),
            output: Rc::clone(&outer.output),
            depth: outer.depth + 1,
            max_depth: outer.max_depth,
        })
    }

    /// Binds `name` in this environment, replacing any previous binding here.
    pub fn define(&mut self, name: String, value: Value) {
        trace!(name = %name, value = %value, "Defining variable in current environment");
        self.bindings.insert(name, value);
    }

    /// Looks `name` up here, then in the enclosing environments.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.bindings.get(name) {
            Some(value) => Some(value),
            None => self.outer.and_then(|outer| outer.get(name)),
        }
    }

    /// Number of procedure calls between this environment and the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Writes `text` to the output sink and flushes it.
    pub fn emit(&self, text: &str) -> Result<(), LispError> {
        let mut out = self.output.borrow_mut();
        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| {
                error!(error = %e, "Failed to write to output sink");
                LispError::Output(e.to_string())
            })
    }
}
