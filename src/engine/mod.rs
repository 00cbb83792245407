//! The core Lisp engine: reader, evaluator, environment, builtins and prelude.

pub mod builtins;
pub mod env;
pub mod eval;
pub mod parser;
pub mod prelude;
pub mod special_forms;
pub mod value;
