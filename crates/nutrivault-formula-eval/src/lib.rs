//! Formula evaluation and recalculation engine
//!
//! This crate evaluates parsed formula trees against a per-subject
//! environment and propagates value changes through the dependency graph:
//!
//! - `evaluator`: pure tree-walking evaluation over IEEE-754 doubles, with
//!   round-half-up output rounding
//! - `environment`: the per-subject variable bindings for one pass
//! - `store`: the `ValueStore` boundary the host system implements against
//!   its persisted custom-field tables
//! - `engine`: the recalculation pass, topological ordering and
//!   partial-failure capture included
//!
//! Evaluation is single-threaded and synchronous; the only I/O is through
//! the caller-supplied store. Runtime failures are captured per field and
//! never abort a pass.

pub mod engine;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod store;

pub use engine::{RecalcResult, recalculate};
pub use environment::Environment;
pub use error::{EvalError, EvalResult};
pub use evaluator::{evaluate, evaluate_rounded, round_half_up};
pub use store::{MemoryStore, SubjectId, ValueStore};
