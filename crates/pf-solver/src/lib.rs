//! pf-solver: the two traversals over a production graph.
//!
//! - `eval` — forward, pull-based: what flows downstream given the current
//!   inputs (lazy, cached per pass).
//! - `balance` — backward, push-based: what must flow upstream to meet a
//!   downstream demand (mutates node state: Input values, Part ratios,
//!   Balance ports).
//!
//! Both are plain recursive calls on one thread; a pass runs to completion
//! or fails with `CycleDetected`.

pub mod balance;
pub mod error;
pub mod eval;
pub mod report;

pub use balance::{balance_node, balanced_value, demand_output, push_balance_node};
pub use error::{SolveError, SolveResult};
pub use eval::Evaluator;
pub use report::{RecipeInputReport, RecipeReport, recipe_report};
