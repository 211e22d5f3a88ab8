//! Sweep engine
//!
//! Four-stage pattern, leaves first:
//! 1. Filter - select repositories and candidate PRs (pure)
//! 2. Evaluate - reduce each candidate to one outcome (pure core)
//! 3. Execute - perform the planned mutations (effectful)
//! 4. Run - sequential orchestration and aggregation

mod evaluate;
mod execute;
mod filter;
mod run;

pub use evaluate::{decide, evaluate_pull_request};
pub use execute::execute_pending;
pub use filter::{filter_candidates, filter_repositories};
pub use run::{NullObserver, RunObserver, Sweeper};
