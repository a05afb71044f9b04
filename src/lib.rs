//! Two-priority locks and a harness that measures how each one trades low-priority
//! throughput against high-priority latency.
//!
//! Every lock in this crate implements [`PriorityLock`]. [`harness::run`] drives a
//! long-holding low-priority actor and a brief, latency-sensitive high-priority actor
//! against one lock for a fixed window. [`Sweep`] repeats that over a grid of
//! workload shapes.
//!
//! These locks are measurement subjects. They are not reentrant and they do not
//! poison; misuse panics.

mod basic_lock;
mod blocking_lock;
mod dual_flag_lock;
mod error;
mod gated_lock;
pub mod harness;
mod lock_guard;
mod priority_lock;
mod priority_mutex;
pub mod report;
mod single_flag_lock;
mod strategy;
pub mod sweep;
#[cfg(test)]
mod test_support;

pub use basic_lock::BasicLock;
pub use dual_flag_lock::DualFlagLock;
pub use error::{Error, Result};
pub use gated_lock::GatedLock;
pub use harness::{ContentionHarness, ContentionResult, WorkloadParameters};
pub use priority_lock::{Priority, PriorityLock};
pub use priority_mutex::{HighPriorityGuard, LowPriorityGuard, PriorityMutex};
pub use single_flag_lock::SingleFlagLock;
pub use strategy::Strategy;
pub use sweep::{CellResult, Sweep, SweepConfig, SweepSummary};
