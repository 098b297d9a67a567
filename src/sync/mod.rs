//! Concurrency primitives the engine is built on.
//!
//! - [`lock`] - multi-reader / single-writer lock with writer preference
//! - [`pool`] - fixed-size worker pool with a quiescence barrier

pub mod lock;
pub mod pool;

pub use lock::ReadWriteLock;
pub use pool::WorkQueue;
