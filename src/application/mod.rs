//! Application layer orchestrating the reconciliation pipeline.
//!
//! The [`planner`] turns a record snapshot plus a notification into pure
//! update operations, the [`reconciler`] commits them under optimistic
//! concurrency, and the [`dispatcher`] fans batches out with bounded
//! parallelism.

pub mod dispatcher;
pub mod planner;
pub mod reconciler;
