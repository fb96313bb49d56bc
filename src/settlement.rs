//! Settle-all outcome aggregation.
//!
//! The build phase and the destroy phase both fan out one task per image
//! and must observe every result, never short-circuiting on the first
//! failure. [`settle_all`] reflects each task's terminal state into an
//! [`Outcome`] value so that failure is data, not control flow.

pub mod aggregator;

pub use aggregator::{settle_all, Outcome};
