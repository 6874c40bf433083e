//! Document store boundary for usage records.
//!
//! The hosted document database owns [`UsageRecord`](bluebox_tier::UsageRecord)
//! persistence. This crate names the three operations the service relies on
//! (read, merge-write, subscribe) as the [`UsageStore`] trait, and ships an
//! in-memory implementation for local runs and tests.

mod memory;
mod patch;
mod store;

pub use memory::InMemoryUsageStore;
pub use patch::UsagePatch;
pub use store::{UsageChange, UsageStore};
