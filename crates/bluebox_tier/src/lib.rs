//! Tier policy evaluation for Bluebox accounts.
//!
//! The evaluator answers one question for the relay and its callers: may this
//! account send another message today? Every decision function here is pure
//! and takes the clock as an argument, so it is testable without a store or a
//! network.
//!
//! ## Lifecycle
//!
//! - [`UsageRecord::new_free`] builds first-session defaults.
//! - [`downgrade_if_expired`] reverts a lapsed pro subscription.
//! - [`evaluate`] decides `allowed` against the effective daily count.
//! - [`record_accepted_message`] is the caller-side counter update.
//! - [`apply_payment_capture`] upgrades an account after a captured payment.

mod plan;
mod policy;
mod subscription;
mod usage;

pub use plan::{BillingConfig, Plan, PlanConfig, PlansConfig, TierSettings};
pub use policy::{
    Assessment, Evaluation, assess, downgrade_if_expired, evaluate, record_accepted_message,
};
pub use subscription::apply_payment_capture;
pub use usage::{AccountRole, BillingCycle, UsageLimit, UsageRecord};
