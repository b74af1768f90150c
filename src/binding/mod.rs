//! Reactive bindings
//!
//! A [`Proxy`] owns one parsed template and one [`BindingContext`], caches
//! the evaluated value and keeps it current as watched properties change.

#![warn(missing_docs)]

pub mod coalesce;
pub mod context;
pub mod listeners;
pub mod proxy;

pub use coalesce::{RecomputeGuard, RunOutcome};
pub use context::BindingContext;
pub use listeners::{ListenerSet, Subscription};
pub use proxy::{ChangeSubscription, Proxy};
