//! Broadcast module
//!
//! Command fan-out to subscribed clients.
//!
//! This module contains:
//! - `registry`: the [`Subscriber`] trait and [`SubscriberRegistry`] with
//!   best-effort, failure-isolated delivery and post-iteration pruning
//! - `scheduler`: the fixed-cadence [`BroadcastScheduler`] task
//!
//! The scheduler reads the shared control state, maps it through the command
//! mapper, and pushes non-empty commands through the registry; the
//! acquisition side never touches either.

pub mod registry;
pub mod scheduler;

pub use registry::{Subscriber, SubscriberId, SubscriberRegistry};
pub use scheduler::{BroadcastScheduler, BroadcastStats};
