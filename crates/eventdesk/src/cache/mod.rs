//! Query cache implementation.
//!
//! The key scheme, snapshot types and error taxonomy live in
//! `eventdesk_core::cache`; this module owns the stateful side: the
//! in-memory store, in-flight fetch sharing, subscriptions and garbage
//! collection.

pub mod memory;

pub use memory::{QueryCache, Subscription};
