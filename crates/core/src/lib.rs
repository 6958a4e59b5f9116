//! Functional core for eventdesk.
//!
//! Pure domain types and transformations with no I/O: content records and
//! drafts, normalization of raw CMS entries, the event form session, query
//! cache keys and states, and the provider traits implemented by the HTTP
//! client and the in-memory provider.

pub mod cache;
pub mod content;
pub mod form;
pub mod normalize;
pub mod provider;
