//! eventdesk - admin console for a headless-CMS event catalog.
//!
//! Resource services read through a [`cache::QueryCache`] and write through
//! a content provider: the HTTP clients from `eventdesk_client`, or the
//! [`provider::InMemoryProvider`] seeded with demo data.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod provider;
pub mod services;
