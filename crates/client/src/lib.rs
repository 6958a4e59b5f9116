//! eventdesk_client - HTTP implementation of the content provider traits.
//!
//! [`DeliveryClient`] reads from the delivery or preview API and implements
//! `ContentSource`. [`ManagementClient`] writes through the management and
//! upload APIs and implements `ContentManager`.

pub mod client;
pub mod error;

pub use client::{DeliveryClient, ManagementClient, Space};
pub use error::{ClientError, Result};
