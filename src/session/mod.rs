//! Host-agnostic session client.
//!
//! - [`SessionConfig`](config::SessionConfig): scheme, storage and cookie prefixes, cache and debug switches
//! - [`SessionJar`](jar::SessionJar): request/response hooks over a [`KeyValueStorage`](crate::storage::KeyValueStorage)
//! - [`SessionEvent`](event::SessionEvent): notifications for the host

pub mod config;
pub mod event;
pub mod jar;

pub use config::SessionConfig;
pub use event::{SessionEvent, SessionListener};
pub use jar::SessionJar;
