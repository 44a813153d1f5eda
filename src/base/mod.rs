//! Base types and error handling.
//!
//! - [`CookieError`](cookieerror::CookieError): error type for the typed snapshot and storage APIs
//! - [`StorageResultExt`](context::StorageResultExt): key context for backend results

pub mod context;
pub mod cookieerror;
