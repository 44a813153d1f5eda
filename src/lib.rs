//! # sessionjar
//!
//! Session cookie persistence for HTTP clients that have no cookie jar of
//! their own (mobile runtimes, embedded fetch implementations).
//!
//! `sessionjar` parses `Set-Cookie` response headers, stores the cookies
//! with their computed expiry in a pluggable key-value store, rebuilds the
//! `Cookie` request header from what is still valid, and tells the host
//! when the session really changed rather than only being refreshed.
//!
//! ## Quick Start
//!
//! ```rust
//! use http::header::SET_COOKIE;
//! use http::{HeaderMap, HeaderValue};
//! use sessionjar::session::{SessionConfig, SessionEvent, SessionJar};
//! use sessionjar::storage::MemoryStorage;
//!
//! let jar = SessionJar::new(MemoryStorage::new(), SessionConfig::new().scheme("myapp"))
//!     .with_listener(|event: SessionEvent| println!("session event: {:?}", event));
//!
//! let mut response = HeaderMap::new();
//! response.insert(
//!     SET_COOKIE,
//!     HeaderValue::from_static("better-auth.session_token=abc; Max-Age=3600; Path=/"),
//! );
//! jar.handle_response("https://api.example.com/api/auth/sign-in", &response, None);
//!
//! let mut request = HeaderMap::new();
//! jar.prepare_request("https://api.example.com/api/auth/get-session", &mut request)?;
//! assert_eq!(request["cookie"], "better-auth.session_token=abc");
//! assert_eq!(request["origin"], "myapp://");
//! # Ok::<(), sessionjar::base::cookieerror::CookieError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error type and context helpers
//! - [`cookies`] - Header splitting, parsing, expiry, snapshots and session diffing
//! - [`storage`] - Key-value storage contract, key normalization and backends
//! - [`session`] - Request/response hooks tying the pieces together

pub mod base;
pub mod cookies;
pub mod session;
pub mod storage;
