//! Cookie parsing and session-state derivation.
//!
//! This module turns raw `Set-Cookie` response headers into a persisted
//! snapshot and back into a `Cookie` request header:
//!
//! | Stage | Module | Responsibility |
//! |-------|--------|----------------|
//! | Split | [`setcookie`] | Separate comma-joined cookies, keeping commas inside `Expires` dates |
//! | Parse | [`setcookie`] | `name=value` plus a fixed set of raw attributes |
//! | Expiry | [`expiry`] | `Max-Age` / `Expires` to an absolute instant |
//! | Persist | [`snapshot`] | Merge into the stored snapshot, render unexpired cookies |
//! | Diff | [`sessiondiff`] | Detect real session changes, ignoring expiry refreshes |
//! | Filter | [`prefix`] | Accept only headers that carry application cookies |
//!
//! Every function here is total: malformed input degrades to a best-effort
//! result instead of an error.
//!
//! # Example
//!
//! ```rust
//! use sessionjar::cookies::snapshot::{merge_set_cookie, render_cookie_header};
//! use time::OffsetDateTime;
//!
//! let now = OffsetDateTime::now_utc();
//! let stored = merge_set_cookie(
//!     "better-auth.session_token=abc; Max-Age=3600; Path=/, theme=dark",
//!     None,
//!     now,
//! );
//! assert_eq!(
//!     render_cookie_header(&stored, now),
//!     "better-auth.session_token=abc; theme=dark"
//! );
//! ```

pub mod expiry;
pub mod prefix;
pub mod sessiondiff;
pub mod setcookie;
pub mod snapshot;

pub use prefix::{has_prefixed_cookies, CookiePrefix};
pub use sessiondiff::has_session_cookie_changed;
pub use setcookie::{parse_set_cookie_header, split_set_cookie_header, RawCookieAttributes};
pub use snapshot::{merge_set_cookie, render_cookie_header, CookieSnapshot, StoredCookie};
