//! # Dakbook Auth
//!
//! The access-scoping core of the Dakbook API:
//!
//! - [`jwt`]: creates and verifies the signed, time-bound credential
//! - [`claims`]: raw token claims with alias-tolerant extraction
//! - [`session`]: normalizes claims into a per-request [`session::Session`]
//! - [`scope`]: derives the [`scope::ScopeFilter`] every tenant-scoped query
//!   must apply
//!
//! # Flow
//!
//! ```ignore
//! use dakbook_auth::{verify_token, resolve_session, scope};
//!
//! let claims = verify_token(&raw_token, &jwt_config)?;
//! let session = resolve_session(&claims);
//! let filter = scope::team_filter(session.as_ref(), None);
//! // AND `filter` into every query against tenant-scoped tables.
//! ```

pub mod claims;
pub mod jwt;
pub mod scope;
pub mod session;

// Re-export commonly used items at crate root
pub use claims::Claims;
pub use jwt::{create_token, verify_token};
pub use scope::ScopeFilter;
pub use session::{Session, resolve_session};
