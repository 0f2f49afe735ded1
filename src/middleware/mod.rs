//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: the `AuthUser` extractor (401 on missing/invalid credential)
//!   and the non-rejecting `MaybeSession` extractor
//! - [`role`]: role-gating middleware and helpers over the normalized role
//!   tag
//! - [`gate`]: the route gate redirecting unauthenticated page requests
//!
//! # Authentication flow
//!
//! 1. Client sends the credential as `Authorization: Bearer <token>` or as
//!    the auth cookie set at login
//! 2. `AuthUser` verifies the token and resolves the per-request session
//! 3. Role middleware or handler-level checks gate the operation
//! 4. The handler derives a `ScopeFilter` from the session for every query

pub mod auth;
pub mod gate;
pub mod role;
