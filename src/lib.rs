//! # Dakbook API
//!
//! A multi-tenant office correspondence logbook (inward/outward mail
//! registry) built with Axum and PostgreSQL.
//!
//! ## Overview
//!
//! Dakbook records every piece of correspondence an office sends or
//! receives, scoped per team (tenant), with:
//!
//! - **Authentication**: JWT credential in a cookie or bearer header
//! - **Three-tier roles**: super admin, admin, clerk
//! - **Tenant scoping**: every query carries a `ScopeFilter` derived from
//!   the session
//! - **Audit trail**: an append-only record of every attempted mutation,
//!   including failures
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth extractor, role checks, route gate
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Login, me, logout
//! │   ├── teams/       # Tenant management (super admin)
//! │   ├── users/       # User management
//! │   ├── mails/       # Inward/outward registry
//! │   ├── masters/     # Offices, modes, couriers, correspondents
//! │   └── audit_logs/  # Read-only audit trail
//! ├── audit.rs          # The audit recorder
//! ├── pages.rs          # Gate-protected page endpoints
//! └── router.rs         # Router assembly
//! ```
//!
//! Each feature module follows a consistent structure: `controller.rs`
//! (HTTP handlers), `service.rs` (business logic and queries), `model.rs`
//! (module-local DTOs), `router.rs` (route wiring). Shared entities live in
//! the `dakbook-models` crate; the scoping core lives in `dakbook-auth`.
//!
//! ## Request flow
//!
//! 1. The route gate redirects unauthenticated page requests to `/login`.
//! 2. API handlers take the `AuthUser` extractor (401 without a valid
//!    credential) and derive a `ScopeFilter` from the session.
//! 3. Every query against a tenant-scoped table ANDs the filter in.
//! 4. Mutating handlers report the outcome, success or failure, to the
//!    audit recorder; audit failures never surface to the client.

pub mod audit;
pub mod cli;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod pages;
pub mod router;
pub mod state;
