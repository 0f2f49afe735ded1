//! # Dakbook Models
//!
//! Domain entities, DTOs, and strongly-typed identifiers for the Dakbook API.
//!
//! - [`ids`]: integer ID newtypes (`UserId`, `TeamId`, ...)
//! - [`roles`]: the normalized role tag and its parsing rules
//! - [`teams`]: tenant (team) entity and DTOs
//! - [`users`]: user entity and DTOs
//! - [`mails`]: inward/outward mail records
//! - [`masters`]: reference data (offices, modes, couriers, correspondents)
//! - [`audit`]: append-only audit trail types

pub mod audit;
pub mod ids;
pub mod mails;
pub mod masters;
pub mod roles;
pub mod teams;
pub mod users;

pub use ids::{AuditLogId, MailId, MasterId, TeamId, UserId};
pub use roles::Role;
