//! Feature modules. Each follows the controller / service / model / router
//! split; shared entities live in `dakbook-models`.

pub mod audit_logs;
pub mod auth;
pub mod mails;
pub mod masters;
pub mod teams;
pub mod users;
