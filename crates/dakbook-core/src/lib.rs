//! # Dakbook Core
//!
//! Core types, errors, and utilities for the Dakbook API.
//!
//! This crate provides foundational types used throughout the Dakbook
//! application:
//!
//! - [`errors`]: Application error types with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`password`]: Secure password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use dakbook_core::AppError;
//! use dakbook_core::pagination::PaginationParams;
//! use dakbook_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Record not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod pagination;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
