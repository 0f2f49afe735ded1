//! # Dakbook Config
//!
//! Configuration types for the Dakbook API, loaded from environment
//! variables:
//!
//! - [`jwt`]: signing secret, token lifetime, and auth cookie settings
//! - [`cors`]: allowed origins for the browser frontend
//!
//! # Example
//!
//! ```ignore
//! use dakbook_config::{JwtConfig, CorsConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
