//! Shared types, errors, and configuration for Dropsplit.
//!
//! This crate provides common types used across all other crates:
//! - Caller identity and role types resolved from auth tokens
//! - JWT token generation and validation
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{Caller, Claims, Role};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
