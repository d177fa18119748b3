//! Shared errors and configuration for moneyconv.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Application-wide error type and exit codes
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, CacheConfig, EcbConfig};
pub use error::{AppError, AppResult};
