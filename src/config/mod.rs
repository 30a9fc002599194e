//! Configuration management module for shop-rs
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple environment configurations (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local development overrides (not committed to version control)
//! 4. `SHOP_*` environment variables
//! 5. `DATABASE_URL`, `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USERNAME`,
//!    `DB_PASSWORD` and `HOST_API`

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{DatabaseConfig, FilesConfig, LoggerSettings, ServerConfig, Settings};
