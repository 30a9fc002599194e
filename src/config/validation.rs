//! Configuration validation logic
//!
//! Every section validates itself; [`Settings::validate`] runs them in order
//! and stops at the first failure.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, FileSettings, FilesConfig, LoggerSettings, ServerConfig, Settings,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    /// - Keep-alive timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - Either `url` is a postgres URL, or `host` and `name` are set
    /// - Port must not be 0
    /// - Pool sizes must be positive and `min_connections <= max_connections`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            if self.host.is_empty() || self.name.is_empty() {
                return Err(ConfigError::validation(
                    "database.url",
                    "Database URL is required. Set database.url or database.host and database.name (DB_HOST / DB_NAME).",
                ));
            }
        } else if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "database.port",
                "Database port must be between 1 and 65535.",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FilesConfig {
    /// Validate file storage configuration
    ///
    /// # Validation Rules
    /// - Upload directory must not be empty
    /// - `host_api` must be an http(s) URL without a trailing slash
    /// - Max file size must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upload_dir.trim().is_empty() {
            return Err(ConfigError::validation(
                "files.upload_dir",
                "Upload directory cannot be empty.",
            ));
        }

        if !(self.host_api.starts_with("http://") || self.host_api.starts_with("https://")) {
            return Err(ConfigError::validation(
                "files.host_api",
                "HOST_API must start with http:// or https://.",
            ));
        }

        if self.host_api.ends_with('/') {
            return Err(ConfigError::validation(
                "files.host_api",
                "HOST_API must not end with a slash.",
            ));
        }

        if self.max_file_size == 0 {
            return Err(ConfigError::validation(
                "files.max_file_size",
                "Max file size must be greater than 0 bytes.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "Log file path cannot be empty when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        if self.rotation.max_size == 0 || self.rotation.max_files == 0 {
            return Err(ConfigError::validation(
                "logger.file.rotation",
                "Rotation max_size and max_files must be greater than 0.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let head = self.level.split(',').next().unwrap_or_default().trim();
        if !VALID_LOG_LEVELS.contains(&head.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one log output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.files.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
