//! Configuration merger for CLI arguments and config files
//!
//! Command-line flags take precedence over every file and environment
//! source; validation runs once, after the flags are applied.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI overrides on top of file-based configuration.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the unvalidated base configuration honouring `--config` and `--env`.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Returns the base configuration with CLI overrides applied, validated.
    ///
    /// Precedence for the log level: `serve --log-level`, then
    /// `--verbose`/`--quiet`, then configuration.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn merger() -> ConfigurationMerger {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/test".to_string();
        ConfigurationMerger::new(config)
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_no_overrides() {
        let merger = merger();
        let merged = merger.merge_cli_args(&parse(&["shop-rs"])).unwrap();
        assert_eq!(&merged, merger.config());
    }

    #[test]
    fn test_verbose_and_quiet() {
        let merged = merger().merge_cli_args(&parse(&["shop-rs", "-v"])).unwrap();
        assert_eq!(merged.logger.level, "debug");

        let merged = merger().merge_cli_args(&parse(&["shop-rs", "-q"])).unwrap();
        assert_eq!(merged.logger.level, "error");
    }

    #[test]
    fn test_serve_overrides_win() {
        let cli = parse(&[
            "shop-rs", "--quiet", "serve", "--host", "0.0.0.0", "--port", "8081", "--log-level", "trace",
        ]);
        let merged = merger().merge_cli_args(&cli).unwrap();

        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 8081);
        assert_eq!(merged.logger.level, "trace");
    }

    #[test]
    fn test_merged_config_is_validated() {
        let mut config = Settings::default();
        config.files.host_api = "not-a-url".to_string();

        let result = ConfigurationMerger::new(config).merge_cli_args(&parse(&["shop-rs"]));
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
