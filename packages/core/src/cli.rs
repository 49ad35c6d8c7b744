use std::net::SocketAddr;

use clap::Parser;

use crate::config::LoggerConfig;
use crate::severity::Severity;

/// Request logger demo service CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "request-logger",
    version,
    about = "Demo HTTP service logging through the colored console formatter"
)]
pub struct Cli {
    /// Minimum log level (DEBUG, INFO, WARN or ERROR)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Do not append the call site to log lines
    #[arg(long)]
    pub no_caller: bool,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,
}

impl Cli {
    /// Layer command-line flags over the environment configuration.
    pub fn apply(&self, mut config: LoggerConfig) -> LoggerConfig {
        if let Some(name) = &self.log_level {
            config.level = Severity::resolve(name);
        }
        if self.no_color {
            config.ansi = false;
        }
        if self.no_caller {
            config.display_caller = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["request-logger", "--log-level", "WARN", "--no-color"]);
        let config = cli.apply(LoggerConfig::default());

        assert_eq!(config.level, Severity::Warn);
        assert!(!config.ansi);
        assert!(config.display_caller);
        assert_eq!(cli.bind, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::parse_from(["request-logger"]);
        let base = LoggerConfig {
            level: Severity::Error,
            ..LoggerConfig::default()
        };

        assert_eq!(cli.apply(base.clone()), base);
    }
}
