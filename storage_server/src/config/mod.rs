//! Configuration for the storage server - using the CLI (clap), env (clap), and configuration
//! file (toml).

mod clap_config;
mod toml_config;

use clap::{parser::ValueSource, ArgMatches, ValueEnum};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("toml config error")]
    TomlConfig(#[from] toml_config::TomlConfigError),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub command: Option<ServerCommand>,

    /// Root directory where application data is stored
    pub root_dir: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// RPC listen address
    pub rpc_laddr: String,

    /// Secret key encoded as hex
    pub secret_key: Option<String>,

    /// Maximum height of any owner's tree
    pub max_height: usize,
}

impl Config {
    pub fn new() -> ConfigResult<Self> {
        Self::from_matches(clap_config::get_matches())
    }

    fn from_matches(matches: ArgMatches) -> ConfigResult<Self> {
        let mut config: Config = matches.clone().into();
        config.merge_toml_core_config(&matches)?;

        Ok(config)
    }

    fn was_supplied_by_user(key: &str, matches: &ArgMatches) -> bool {
        !matches!(matches.value_source(key), Some(ValueSource::DefaultValue))
    }

    /// The order of priority is (in decreasing order):
    /// cli -> env -> toml -> default
    ///
    /// A field with a default value is only taken from the TOML config when the user did not
    /// supply it. An optional field is only taken from the TOML config when it is still unset.
    fn merge_toml_core_config(&mut self, matches: &ArgMatches) -> ConfigResult<()> {
        let Some(mut toml_config) = toml_config::read_config(&self.root_dir)? else {
            return Ok(());
        };
        let core = &mut toml_config.core;

        if self.command.is_none() {
            self.command = core.command.take();
        }

        if !Self::was_supplied_by_user("log-level", matches) {
            if let Some(log_level) = core.log_level {
                self.log_level = log_level;
            }
        }

        if !Self::was_supplied_by_user("log-format", matches) {
            if let Some(log_format) = core.log_format {
                self.log_format = log_format;
            }
        }

        if !Self::was_supplied_by_user("rpc-laddr", matches) {
            if let Some(rpc_laddr) = core.rpc_laddr.take() {
                self.rpc_laddr = rpc_laddr;
            }
        }

        if self.secret_key.is_none() {
            self.secret_key = core.secret_key.take();
        }

        if !Self::was_supplied_by_user("max-height", matches) {
            if let Some(max_height) = core.max_height {
                self.max_height = max_height;
            }
        }

        Ok(())
    }
}

// To convert from an ArgMatches into the main `Config` entity used by the server.
// `clap` does not provide an automated way to do so in builder mode.
#[allow(clippy::unwrap_used)]
impl From<ArgMatches> for Config {
    fn from(am: ArgMatches) -> Self {
        Config {
            command: match am.subcommand() {
                Some(("start", _)) => Some(ServerCommand::Start),
                Some(("generate_key", _)) => Some(ServerCommand::GenerateKey),
                _ => None,
            },

            root_dir: am.get_one::<String>("root-dir").unwrap().clone(),
            log_level: *am.get_one::<LogLevel>("log-level").unwrap(),
            log_format: *am.get_one::<LogFormat>("log-format").unwrap(),
            rpc_laddr: am.get_one::<String>("rpc-laddr").unwrap().clone(),
            secret_key: am.get_one::<String>("secret-key").cloned(),
            max_height: *am.get_one::<usize>("max-height").unwrap(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub enum ServerCommand {
    /// Start the server
    #[serde(rename = "start")]
    Start,
    /// Generate a new secret key
    #[serde(rename = "generate_key")]
    GenerateKey,
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize, ValueEnum)]
#[clap(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    #[serde(rename = "DEBUG")]
    Debug,
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "ERROR")]
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Deserialize)]
#[clap(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogFormat {
    #[serde(rename = "PRETTY")]
    Pretty,
    #[serde(rename = "JSON")]
    Json,
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn parse(args: &[&str]) -> ConfigResult<Config> {
        Config::from_matches(clap_config::command().get_matches_from(args))
    }

    #[test]
    fn defaults() {
        let dir = tempfile::tempdir().unwrap();
        let root_dir = dir.path().to_str().unwrap();

        let config = parse(&["storage_server", "--root-dir", root_dir]).unwrap();

        assert_eq!(config.command, None);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.rpc_laddr, "0.0.0.0:8080");
        assert_eq!(config.max_height, 32);
        assert_eq!(config.secret_key, None);
    }

    #[test]
    fn toml_fills_in_defaults_but_not_cli_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config/config.toml"),
            r#"
[core]
command = "start"
log_format = "JSON"
rpc_laddr = "127.0.0.1:9000"
max_height = 20
"#,
        )
        .unwrap();
        let root_dir = dir.path().to_str().unwrap();

        let config = parse(&[
            "storage_server",
            "--root-dir",
            root_dir,
            "--max-height",
            "16",
        ])
        .unwrap();

        assert_eq!(config.command, Some(ServerCommand::Start));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.rpc_laddr, "127.0.0.1:9000");
        assert_eq!(config.max_height, 16);
    }

    #[test]
    fn subcommand() {
        let config = parse(&["storage_server", "generate_key"]).unwrap();
        assert_eq!(config.command, Some(ServerCommand::GenerateKey));
    }
}
