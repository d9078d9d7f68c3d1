use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime settings, layered from an optional TOML file and
/// `CULINA__`-prefixed environment variables.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Structured JSON output instead of the pretty console format.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path),
            None => File::with_name("culina").required(false),
        };
        ConfigBuilder::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("CULINA").separator("__"))
            .build()?
            .try_deserialize()
    }
}
