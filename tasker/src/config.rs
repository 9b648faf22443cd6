use log::LevelFilter;
use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "TASKER";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the task file.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_file")]
    pub file: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            file: default_file(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads configuration from `TASKER_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
        let settings = config::Config::builder().add_source(environment).build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Full path of the task file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }

    /// Falls back to `warn` when the configured level is not recognised.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Warn)
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file() -> String {
    "tasker.json".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}
