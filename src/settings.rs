use crate::error::Result;
use crate::utils::constants::{
    CONFIG_FILE_STEM, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_URL, DEFAULT_STORE_FILE,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ENV_PREFIX,
};
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Runtime settings. Layered as defaults, then `sea-temps.toml` (or an
/// explicit file), then `SEA_TEMPS_*` environment variables, then CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    pub store_path: PathBuf,

    pub output_dir: PathBuf,

    #[validate(url)]
    pub source_url: String,

    #[validate(length(min = 1))]
    pub user_agent: String,

    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_file, None)
    }

    /// Same as [`load`](Self::load), reading the `SEA_TEMPS_*` layer from
    /// `env` instead of the process environment when given.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("store_path", DEFAULT_STORE_FILE)?
            .set_default("output_dir", DEFAULT_OUTPUT_DIR)?
            .set_default("source_url", DEFAULT_SOURCE_URL)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?;

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(CONFIG_FILE_STEM).required(false)),
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!("Loaded settings: {:?}", settings);

        Ok(settings)
    }

    pub fn with_store_path(mut self, store_path: Option<PathBuf>) -> Self {
        if let Some(path) = store_path {
            self.store_path = path;
        }
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }

    pub fn with_source_url(mut self, source_url: Option<String>) -> Result<Self> {
        if let Some(url) = source_url {
            self.source_url = url;
            self.validate()?;
        }
        Ok(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
