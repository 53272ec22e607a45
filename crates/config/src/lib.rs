use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "pineapple.toml",
    "config/pineapple.toml",
    "crates/config/pineapple.toml",
    "../pineapple.toml",
    "../config/pineapple.toml",
    "../crates/config/pineapple.toml",
];

pub const DEFAULT_DEV_API_URL: &str = "http://localhost:3001/api";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Which backend the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApiMode {
    #[default]
    Dev,
    Prod,
}

impl FromStr for ApiMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(ApiMode::Dev),
            "prod" | "production" => Ok(ApiMode::Prod),
            other => bail!("unknown api mode `{other}`, expected `dev` or `prod`"),
        }
    }
}

impl TryFrom<String> for ApiMode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApiMode> for String {
    fn from(mode: ApiMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiMode::Dev => f.write_str("dev"),
            ApiMode::Prod => f.write_str("prod"),
        }
    }
}

/// Settings for the REST backend the client consumes.
///
/// ```
/// use pineapple_config::{ApiConfig, ApiMode};
///
/// let api = ApiConfig::default();
/// assert_eq!(api.mode, ApiMode::Dev);
/// assert_eq!(api.request_timeout_seconds, 30);
/// assert_eq!(
///     api.resolve_base_url().unwrap().as_str(),
///     "http://localhost:3001/api"
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub mode: ApiMode,
    #[serde(default)]
    pub dev_url: Option<String>,
    #[serde(default)]
    pub prod_url: Option<String>,
    #[serde(default = "ApiConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl ApiConfig {
    const fn default_request_timeout() -> u64 {
        30
    }

    /// Pick the base URL for the configured mode.
    ///
    /// Production never falls back to a development URL: a missing
    /// `prod_url` is an error.
    pub fn resolve_base_url(&self) -> anyhow::Result<Url> {
        let raw = match self.mode {
            ApiMode::Prod => {
                let Some(prod_url) = self.prod_url.as_deref().filter(|url| !url.is_empty()) else {
                    bail!(
                        "api.mode is `prod` but api.prod_url is not set; \
                         set PINEAPPLE__API__PROD_URL to the production API URL"
                    );
                };
                if prod_url.contains("localhost") || prod_url.contains("127.0.0.1") {
                    warn!(url = prod_url, "production api url points at a local host");
                }
                prod_url
            }
            ApiMode::Dev => self
                .dev_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_DEV_API_URL),
        };

        let url = Url::parse(raw).with_context(|| format!("invalid api url `{raw}`"))?;
        debug!(mode = %self.mode, url = %url, "resolved api base url");
        Ok(url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mode: ApiMode::Dev,
            dev_url: None,
            prod_url: None,
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_storage_path")]
    pub storage_path: PathBuf,
}

impl SessionConfig {
    fn default_storage_path() -> PathBuf {
        PathBuf::from(".pineapple/session.json")
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: Self::default_storage_path(),
        }
    }
}

/// Load the client configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use pineapple_config::load;
///
/// std::env::remove_var("PINEAPPLE_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(config.api.request_timeout_seconds > 0);
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("api.mode", defaults.api.mode.to_string())?
        .set_default(
            "api.request_timeout_seconds",
            i64::try_from(defaults.api.request_timeout_seconds).unwrap_or(i64::MAX),
        )?
        .set_default(
            "session.storage_path",
            defaults.session.storage_path.display().to_string(),
        )?;

    let environment_overrides = config::Environment::with_prefix("PINEAPPLE").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("PINEAPPLE_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via PINEAPPLE_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded client configuration");
    Ok(config)
}
