use crate::error::EngineError;
use crate::logging::{LogFormat, LogOutput, LoggingConfig};
use crate::profiles::{Profile, ProfileKind};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const PROFILE_ENV: &str = "GRAPHOL_PROFILE";
const DEFAULT_PROFILE: ProfileKind = ProfileKind::Owl2Ql;

/// Engine settings: the active profile and optional logging overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub profile: ProfileKind,
    pub logging: LoggingSection,
}

/// `[logging]` table. Unset fields fall back to `LOG_*` variables or the
/// logging defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub format: Option<LogFormat>,
    pub output: Option<LogOutput>,
    pub dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE,
            logging: LoggingSection::default(),
        }
    }
}

impl EngineConfig {
    /// Reads a TOML (or JSON) config file, then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let file_config = load_config_file(path)?;
        Self::from_partial(file_config)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_partial(PartialConfig::default())
    }

    fn from_partial(file_config: PartialConfig) -> Result<Self> {
        let PartialConfig {
            profile: file_profile,
            logging: file_logging,
        } = file_config;

        let env_profile = match env::var(PROFILE_ENV) {
            Ok(raw) => Some(parse_profile(&raw).with_context(|| {
                format!("invalid {} environment variable", PROFILE_ENV)
            })?),
            Err(_) => None,
        };

        let profile = match (env_profile, file_profile) {
            (Some(profile), _) => profile,
            (None, Some(raw)) => parse_profile(&raw).context("invalid profile in config file")?,
            (None, None) => DEFAULT_PROFILE,
        };

        let logging = file_logging.unwrap_or_default();
        if let Some(dir) = logging.dir.as_ref() {
            anyhow::ensure!(
                !dir.as_os_str().is_empty(),
                "logging.dir must not be empty"
            );
        }

        tracing::debug!(profile = %profile, "engine configuration resolved");
        Ok(Self { profile, logging })
    }

    /// Builds the configured profile.
    pub fn profile(&self) -> Profile {
        Profile::from_kind(self.profile)
    }

    /// Logging configuration with `LOG_*` variables taking precedence over the
    /// `[logging]` table.
    pub fn logging_config(&self) -> LoggingConfig {
        let mut config = LoggingConfig::from_env();
        if env::var_os("LOG_FORMAT").is_none() {
            if let Some(format) = self.logging.format {
                config.format = format;
            }
        }
        if env::var_os("LOG_OUTPUT").is_none() {
            if let Some(output) = self.logging.output {
                config.output = output;
            }
        }
        if env::var_os("LOG_DIR").is_none() {
            if let Some(dir) = self.logging.dir.as_ref() {
                config.log_dir = dir.clone();
            }
        }
        config
    }
}

fn parse_profile(raw: &str) -> std::result::Result<ProfileKind, EngineError> {
    raw.trim()
        .parse()
        .map_err(|_| EngineError::Config(format!("unknown profile '{}'", raw.trim())))
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    profile: Option<String>,
    logging: Option<LoggingSection>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .map_err(EngineError::from)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => toml::from_str(&contents)
            .with_context(|| format!("failed to parse TOML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
