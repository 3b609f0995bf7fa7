//! Engine configuration loading from TOML and JSON files.
//!
//! Every test runs `#[serial]` because `GRAPHOL_PROFILE` and `LOG_*` are
//! process-wide. Tests that set them restore the previous values on drop.

use anyhow::Result;
use graphol_profiles::logging::{LogFormat, LogOutput};
use graphol_profiles::{EngineConfig, ProfileKind};
use serial_test::serial;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ENV_KEYS: [&str; 4] = ["GRAPHOL_PROFILE", "LOG_FORMAT", "LOG_OUTPUT", "LOG_DIR"];

/// Clears the config variables and puts the old values back on drop.
struct EnvGuard {
    saved: Vec<(&'static str, Option<OsString>)>,
}

impl EnvGuard {
    fn clean() -> Self {
        let saved = ENV_KEYS.iter().map(|key| (*key, env::var_os(key))).collect();
        for key in ENV_KEYS {
            unsafe { env::remove_var(key) };
        }
        Self { saved }
    }

    fn set(&self, key: &str, value: &str) {
        unsafe { env::set_var(key, value) };
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(value) => unsafe { env::set_var(key, value) },
                None => unsafe { env::remove_var(key) },
            }
        }
    }
}

fn write_config(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

#[test]
#[serial]
fn test_toml_config_selects_profile() -> Result<()> {
    let _env = EnvGuard::clean();
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        "graphol.toml",
        r#"
        profile = "owl2"

        [logging]
        format = "json"
        "#,
    )?;

    let config = EngineConfig::load(&path)?;
    assert_eq!(config.profile, ProfileKind::Owl2);
    assert_eq!(config.logging.format, Some(LogFormat::Json));
    assert_eq!(config.profile().kind(), ProfileKind::Owl2);
    assert!(config.profile().node_rule_names().is_empty());
    Ok(())
}

#[test]
#[serial]
fn test_json_config_accepts_display_name() -> Result<()> {
    let _env = EnvGuard::clean();
    let dir = TempDir::new()?;
    let path = write_config(&dir, "graphol.json", r#"{ "profile": "OWL 2 QL" }"#)?;

    let config = EngineConfig::load(&path)?;
    assert_eq!(config.profile, ProfileKind::Owl2Ql);
    assert_eq!(config.profile().node_rule_names().len(), 5);
    Ok(())
}

#[test]
#[serial]
fn test_missing_profile_defaults_to_ql() -> Result<()> {
    let _env = EnvGuard::clean();
    let dir = TempDir::new()?;
    let path = write_config(&dir, "graphol.toml", "[logging]\noutput = \"file\"\n")?;

    let config = EngineConfig::load(&path)?;
    assert_eq!(config.profile, ProfileKind::Owl2Ql);
    Ok(())
}

#[test]
#[serial]
fn test_unknown_profile_is_rejected() -> Result<()> {
    let _env = EnvGuard::clean();
    let dir = TempDir::new()?;
    let path = write_config(&dir, "graphol.toml", "profile = \"owl2el\"\n")?;

    let err = EngineConfig::load(&path).unwrap_err();
    assert_eq!(err.to_string(), "invalid profile in config file");
    assert!(format!("{:#}", err).contains("unknown profile 'owl2el'"));
    Ok(())
}

#[test]
#[serial]
fn test_empty_log_dir_is_rejected() -> Result<()> {
    let _env = EnvGuard::clean();
    let dir = TempDir::new()?;
    let path = write_config(&dir, "graphol.toml", "[logging]\ndir = \"\"\n")?;

    let err = EngineConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("logging.dir must not be empty"));
    Ok(())
}

#[test]
#[serial]
fn test_unsupported_extension_and_missing_file() -> Result<()> {
    let _env = EnvGuard::clean();
    let dir = TempDir::new()?;
    let yaml = write_config(&dir, "graphol.yaml", "profile: owl2\n")?;

    let err = EngineConfig::load(&yaml).unwrap_err();
    assert!(err.to_string().contains("unsupported config extension: yaml"));

    let missing = dir.path().join("absent.toml");
    let err = EngineConfig::load(&missing).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    Ok(())
}

#[test]
#[serial]
fn test_from_env_defaults_and_profile_variable() -> Result<()> {
    let env = EnvGuard::clean();
    assert_eq!(EngineConfig::from_env()?, EngineConfig::default());

    env.set("GRAPHOL_PROFILE", "owl2");
    let config = EngineConfig::from_env()?;
    assert_eq!(config.profile, ProfileKind::Owl2);
    assert_eq!(config.profile().name(), "OWL 2");
    Ok(())
}

#[test]
#[serial]
fn test_profile_variable_overrides_file_profile() -> Result<()> {
    let env = EnvGuard::clean();
    let dir = TempDir::new()?;
    let path = write_config(&dir, "graphol.toml", "profile = \"owl2ql\"\n")?;

    env.set("GRAPHOL_PROFILE", " OWL 2 ");
    let config = EngineConfig::load(&path)?;
    assert_eq!(config.profile, ProfileKind::Owl2);
    Ok(())
}

#[test]
#[serial]
fn test_invalid_profile_variable_is_rejected() -> Result<()> {
    let env = EnvGuard::clean();
    let dir = TempDir::new()?;
    let path = write_config(&dir, "graphol.toml", "profile = \"owl2\"\n")?;

    env.set("GRAPHOL_PROFILE", "owl2rl");
    let err = EngineConfig::from_env().unwrap_err();
    assert_eq!(err.to_string(), "invalid GRAPHOL_PROFILE environment variable");
    assert!(format!("{:#}", err).contains("unknown profile 'owl2rl'"));

    // A valid file profile does not rescue a bad variable.
    let err = EngineConfig::load(&path).unwrap_err();
    assert_eq!(err.to_string(), "invalid GRAPHOL_PROFILE environment variable");
    Ok(())
}

#[test]
#[serial]
fn test_log_variables_override_logging_table() -> Result<()> {
    let env = EnvGuard::clean();
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        "graphol.toml",
        r#"
        [logging]
        format = "json"
        output = "file"
        dir = "table-logs"
        "#,
    )?;
    let config = EngineConfig::load(&path)?;

    let logging = config.logging_config();
    assert_eq!(logging.format, LogFormat::Json);
    assert_eq!(logging.output, LogOutput::File);
    assert_eq!(logging.log_dir, PathBuf::from("table-logs"));

    env.set("LOG_FORMAT", "pretty");
    env.set("LOG_DIR", "env-logs");
    let logging = config.logging_config();
    assert_eq!(logging.format, LogFormat::Pretty);
    assert_eq!(logging.output, LogOutput::File);
    assert_eq!(logging.log_dir, PathBuf::from("env-logs"));
    Ok(())
}
