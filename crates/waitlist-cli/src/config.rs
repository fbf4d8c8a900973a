// Copyright 2026 Waitlist Dashboard Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_SEARCH_DEBOUNCE: &str = "500ms";
const APP_NAME: &str = "waitlist";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub search_debounce: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            search_debounce: Some(DEFAULT_SEARCH_DEBOUNCE.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("WAITLIST_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set WAITLIST_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [data] and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(seed_path) = &self.data.seed_path
            && seed_path.contains("://")
        {
            bail!(
                "data.seed_path in {} looks like a URI, expected a filesystem path: {}",
                path.display(),
                seed_path
            );
        }

        if let Some(debounce) = &self.ui.search_debounce {
            let parsed = parse_duration(debounce)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "ui.search_debounce in {} must be positive, got {}",
                    path.display(),
                    debounce
                );
            }
        }

        Ok(())
    }

    /// The configured seed file wins over the environment override.
    pub fn seed_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.data.seed_path {
            return Some(PathBuf::from(path));
        }
        env::var_os("WAITLIST_SEED_PATH").map(PathBuf::from)
    }

    pub fn search_debounce(&self) -> Result<Duration> {
        parse_duration(
            self.ui
                .search_debounce
                .as_deref()
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE),
        )
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# waitlist config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Optional. JSON array of provider records; falls back to WAITLIST_SEED_PATH\n# seed_path = \"/absolute/path/to/providers.json\"\n\n[ui]\nsearch_debounce = \"{}\"\n",
            path.display(),
            DEFAULT_SEARCH_DEBOUNCE,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid debounce duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid debounce duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use <N>ms or <N>s (for example 500ms)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.search_debounce()?, Duration::from_millis(500));
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\nsearch_debounce = \"500ms\"\n")?;
        let error = Config::load(&path).expect_err("unversioned schema should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[data] and [ui]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[data]\nseed_path = \"/srv/providers.json\"\n[ui]\nsearch_debounce = \"250ms\"\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.seed_path(), Some(PathBuf::from("/srv/providers.json")));
        assert_eq!(config.search_debounce()?, Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 9\n")?;
        let error = Config::load(&path).expect_err("v9 config should fail");
        assert!(error.to_string().contains("unsupported config version 9"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("WAITLIST_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("WAITLIST_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn seed_path_prefers_data_config_over_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[data]\nseed_path = \"/explicit/from-config.json\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("WAITLIST_SEED_PATH", "/from/env.json");
        }
        let config = Config::load(&path)?;
        let resolved = config.seed_path();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("WAITLIST_SEED_PATH");
        }
        assert_eq!(resolved, Some(PathBuf::from("/explicit/from-config.json")));
        Ok(())
    }

    #[test]
    fn seed_path_uses_env_override_when_config_value_missing() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("WAITLIST_SEED_PATH", "/from/env-only.json");
        }
        let config = Config::load(&path)?;
        let resolved = config.seed_path();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("WAITLIST_SEED_PATH");
        }
        assert_eq!(resolved, Some(PathBuf::from("/from/env-only.json")));
        Ok(())
    }

    #[test]
    fn seed_path_rejects_uri_style_value() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[data]\nseed_path = \"https://evil.example/providers.json\"\n",
        )?;
        let error = Config::load(&path).expect_err("URI seed_path should fail validation");
        assert!(error.to_string().contains("looks like a URI"));
        Ok(())
    }

    #[test]
    fn search_debounce_parses_ms_and_seconds() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("2s")?, Duration::from_secs(2));
        Ok(())
    }

    #[test]
    fn search_debounce_rejects_invalid_and_zero_values() -> Result<()> {
        let error = parse_duration("oops").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"));

        let (_temp, path) = write_config("version = 1\n[ui]\nsearch_debounce = \"0ms\"\n")?;
        let error = Config::load(&path).expect_err("zero debounce should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn example_config_includes_required_sections() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[data]"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("search_debounce"));
        Ok(())
    }
}
