//! TOML configuration for the portal client.
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:8000"
//! version = "legacy"        # or "v1"
//! timeout_secs = 15
//!
//! [display]
//! utc_offset_minutes = 330
//! skeleton_count = 6
//! manual_task_label = "Manual Task"
//!
//! [types]
//! hide_all = ["quiz", "forum", "assign"]
//! hide_download = ["url"]
//! direct_url = []
//!
//! [server]
//! bind = "127.0.0.1:7410"
//! ```
//!
//! Every section is optional; [`Config::minimal`] holds the defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::api::ApiVersion;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub types: TypeRulesConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub version: ApiVersion,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: ApiVersion::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Offset applied to document timestamps before formatting.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_skeleton_count")]
    pub skeleton_count: usize,
    #[serde(default = "default_manual_task_label")]
    pub manual_task_label: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            skeleton_count: default_skeleton_count(),
            manual_task_label: default_manual_task_label(),
        }
    }
}

fn default_skeleton_count() -> usize {
    6
}
fn default_manual_task_label() -> String {
    "Manual Task".to_string()
}

/// Document types that change which card actions are shown.
#[derive(Debug, Deserialize, Clone)]
pub struct TypeRulesConfig {
    #[serde(default = "default_hide_all")]
    pub hide_all: BTreeSet<String>,
    #[serde(default = "default_hide_download")]
    pub hide_download: BTreeSet<String>,
    #[serde(default)]
    pub direct_url: BTreeSet<String>,
}

impl Default for TypeRulesConfig {
    fn default() -> Self {
        Self {
            hide_all: default_hide_all(),
            hide_download: default_hide_download(),
            direct_url: BTreeSet::new(),
        }
    }
}

fn default_hide_all() -> BTreeSet<String> {
    ["quiz", "forum", "assign"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_hide_download() -> BTreeSet<String> {
    BTreeSet::from(["url".to_string()])
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7410".to_string()
}

impl Config {
    /// Defaults for every section, used when no config file exists.
    pub fn minimal() -> Self {
        Self {
            api: ApiConfig::default(),
            display: DisplayConfig::default(),
            types: TypeRulesConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Apply command-line overrides and validate the result again.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        version: Option<ApiVersion>,
    ) -> Result<Self> {
        if let Some(base_url) = base_url {
            self.api.base_url = base_url;
        }
        if let Some(version) = version {
            self.api.version = version;
        }
        validate(&mut self)?;
        Ok(self)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&mut config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

fn validate(config: &mut Config) -> Result<()> {
    let base = config.api.base_url.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        anyhow::bail!("api.base_url must not be empty");
    }
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!("api.base_url must start with http:// or https://, got '{}'", base);
    }
    config.api.base_url = base;

    if config.api.timeout_secs == 0 {
        anyhow::bail!("api.timeout_secs must be > 0");
    }

    // Offsets beyond +/-14h are not real time zones.
    if config.display.utc_offset_minutes.abs() > 14 * 60 {
        anyhow::bail!(
            "display.utc_offset_minutes must be within [-840, 840], got {}",
            config.display.utc_offset_minutes
        );
    }

    // Type tags are compared after lowercasing.
    for set in [
        &mut config.types.hide_all,
        &mut config.types.hide_download,
        &mut config.types.direct_url,
    ] {
        *set = set.iter().map(|t| t.trim().to_lowercase()).collect();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.api.version, ApiVersion::Legacy);
        assert_eq!(cfg.display.skeleton_count, 6);
        assert!(cfg.types.hide_all.contains("quiz"));
        assert!(cfg.types.hide_download.contains("url"));
        assert!(cfg.types.direct_url.is_empty());
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            r#"
[api]
base_url = "https://portal.example.edu/"
version = "v1"
timeout_secs = 5

[display]
utc_offset_minutes = 330

[types]
hide_all = ["Quiz"]
direct_url = ["URL"]
"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.api.base_url, "https://portal.example.edu");
        assert_eq!(cfg.api.version, ApiVersion::V1);
        assert_eq!(cfg.display.utc_offset_minutes, 330);
        assert!(cfg.types.hide_all.contains("quiz"));
        assert!(cfg.types.direct_url.contains("url"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let file = write_config("[api]\nbase_url = \"ftp://nope\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_overrides_are_validated() {
        assert!(Config::minimal()
            .with_overrides(Some("ftp://nope".into()), None)
            .is_err());
        assert!(Config::minimal()
            .with_overrides(Some("  ".into()), None)
            .is_err());

        let cfg = Config::minimal()
            .with_overrides(Some("https://portal.example/".into()), Some(ApiVersion::V1))
            .unwrap();
        assert_eq!(cfg.api.base_url, "https://portal.example");
        assert_eq!(cfg.api.version, ApiVersion::V1);
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let file = write_config("[api]\ntimeout_secs = 0\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let file = write_config("[api]\nversion = \"v9\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let cfg = load_or_default(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:7410");
    }
}
