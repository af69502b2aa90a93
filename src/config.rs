// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.brokee", "Brokee", "brokee"));

pub const ENV_API_URL: &str = "BROKEE_API_URL";
pub const ENV_TOKEN: &str = "BROKEE_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub page_size: usize,
    pub request_timeout_secs: u64,
    pub geo_timeout_secs: u64,
    /// Bearer token issued by the identity provider.
    pub access_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".to_string(),
            page_size: 10,
            request_timeout_secs: 15,
            geo_timeout_secs: 10,
            access_token: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Reads a TOML config; a missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let mut cfg: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse TOML from config file {}", path.display()))?;
    if cfg.page_size == 0 {
        cfg.page_size = AppConfig::default().page_size;
    }
    Ok(cfg)
}

/// Applies overrides from a variable lookup (normally the process environment).
pub fn apply_overrides<F>(mut cfg: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        cfg.api_url = url.trim().to_string();
    }
    if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
        cfg.access_token = Some(token.trim().to_string());
    }
    cfg
}

pub fn load(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    let cfg = load_from(&path)?;
    Ok(apply_overrides(cfg, |key| std::env::var(key).ok()))
}
