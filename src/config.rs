use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;

use crate::domain::InstallationType;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub session: SessionConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub http_timeout_seconds: u64,
}

/// Defaults applied to a freshly created quote session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub default_warranty_years: u32,
    pub default_installation_type: InstallationType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    pub target_power_kw: f64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("SQE__").split("__"));
        Ok(figment.extract()?)
    }
}
