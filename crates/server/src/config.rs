use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use server_api::relay::WEB3FORMS_ENDPOINT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    /// Relay forwarding is disabled while this is unset.
    pub web3forms_access_key: Option<String>,
    pub relay_url: String,
    pub site_url: String,
    pub response_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            web3forms_access_key: None,
            relay_url: WEB3FORMS_ENDPOINT.into(),
            site_url: "https://budgo.net".into(),
            response_delay_ms: 500,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    web3forms_access_key: Option<String>,
    relay_url: Option<String>,
    site_url: Option<String>,
    response_delay_ms: Option<u64>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = Path::new("server.toml");
    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.web3forms_access_key {
        settings.web3forms_access_key = Some(v);
    }
    if let Some(v) = file_cfg.relay_url {
        settings.relay_url = v;
    }
    if let Some(v) = file_cfg.site_url {
        settings.site_url = v;
    }
    if let Some(v) = file_cfg.response_delay_ms {
        settings.response_delay_ms = v;
    }
    Ok(())
}

/// Later keys win, so the `APP__` spelling overrides the bare one.
pub(crate) fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = first_set(&lookup, &["SERVER_BIND", "APP__BIND_ADDR"]) {
        settings.server_bind = v;
    }
    if let Some(v) = first_set(&lookup, &["WEB3FORMS_ACCESS_KEY", "APP__WEB3FORMS_ACCESS_KEY"]) {
        settings.web3forms_access_key = Some(v).filter(|key| !key.trim().is_empty());
    }
    if let Some(v) = first_set(&lookup, &["APP__RELAY_URL"]) {
        settings.relay_url = v;
    }
    if let Some(v) = first_set(&lookup, &["SITE_URL", "APP__SITE_URL"]) {
        settings.site_url = v;
    }
    if let Some(v) = first_set(&lookup, &["APP__RESPONSE_DELAY_MS"]) {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.response_delay_ms = parsed;
        }
    }
}

fn first_set(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter().rev().find_map(|key| lookup(key))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
