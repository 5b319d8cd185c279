use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "tracker.toml";

/// Alert window of the original single-field tracker.
pub const MINIMAL_ALERT_WINDOW_DAYS: u32 = 5;
/// Alert window of the tracker with service types and fees.
pub const EXTENDED_ALERT_WINDOW_DAYS: u32 = 7;

const MAX_ALERT_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Unit cost per service type, keyed by the lowercase service name.
    #[serde(default = "default_costs")]
    pub costs: BTreeMap<String, Decimal>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { tracker: TrackerConfig::default(), costs: default_costs() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_alert_window")]
    pub alert_window_days: u32,
    #[serde(default)]
    pub import_validation: ImportValidationMode,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            storage_key: default_storage_key(),
            alert_window_days: default_alert_window(),
            import_validation: ImportValidationMode::default(),
        }
    }
}

/// How much of an imported document is schema-checked before it may replace the store.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImportValidationMode {
    /// Only the first element is checked.
    FirstElement,
    #[default]
    EveryElement,
}

fn default_data_path() -> String { "data/renewals.json".into() }
fn default_storage_key() -> String { "renewals".into() }
fn default_alert_window() -> u32 { EXTENDED_ALERT_WINDOW_DAYS }

fn default_costs() -> BTreeMap<String, Decimal> {
    BTreeMap::from([
        ("unitv".to_string(), Decimal::new(1200, 2)),
        ("iptv".to_string(), Decimal::new(1000, 2)),
    ])
}

/// Load from `CONFIG_PATH` (or `tracker.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.tracker.normalize()?;
        let mut costs = BTreeMap::new();
        for (service, cost) in std::mem::take(&mut self.costs) {
            if cost < Decimal::ZERO {
                return Err(anyhow!("costs.{service} must not be negative"));
            }
            costs.insert(service.trim().to_ascii_lowercase(), cost);
        }
        self.costs = costs;
        Ok(())
    }
}

impl TrackerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.data_path.trim().is_empty() {
            self.data_path = default_data_path();
        }
        if self.storage_key.trim().is_empty() {
            self.storage_key = default_storage_key();
        }
        if self.alert_window_days > MAX_ALERT_WINDOW_DAYS {
            return Err(anyhow!("tracker.alert_window_days must be within 0..={MAX_ALERT_WINDOW_DAYS}"));
        }
        Ok(())
    }
}
