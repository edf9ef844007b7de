use serde::Deserialize;
use std::env;

use crate::CoreResult;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub session: SessionSettings,
    pub preview: PreviewSettings,
    pub pricing: PricingSettings,
    pub app: AppSettings,
}

/// Live search flow
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionSettings {
    pub search_latency_ms: u64,
    pub refresh_interval_ms: u64,
    pub batch_size: usize,
    pub auto_update: bool,
    /// Fixes the random source; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            search_latency_ms: 2000,
            refresh_interval_ms: 5000,
            batch_size: 8,
            auto_update: true,
            seed: None,
        }
    }
}

/// Static "live prices" band
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PreviewSettings {
    pub refresh_interval_ms: u64,
    pub settle_ms: u64,
    pub seed: Option<u64>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 10_000,
            settle_ms: 1000,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PricingSettings {
    pub price_floor: i32,
    /// Width of the per-tick delta window for live results
    pub live_swing: i32,
    /// Width of the per-tick delta window for the preview band
    pub preview_swing: i32,
    pub discount_probability: f64,
    pub discount_markup: i32,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            price_floor: 200,
            live_swing: 50,
            preview_swing: 100,
            discount_probability: 0.4,
            discount_markup: 150,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppSettings {
    /// Mutation ticks rendered before the demo tears its session down
    pub ticks: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self { ticks: 3 }
    }
}

impl Config {
    pub fn load() -> CoreResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `SKYFARE__SESSION__SEED=7` pins the live random source
            .add_source(config::Environment::with_prefix("SKYFARE").separator("__"))
            .build()?;

        let config: Config = s.try_deserialize()?;
        tracing::debug!(run_mode = %run_mode, "configuration loaded");
        Ok(config)
    }
}
