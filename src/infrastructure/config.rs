use crate::domain::history::DEFAULT_HISTORY_CAPACITY;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    /// Base URL of the inspection/prediction service
    pub api_base: String,
    /// Base URL of the backend serving the aggregate dashboard
    pub summary_base: String,
    pub bind_addr: String,
    pub history_capacity: usize,
    pub result_log_capacity: usize,
    pub request_timeout_ms: u64,
    pub demo_jitter: bool,
    pub body_confidence: f64,
    pub intervals: IntervalSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IntervalSettings {
    pub press_image_ms: u64,
    pub press_vibration_ms: u64,
    pub body_assembly_ms: u64,
    pub welding_image_ms: u64,
}

impl MonitorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let intervals = [
            ("press_image_ms", self.intervals.press_image_ms),
            ("press_vibration_ms", self.intervals.press_vibration_ms),
            ("body_assembly_ms", self.intervals.body_assembly_ms),
            ("welding_image_ms", self.intervals.welding_image_ms),
        ];
        for (key, value) in intervals {
            if value == 0 {
                anyhow::bail!("intervals.{} must be greater than zero", key);
            }
        }
        if self.request_timeout_ms == 0 {
            anyhow::bail!("request_timeout_ms must be greater than zero");
        }
        if self.history_capacity == 0 || self.result_log_capacity == 0 {
            anyhow::bail!("history_capacity and result_log_capacity must be greater than zero");
        }
        if !(0.0..=1.0).contains(&self.body_confidence) {
            anyhow::bail!("body_confidence must be within 0..=1, got {}", self.body_confidence);
        }
        Ok(())
    }
}

impl IntervalSettings {
    pub fn press_image(&self) -> Duration {
        Duration::from_millis(self.press_image_ms)
    }

    pub fn press_vibration(&self) -> Duration {
        Duration::from_millis(self.press_vibration_ms)
    }

    pub fn body_assembly(&self) -> Duration {
        Duration::from_millis(self.body_assembly_ms)
    }

    pub fn welding_image(&self) -> Duration {
        Duration::from_millis(self.welding_image_ms)
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(builder
        .set_default("api_base", "http://localhost:8000")?
        .set_default("summary_base", "http://localhost:8080")?
        .set_default("bind_addr", "0.0.0.0:8090")?
        .set_default("history_capacity", DEFAULT_HISTORY_CAPACITY as i64)?
        .set_default("result_log_capacity", 50)?
        .set_default("request_timeout_ms", 10_000)?
        .set_default("demo_jitter", false)?
        .set_default("body_confidence", 0.25)?
        .set_default("intervals.press_image_ms", 5_000)?
        .set_default("intervals.press_vibration_ms", 2_000)?
        .set_default("intervals.body_assembly_ms", 5_000)?
        .set_default("intervals.welding_image_ms", 5_000)?)
}

fn build(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<MonitorConfig> {
    let settings = builder.build()?;
    let config: MonitorConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// `config/monitor.toml` (optional) overridden by `MONITOR__*` env vars,
/// e.g. `MONITOR__API_BASE` or `MONITOR__INTERVALS__PRESS_IMAGE_MS`.
pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    let builder = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/monitor").required(false))
        .add_source(
            config::Environment::with_prefix("MONITOR")
                .separator("__")
                .try_parsing(true),
        );

    build(builder)
}
