use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub location: LocationConfig,
    pub conditions: ConditionsConfig,
    pub network: NetworkConfig,
    pub schedule: ScheduleConfig,
    pub notifications: NotificationConfig,
}

/// Geographic point the forecast is resolved for. Set once at
/// configuration time, never mutated afterwards.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Minneapolis, a reasonable pond hockey town
        Self {
            latitude: 44.9778,
            longitude: -93.2650,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ConditionsConfig {
    /// Hourly readings at or below this temperature count as freezing.
    pub freeze_threshold_f: f64,
    /// Contiguous freezing hours needed before the ice is considered ready.
    pub required_hours: u32,
}

impl Default for ConditionsConfig {
    fn default() -> Self {
        Self {
            freeze_threshold_f: 25.0,
            required_hours: 72,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    /// Base URL of the points-lookup service.
    pub points_url: String,
    /// Identifying header sent with every request, a courtesy to the
    /// upstream service.
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            points_url: "https://api.weather.gov".to_string(),
            user_agent: "rink-monitor/0.1 (you@example.com)".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ScheduleConfig {
    pub check_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            // 6 hours
            check_interval_secs: 21_600,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NotificationConfig {
    /// Optional endpoint that receives every status event as JSON.
    /// When unset, events only appear in the log.
    pub webhook_url: Option<String>,
}

/// The full parameter set for one monitor instance, derived from the
/// loaded configuration in exactly one place.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub coordinates: Coordinates,
    pub freeze_threshold_f: f64,
    pub required_hours: u32,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rink-monitor");

        let builder = Config::builder()
            // 1. Load default values
            // Location
            .set_default("location.latitude", 44.9778)?
            .set_default("location.longitude", -93.2650)?
            // Conditions
            .set_default("conditions.freeze_threshold_f", 25.0)?
            .set_default("conditions.required_hours", 72)?
            // Network
            .set_default("network.points_url", "https://api.weather.gov")?
            .set_default("network.user_agent", "rink-monitor/0.1 (you@example.com)")?
            .set_default("network.request_timeout_secs", 30)?
            .set_default("network.connect_timeout_secs", 10)?
            // Schedule
            .set_default("schedule.check_interval_secs", 21_600)?
            // Notifications
            .set_default("notifications.webhook_url", None::<String>)?

            // 2. Load from local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))

            // 3. Load from user config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false))

            // 4. Load from environment variables (RINK__LOCATION__LATITUDE=...)
            .add_source(Environment::with_prefix("RINK").separator("__"));

        let s = builder.build()?;
        Ok(s.try_deserialize()?)
    }

    /// Collapse the loaded sections into the monitor's parameter set.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            coordinates: Coordinates {
                latitude: self.location.latitude,
                longitude: self.location.longitude,
            },
            freeze_threshold_f: self.conditions.freeze_threshold_f,
            required_hours: self.conditions.required_hours,
        }
    }
}
