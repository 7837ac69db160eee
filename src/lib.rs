//! Rink Monitor Library
//!
//! This module exposes the core components of the Rink Monitor
//! application for testing and potential reuse.

pub mod api;
pub mod config;
pub mod events;
pub mod freeze;
pub mod monitor;
pub mod traits;

// Re-export commonly used types
pub use api::{ForecastClient, ForecastError, HourlyPeriod};
pub use config::{AppConfig, Coordinates, MonitorConfig, NetworkConfig};
pub use events::{FreezeReport, StatusEvent};
pub use freeze::longest_freeze_hours;
pub use monitor::ConditionMonitor;
pub use traits::{
    Clock, LogNotifier, MockClock, MockNotifier, Notifier, SystemClock, WebhookNotifier,
};
