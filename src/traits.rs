//! Abstractions for time and side effects to enable testing.
//!
//! This module provides traits for:
//! - `Clock`: Abstracting time access for deterministic testing
//! - `Notifier`: Abstracting event delivery to the automation layer

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

// ==================== Clock Trait ====================

/// Trait for abstracting time access.
///
/// The monitor stamps every report with the current time; injecting a
/// mock clock keeps those timestamps deterministic in tests.
pub trait Clock: Send + Sync {
    /// Get the current time in UTC.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable clock for tests. Clones share the underlying time, so
/// a test can hold one handle while the monitor holds another.
#[derive(Debug, Clone)]
pub struct MockClock {
    utc_time: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a mock clock frozen at the given UTC time.
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            utc_time: Arc::new(Mutex::new(time)),
        }
    }

    /// Jump the clock to a new time.
    pub fn set_time(&self, time: DateTime<Utc>) {
        *self.utc_time.lock().unwrap() = time;
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut time = self.utc_time.lock().unwrap();
        *time = *time + duration;
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.utc_time.lock().unwrap()
    }
}

// ==================== Notifier Trait ====================

/// Trait for delivering named events to the downstream automation layer.
///
/// This allows testing the monitor's emit behavior without a live
/// event bus.
pub trait Notifier: Send + Sync {
    /// Deliver a named event with a JSON payload mapping.
    fn notify(&self, event: &str, payload: &Value) -> Result<()>;
}

/// Notifier that writes each event to the log. The default bus when no
/// webhook is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &str, payload: &Value) -> Result<()> {
        tracing::info!(event, %payload, "status event");
        Ok(())
    }
}

/// Notifier that posts each event to a configured webhook endpoint.
///
/// Deliveries run on background threads so a slow webhook never stalls
/// a check cycle. The handles are retained so `flush` (and drop) can
/// drain in-flight deliveries; an accepted event is posted or logged,
/// never abandoned by process exit.
#[derive(Debug)]
pub struct WebhookNotifier {
    url: String,
    inflight: Mutex<Vec<std::thread::JoinHandle<()>>>,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            url,
            inflight: Mutex::new(Vec::new()),
        }
    }

    /// Wait for every delivery thread started so far to finish.
    pub fn flush(&self) {
        let handles = std::mem::take(&mut *self.inflight.lock().unwrap());
        for handle in handles {
            let _ = handle.join();
        }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, event: &str, payload: &Value) -> Result<()> {
        let url = self.url.clone();
        let body = json!({ "event": event, "payload": payload });

        let handle = std::thread::spawn(move || {
            // Use blocking reqwest to avoid async complexity
            if let Ok(client) = reqwest::blocking::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
            {
                if let Err(err) = client.post(&url).json(&body).send() {
                    tracing::warn!(error = %err, url = %url, "webhook delivery failed");
                }
            }
        });

        let mut inflight = self.inflight.lock().unwrap();
        inflight.retain(|h| !h.is_finished());
        inflight.push(handle);

        Ok(())
    }
}

impl Drop for WebhookNotifier {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Mock notifier for testing that records all delivered events.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    events: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockNotifier {
    /// Create a new mock notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all events that have been delivered.
    pub fn get_events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }

    /// Get the count of events delivered.
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Check if any event was delivered.
    pub fn was_called(&self) -> bool {
        !self.events.lock().unwrap().is_empty()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, event: &str, payload: &Value) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), payload.clone()));
        Ok(())
    }
}
