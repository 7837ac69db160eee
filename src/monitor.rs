//! One check cycle: fetch, evaluate, classify, emit.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::api::ForecastClient;
use crate::config::MonitorConfig;
use crate::events::{FreezeReport, StatusEvent};
use crate::freeze::longest_freeze_hours;
use crate::traits::{Clock, Notifier};

/// Orchestrates one evaluation cycle against the forecast source.
///
/// Keeps no state between cycles; every cycle is independent, and
/// re-running against identical upstream data produces the same event.
pub struct ConditionMonitor {
    client: ForecastClient,
    config: MonitorConfig,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl ConditionMonitor {
    pub fn new(
        client: ForecastClient,
        config: MonitorConfig,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            config,
            clock,
            notifier,
        }
    }

    /// Run one cycle and emit exactly one status event, failure included.
    ///
    /// Forecast failures are absorbed here and surface as a
    /// `freeze_error` event; nothing propagates to the scheduler. The
    /// emitted event is also returned for observability.
    pub async fn run_cycle(&self) -> StatusEvent {
        let event = match self
            .client
            .fetch_hourly_periods(self.config.coordinates)
            .await
        {
            Ok(periods) => {
                let longest = longest_freeze_hours(&periods, self.config.freeze_threshold_f);
                let report = FreezeReport {
                    latitude: self.config.coordinates.latitude,
                    longitude: self.config.coordinates.longitude,
                    longest_freeze_hours: longest,
                    threshold_f: self.config.freeze_threshold_f,
                    required_hours: self.config.required_hours,
                    checked_at: self.clock.now_utc(),
                };

                if longest >= self.config.required_hours {
                    tracing::info!(
                        longest_freeze_hours = longest,
                        required_hours = self.config.required_hours,
                        forecast_hours = periods.len(),
                        "freeze window long enough, ice is ready"
                    );
                    StatusEvent::Ready(report)
                } else {
                    tracing::info!(
                        longest_freeze_hours = longest,
                        required_hours = self.config.required_hours,
                        forecast_hours = periods.len(),
                        "freeze window too short"
                    );
                    StatusEvent::NotReady(report)
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "forecast check failed");
                StatusEvent::Error {
                    error: err.to_string(),
                }
            }
        };

        // Delivery failure is logged but never breaks the schedule
        if let Err(err) = self.notifier.notify(event.name(), &event.payload()) {
            tracing::error!(error = %err, event = event.name(), "failed to deliver status event");
        }

        event
    }

    /// Run cycles on a fixed interval until `shutdown` resolves.
    ///
    /// The first tick completes immediately, so a result appears at
    /// startup without waiting a full interval. A started cycle always
    /// runs to completion; a shutdown arriving mid-cycle is observed
    /// right after that cycle returns, before another is scheduled.
    pub async fn run_scheduled(&self, interval: Duration, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Armed once, outside the loop, so a signal delivered while a
        // cycle is in flight is not lost
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping check loop");
                    break;
                }
            }
        }
    }
}
