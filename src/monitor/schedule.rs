//! Scheduled probing rounds.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::ScheduleConfig;
use crate::monitor::Aggregator;

/// Drives [`Aggregator::run_round`] on a fixed interval until shutdown.
pub struct MonitorSchedule {
    aggregator: Arc<Aggregator>,
    config: ScheduleConfig,
}

impl MonitorSchedule {
    pub fn new(aggregator: Arc<Aggregator>, config: ScheduleConfig) -> Self {
        Self { aggregator, config }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Scheduled probing disabled");
            return;
        }

        tracing::info!(
            interval = self.config.interval_secs,
            "Probing schedule starting"
        );

        // First round fires one interval from now; startup already ran one.
        let interval = Duration::from_secs(self.config.interval_secs);
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let round = self.aggregator.run_round().await;
                    tracing::debug!(observations = round.len(), "Probing round complete");
                }
                _ = shutdown.recv() => {
                    tracing::info!("Probing schedule received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
