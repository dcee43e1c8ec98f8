//! Periodic `xrpData` broadcast.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};

use crate::events::{EventHub, GatewayEvent};
use crate::price::source::PriceSource;

/// Background task relaying market data to every open socket.
pub struct PriceFeed {
    source: Arc<dyn PriceSource>,
    hub: EventHub,
    interval: Duration,
}

impl PriceFeed {
    pub fn new(source: Arc<dyn PriceSource>, hub: EventHub, interval: Duration) -> Self {
        Self { source, hub, interval }
    }

    /// Fetch once and broadcast. Returns the number of sockets reached, or
    /// `None` when nothing was sent.
    ///
    /// Skips the API call entirely while no client is connected.
    pub async fn tick(&self) -> Option<usize> {
        if self.hub.connection_count() == 0 {
            return None;
        }

        match self.source.fetch().await {
            Ok(data) => Some(self.hub.broadcast(&GatewayEvent::XrpData { data })),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch XRP market data");
                None
            }
        }
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Price feed started");

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Price feed stopped");
                    break;
                }
            }
        }
    }
}
