//! Cancellable ticker task

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::PriceCycle;
use crate::chain::TickerConfig;
use crate::core::{ChainError, ChainResult};

/// Spawns the demo price loop
pub struct PriceTicker;

impl PriceTicker {
    /// Start the ticker on the current tokio runtime.
    ///
    /// The first price is available immediately; each later one arrives one
    /// interval after the previous.
    pub fn spawn(config: &TickerConfig) -> ChainResult<TickerHandle> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| ChainError::invalid_input("price ticker needs a running tokio runtime"))?;
        if config.interval_ms == 0 {
            return Err(ChainError::invalid_input("ticker interval must be positive"));
        }

        let cycle = PriceCycle::new(config.prices.clone())?;
        let (tx, rx) = watch::channel(cycle.current());
        let cancel = CancellationToken::new();

        let task = runtime.spawn(run(cycle, config.interval(), tx, cancel.clone()));
        tracing::debug!("Price ticker started ({} ms interval)", config.interval_ms);

        Ok(TickerHandle {
            cancel,
            task: Some(task),
            rx,
        })
    }
}

async fn run(
    mut cycle: PriceCycle,
    period: Duration,
    tx: watch::Sender<f64>,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if cancel.is_cancelled() {
                    break;
                }
                let price = cycle.advance();
                if tx.send(price).is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!("Price ticker stopped at index {}", cycle.index());
}

/// Owner of a running ticker. Dropping it cancels the task.
#[derive(Debug)]
pub struct TickerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    rx: watch::Receiver<f64>,
}

impl TickerHandle {
    /// New receiver positioned at the latest price
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.rx.clone()
    }

    pub fn current(&self) -> f64 {
        *self.rx.borrow()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the task to finish
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    tracing::warn!("Price ticker task failed: {}", err);
                }
            }
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_publishes_cycle_at_interval() {
        let handle = PriceTicker::spawn(&TickerConfig::default()).unwrap();
        let mut rx = handle.subscribe();
        assert_eq!(*rx.borrow(), 175.3);

        let start = Instant::now();
        for _ in 0..3 {
            rx.changed().await.unwrap();
        }
        assert_eq!(*rx.borrow_and_update(), 174.6);
        assert_eq!(handle.current(), 174.6);
        assert_eq!(start.elapsed(), Duration::from_secs(15));

        handle.shutdown().await;
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_cycle_wraps() {
        let config = TickerConfig {
            prices: vec![1.0, 2.0],
            interval_ms: 100,
        };
        let handle = PriceTicker::spawn(&config).unwrap();
        let mut rx = handle.subscribe();

        let mut seen = Vec::new();
        for _ in 0..3 {
            rx.changed().await.unwrap();
            seen.push(*rx.borrow_and_update());
        }
        assert_eq!(seen, vec![2.0, 1.0, 2.0]);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        let handle = PriceTicker::spawn(&TickerConfig::default()).unwrap();
        let mut rx = handle.subscribe();
        drop(handle);

        assert!(rx.changed().await.is_err());
        assert_eq!(*rx.borrow(), 175.3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_updates() {
        let handle = PriceTicker::spawn(&TickerConfig::default()).unwrap();
        handle.cancel();
        assert!(handle.is_cancelled());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(handle.current(), 175.3);
    }

    #[test]
    fn test_spawn_requires_runtime() {
        let err = PriceTicker::spawn(&TickerConfig::default()).unwrap_err();
        assert!(matches!(err, ChainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_empty_prices_rejected() {
        let config = TickerConfig {
            prices: Vec::new(),
            ..Default::default()
        };
        assert!(PriceTicker::spawn(&config).is_err());
    }
}
