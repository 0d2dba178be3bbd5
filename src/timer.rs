use crate::entry::suggested_minutes;
use std::time::Duration;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Recomputes the suggested duration of an open block on a fixed period.
///
/// The ticker lives exactly as long as the block is shown as active: it is
/// cancelled on [`ElapsedTicker::stop`] or when dropped.
pub struct ElapsedTicker {
    block_id: String,
    minutes: watch::Receiver<u32>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ElapsedTicker {
    pub fn start(block_id: impl Into<String>, period: Duration) -> Self {
        let block_id = block_id.into();
        let started_at = Instant::now();
        let (tx, rx) = watch::channel(suggested_minutes(Duration::ZERO));
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task_block_id = block_id.clone();

        let handle = tokio::spawn(async move {
            let mut ticks = time::interval_at(started_at + period, period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => {
                        let minutes = suggested_minutes(started_at.elapsed());
                        if tx.send(minutes).is_err() {
                            break;
                        }
                    }
                }
            }
            debug!(block_id = %task_block_id, "elapsed ticker stopped");
        });

        debug!(block_id = %block_id, period_secs = period.as_secs(), "elapsed ticker started");
        Self {
            block_id,
            minutes: rx,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn minutes(&self) -> u32 {
        *self.minutes.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.minutes.clone()
    }

    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Holds the ticker for the block started from this client, if any.
pub struct ActiveBlockTracker {
    period: Duration,
    current: Option<ElapsedTicker>,
}

impl ActiveBlockTracker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            current: None,
        }
    }

    pub async fn start(&mut self, block_id: &str) {
        if let Some(previous) = self.current.take() {
            previous.stop().await;
        }
        self.current = Some(ElapsedTicker::start(block_id, self.period));
    }

    pub async fn stop(&mut self, block_id: &str) {
        if self.current.as_ref().is_some_and(|ticker| ticker.block_id() == block_id) {
            if let Some(ticker) = self.current.take() {
                ticker.stop().await;
            }
        }
    }

    /// Reconciles with the block the day rollup reports as active and returns
    /// the suggested minutes when this client is timing it.
    pub async fn sync(&mut self, active_block_id: Option<&str>) -> Option<u32> {
        let still_active = match (self.current_block(), active_block_id) {
            (None, _) => return None,
            (Some(timing), Some(active)) => timing == active,
            (Some(_), None) => false,
        };
        if still_active {
            return self.current.as_ref().map(ElapsedTicker::minutes);
        }
        if let Some(stale) = self.current.take() {
            debug!(block_id = %stale.block_id(), "block no longer active");
            stale.stop().await;
        }
        None
    }

    pub fn current_block(&self) -> Option<&str> {
        self.current.as_ref().map(ElapsedTicker::block_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_elapsed_minutes() {
        let ticker = ElapsedTicker::start("b1", MINUTE);
        let mut rx = ticker.subscribe();
        assert_eq!(*rx.borrow(), 1);

        for _ in 0..5 {
            rx.changed().await.unwrap();
        }
        assert_eq!(ticker.minutes(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_ticker_closes_its_channel() {
        let ticker = ElapsedTicker::start("b1", MINUTE);
        let mut rx = ticker.subscribe();
        ticker.stop().await;
        assert!(rx.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn tracker_drops_ticker_when_block_no_longer_active() {
        let mut tracker = ActiveBlockTracker::new(MINUTE);
        tracker.start("b1").await;
        assert_eq!(tracker.sync(Some("b1")).await, Some(1));

        assert_eq!(tracker.sync(Some("other")).await, None);
        assert_eq!(tracker.current_block(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn tracker_stop_only_matches_its_block() {
        let mut tracker = ActiveBlockTracker::new(MINUTE);
        tracker.start("b1").await;
        tracker.stop("b2").await;
        assert_eq!(tracker.current_block(), Some("b1"));
        tracker.stop("b1").await;
        assert_eq!(tracker.sync(None).await, None);
        assert_eq!(tracker.current_block(), None);
    }
}
