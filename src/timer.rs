//! Periodic stopwatch ticks.
//!
//! A [`TickTask`] owns a spawned interval loop. Dropping it aborts the loop,
//! so whoever holds the task decides exactly when ticks stop.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// A refresh signal for the attempt that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub attempt: Uuid,
}

pub type TickSender = mpsc::UnboundedSender<Tick>;
pub type TickReceiver = mpsc::UnboundedReceiver<Tick>;

pub fn tick_channel() -> (TickSender, TickReceiver) {
    mpsc::unbounded_channel()
}

pub struct TickTask {
    attempt: Uuid,
    handle: JoinHandle<()>,
}

impl TickTask {
    /// Starts sending a [`Tick`] for `attempt` every `period`.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn spawn(attempt: Uuid, period: Duration, tx: TickSender) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(Tick { attempt }).is_err() {
                    break;
                }
            }
        });

        tracing::debug!(%attempt, period_ms = period.as_millis() as u64, "stopwatch started");
        Self { attempt, handle }
    }
}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!(attempt = %self.attempt, "stopwatch stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut TickReceiver) -> Vec<Tick> {
        let mut ticks = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            ticks.push(tick);
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_stop_when_dropped() {
        let (tx, mut rx) = tick_channel();
        let first = Uuid::new_v4();

        let task = TickTask::spawn(first, Duration::from_millis(100), tx.clone());
        tokio::time::sleep(Duration::from_millis(350)).await;
        let ticks = drain(&mut rx);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| t.attempt == first));

        drop(task);
        let second = Uuid::new_v4();
        let _task = TickTask::spawn(second, Duration::from_millis(100), tx);
        tokio::time::sleep(Duration::from_millis(350)).await;

        let ticks = drain(&mut rx);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| t.attempt == second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_drop() {
        let (tx, mut rx) = tick_channel();
        let task = TickTask::spawn(Uuid::new_v4(), Duration::from_millis(100), tx);
        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(task);
        drain(&mut rx);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(drain(&mut rx).is_empty());
    }
}
