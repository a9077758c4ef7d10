use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::trace;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Elapsed,
    Cancelled,
}

/// A cancellable timer that counts down whole seconds before a redirect.
pub struct Countdown;

impl Countdown {
    /// Starts counting down from `seconds` on the current runtime.
    ///
    /// Dropping the returned handle cancels the countdown.
    pub fn start(seconds: u64) -> CountdownHandle {
        let (remaining_tx, remaining_rx) = watch::channel(seconds);
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut left = seconds;
            let mut ticks = tokio::time::interval(TICK);
            // the first tick completes immediately
            ticks.tick().await;

            while left > 0 {
                tokio::select! {
                    _ = &mut cancel_rx => {
                        trace!(left, "countdown cancelled");
                        return CountdownOutcome::Cancelled;
                    }
                    _ = ticks.tick() => {
                        left -= 1;
                        let _ = remaining_tx.send(left);
                    }
                }
            }

            trace!("countdown elapsed");
            CountdownOutcome::Elapsed
        });

        CountdownHandle {
            remaining: remaining_rx,
            cancel: Some(cancel_tx),
            task: Some(task),
            outcome: None,
        }
    }
}

pub struct CountdownHandle {
    remaining: watch::Receiver<u64>,
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<CountdownOutcome>>,
    outcome: Option<CountdownOutcome>,
}

impl CountdownHandle {
    /// Seconds left, updated once per tick.
    pub fn remaining(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }

    /// Stops the countdown. Has no effect once it has finished.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Waits for the countdown to elapse or be cancelled.
    ///
    /// Safe to call again after it returned, and safe to drop while pending.
    pub async fn finished(&mut self) -> CountdownOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }

        let outcome = match self.task.as_mut() {
            Some(task) => task.await.unwrap_or(CountdownOutcome::Cancelled),
            None => CountdownOutcome::Cancelled,
        };
        self.task = None;
        self.outcome = Some(outcome);
        outcome
    }
}
