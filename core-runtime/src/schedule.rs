//! Periodic job driver
//!
//! Runs one job at a fixed interval until cancelled. Ticks never overlap: a
//! tick that outlasts the interval simply delays the next one.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Run `tick` every `interval` until `cancel` fires
///
/// The first tick runs one full interval after the call, not immediately.
/// Cancellation is observed between ticks; a tick in progress runs to
/// completion.
pub async fn run_every<F, Fut>(interval: Duration, cancel: CancellationToken, mut tick: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick fires immediately; consume it.
    timer.tick().await;

    info!(interval_secs = interval.as_secs(), "Scheduler started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Scheduler stopped");
                return;
            }
            _ = timer.tick() => {
                debug!("Scheduler tick");
                tick().await;
            }
        }
    }
}
