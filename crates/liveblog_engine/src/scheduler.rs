use std::time::Duration;

use feed_logging::{feed_info, feed_trace};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// The feed status poll runs this many times slower than the content poll.
pub const STATUS_POLL_FACTOR: u32 = 3;

/// Two periodic polls sharing one cancellation token.
///
/// Ticks only invoke the callbacks; callbacks that start network work spawn
/// it, so a slow fetch never delays the next tick and stopping never aborts
/// a fetch already under way.
#[derive(Debug)]
pub struct PollScheduler {
    cancel: CancellationToken,
}

impl PollScheduler {
    /// Must be called from within a tokio runtime.
    pub fn start<C, S>(every: Duration, on_content: C, on_status: S) -> Self
    where
        C: FnMut() + Send + 'static,
        S: FnMut() + Send + 'static,
    {
        let cancel = CancellationToken::new();
        spawn_periodic("content", every, cancel.clone(), on_content);
        spawn_periodic(
            "status",
            every * STATUS_POLL_FACTOR,
            cancel.clone(),
            on_status,
        );
        feed_info!("Polling started, content every {:?}", every);
        Self { cancel }
    }

    /// Stops both polls. Calling it again does nothing.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            feed_info!("Polling stopped");
            self.cancel.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn spawn_periodic<F>(name: &'static str, period: Duration, cancel: CancellationToken, mut on_tick: F)
where
    F: FnMut() + Send + 'static,
{
    tokio::spawn(async move {
        // First tick one full period after start.
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tick: u64 = 0;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    tick += 1;
                    feed_trace!("{} poll tick {}", name, tick);
                    on_tick();
                }
            }
        }
    });
}
