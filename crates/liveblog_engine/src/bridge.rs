use std::time::Duration;

use feed_logging::feed_trace;

use crate::Debouncer;

/// Payload the embedding page posts when the reader nears the end.
pub const LOAD_MORE_SIGNAL: &str = "loadMore";

/// Default quiet period before a burst of signals becomes one page fetch.
pub const LOAD_MORE_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Turns cross-frame messages into debounced "load more" requests.
#[derive(Debug, Clone)]
pub struct LoadMoreBridge {
    debouncer: Debouncer,
}

impl LoadMoreBridge {
    pub fn new<F>(delay: Duration, on_load_more: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self {
            debouncer: Debouncer::spawn(delay, on_load_more),
        }
    }

    /// Returns whether the payload was the load-more signal.
    pub fn receive(&self, payload: &str) -> bool {
        if payload == LOAD_MORE_SIGNAL {
            self.debouncer.signal();
            true
        } else {
            feed_trace!("Ignoring cross-frame message {:?}", payload);
            false
        }
    }
}
