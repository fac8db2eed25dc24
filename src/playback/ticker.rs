// SPDX-License-Identifier: MPL-2.0
//! Cancellable handle for the periodic progress ticker.
//!
//! The timer itself is driven by the application's subscription; the handle
//! decides whether a delivered tick still belongs to a live chain. Ticks
//! carrying the id of a cancelled chain are ignored, so a tick that was
//! already queued when a backend was released never reaches it.

use std::time::Duration;

/// Identity of one tick chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerId(u64);

/// A running tick chain. Dropping the handle cancels the chain.
#[derive(Debug, PartialEq, Eq)]
pub struct TickerHandle {
    id: TickerId,
    interval: Duration,
}

impl TickerHandle {
    pub fn id(&self) -> TickerId {
        self.id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a tick delivered with `id` belongs to this chain.
    pub fn accepts(&self, id: TickerId) -> bool {
        self.id == id
    }

    /// Ends the chain.
    pub fn cancel(self) {
        tracing::trace!(id = self.id.0, "progress ticker cancelled");
    }
}

/// Issues ticker handles with unique ids.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next_id: u64,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts a new chain.
    pub fn start(&mut self) -> TickerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        tracing::trace!(id = self.next_id, interval = ?self.interval, "progress ticker started");
        TickerHandle {
            id: TickerId(self.next_id),
            interval: self.interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_get_distinct_ids() {
        let mut ticker = Ticker::new(Duration::from_millis(500));
        let first = ticker.start();
        let second = ticker.start();
        assert_ne!(first.id(), second.id());
        assert!(!second.accepts(first.id()));
        assert!(second.accepts(second.id()));
    }

    #[test]
    fn handle_carries_interval() {
        let mut ticker = Ticker::new(Duration::from_millis(250));
        assert_eq!(ticker.start().interval(), Duration::from_millis(250));
    }
}
