use std::time::Duration;

use tracing::trace;

/// One-shot work the chart defers onto the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartAction {
    /// Stops animating the first appearance of the plot.
    DisableInitialAnimation,
}

/// Delay before the initial appearance animation is switched off.
pub const INITIAL_ANIMATION_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<A> {
    due: Duration,
    action: A,
}

/// Single-threaded one-shot callbacks driven by explicit time advances.
///
/// Actions fire once, in due order (schedule order for equal due times),
/// from the `advance` call that reaches their due time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredCallbacks<A> {
    elapsed: Duration,
    pending: Vec<Pending<A>>,
}

impl<A> Default for DeferredCallbacks<A> {
    fn default() -> Self {
        Self {
            elapsed: Duration::ZERO,
            pending: Vec::new(),
        }
    }
}

impl<A> DeferredCallbacks<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, after: Duration, action: A) {
        let due = self.elapsed + after;
        let at = self.pending.partition_point(|pending| pending.due <= due);
        self.pending.insert(at, Pending { due, action });
    }

    /// Moves the clock forward and returns every action that came due.
    pub fn advance(&mut self, delta: Duration) -> Vec<A> {
        self.elapsed += delta;
        let ready = self
            .pending
            .partition_point(|pending| pending.due <= self.elapsed);
        trace!(elapsed = ?self.elapsed, ready, "advance deferred callbacks");
        self.pending
            .drain(..ready)
            .map(|pending| pending.action)
            .collect()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
