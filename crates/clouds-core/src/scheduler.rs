//! Redraw coalescing.
//!
//! Pointer-move bursts can produce many position changes per frame. The
//! scheduler collapses them: every entity that changed since the last tick
//! appears exactly once in the next [`RenderScheduler::flush`], and the host
//! is asked for at most one tick no matter how many notifications arrive.
//!
//! Host loop:
//!
//! 1. Controllers call [`RenderScheduler::notify_changed`] on every move.
//! 2. After delivering an event, the host checks
//!    [`RenderScheduler::take_tick_request`]; `true` means "schedule a frame".
//! 3. When the frame fires, the host calls [`RenderScheduler::flush`] and
//!    repaints the returned ids.

use crate::id::EntityId;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Ids due for repaint in one tick. Usually a single dragged entity.
pub type RedrawBatch = SmallVec<[EntityId; 8]>;

#[derive(Debug, Default)]
pub struct RenderScheduler {
    /// Membership for O(1) dedup.
    pending: HashSet<EntityId>,
    /// Arrival order of `pending`, so flushes are deterministic.
    order: RedrawBatch,
    /// A tick has been requested and not yet flushed.
    tick_pending: bool,
    /// The tick request has not been handed to the host yet.
    tick_unclaimed: bool,
    ticks: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` needs a redraw.
    ///
    /// Returns `true` when this call scheduled a new tick, `false` when one
    /// was already pending.
    pub fn notify_changed(&mut self, id: EntityId) -> bool {
        if self.pending.insert(id) {
            self.order.push(id);
        }
        if self.tick_pending {
            return false;
        }
        self.tick_pending = true;
        self.tick_unclaimed = true;
        log::trace!("tick scheduled by {id}");
        true
    }

    /// Hand the pending tick request to the host, once.
    pub fn take_tick_request(&mut self) -> bool {
        std::mem::take(&mut self.tick_unclaimed)
    }

    /// Whether a redraw is waiting for the next flush.
    pub fn is_pending(&self) -> bool {
        self.tick_pending
    }

    /// Drop any pending redraw for `id` (the entity is gone).
    pub fn forget(&mut self, id: EntityId) {
        if self.pending.remove(&id) {
            self.order.retain(|pending| *pending != id);
        }
        if self.pending.is_empty() {
            self.tick_pending = false;
            self.tick_unclaimed = false;
        }
    }

    /// Take the deduplicated set of ids changed since the last flush and
    /// clear pending state. Called once per tick by the host.
    pub fn flush(&mut self) -> RedrawBatch {
        self.pending.clear();
        self.tick_pending = false;
        self.tick_unclaimed = false;
        let batch = std::mem::take(&mut self.order);
        if !batch.is_empty() {
            self.ticks += 1;
            log::trace!("tick {}: {} redraw(s)", self.ticks, batch.len());
        }
        batch
    }

    /// Number of non-empty flushes so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
