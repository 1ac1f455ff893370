//! Mount bookkeeping: the outstanding animation frame, and whether teardown
//! already ran.
//!
//! Teardown is reachable from `CloudsApp::unmount`, from JS `free()` (via
//! `Drop`) and from a failed mount. Only the first call does any work, and it
//! hands back the frame handle that still has to be cancelled.

use std::cell::Cell;

#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    pending_frame: Cell<Option<i32>>,
    torn_down: Cell<bool>,
}

impl Lifecycle {
    pub fn is_live(&self) -> bool {
        !self.torn_down.get()
    }

    pub fn frame_requested(&self, handle: i32) {
        self.pending_frame.set(Some(handle));
    }

    pub fn frame_fired(&self) {
        self.pending_frame.set(None);
    }

    /// Mark the mount as torn down. `false` if that already happened.
    pub fn begin_teardown(&self) -> bool {
        !self.torn_down.replace(true)
    }

    /// The requested frame that has not fired yet, if any.
    pub fn take_pending_frame(&self) -> Option<i32> {
        self.pending_frame.take()
    }
}
