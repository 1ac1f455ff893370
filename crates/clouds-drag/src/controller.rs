//! Per-entity drag controller.
//!
//! Owns one [`DraggableEntity`] and its [`PointerEventBridge`]. The channel
//! and scheduler are shared across controllers, so they are passed in per
//! call instead of being captured.
//!
//! | Call | Idle | Dragging |
//! |------|------|----------|
//! | `begin_drag` | → Dragging, attach | `AlreadyDragging` |
//! | `on_pointer_move` | ignored | reposition, notify scheduler |
//! | `end_drag` / `cancel_drag` | no-op | → Idle, detach |

use crate::bridge::{PointerChannel, PointerEventBridge};
use crate::entity::{DraggableEntity, GestureState};
use crate::error::DragError;
use crate::input::PointerMessage;
use clouds_core::{EntityConfig, EntityId, Offset, Point, RenderScheduler};

/// How a gesture ended. Position is kept either way; there is no revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEnd {
    Released,
    Cancelled,
}

/// Result of delivering one [`PointerMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stray event: the controller was idle.
    Ignored,
    Moved(Point),
    Ended(GestureEnd),
}

#[derive(Debug)]
pub struct DragController {
    entity: DraggableEntity,
    bridge: PointerEventBridge,
}

impl DragController {
    pub fn new(entity: DraggableEntity) -> Self {
        Self {
            entity,
            bridge: PointerEventBridge::new(),
        }
    }

    pub fn from_config(config: &EntityConfig) -> Self {
        Self::new(DraggableEntity::from_config(config))
    }

    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    pub fn entity(&self) -> &DraggableEntity {
        &self.entity
    }

    pub fn position(&self) -> Point {
        self.entity.position()
    }

    pub fn is_dragging(&self) -> bool {
        self.entity.is_dragging()
    }

    pub fn grab_offset(&self) -> Option<Offset> {
        self.entity.grab_offset()
    }

    pub fn bridge(&self) -> &PointerEventBridge {
        &self.bridge
    }

    /// Start a gesture at `pointer` and subscribe to the ambient stream.
    ///
    /// On error the controller is left exactly as it was.
    pub fn begin_drag<C: PointerChannel + ?Sized>(
        &mut self,
        pointer: Point,
        channel: &mut C,
    ) -> Result<(), DragError> {
        let id = self.id();
        if self.is_dragging() {
            log::warn!("begin_drag on {id} while already dragging");
            return Err(DragError::AlreadyDragging(id));
        }
        self.bridge.attach(id, channel)?;

        let grab_offset = pointer - self.entity.position();
        self.entity
            .set_gesture(GestureState::Dragging { grab_offset });
        log::debug!(
            "drag start {id} at ({}, {}), grab offset ({}, {})",
            pointer.x,
            pointer.y,
            grab_offset.dx,
            grab_offset.dy
        );
        Ok(())
    }

    /// Reposition to `pointer - grab_offset` and request a redraw.
    ///
    /// Returns the new position, or `None` when idle (late event after
    /// release).
    pub fn on_pointer_move(
        &mut self,
        pointer: Point,
        scheduler: &mut RenderScheduler,
    ) -> Option<Point> {
        let Some(grab_offset) = self.entity.grab_offset() else {
            log::trace!("stray move for idle {}", self.id());
            return None;
        };
        let position = pointer - grab_offset;
        self.entity.set_position(position);
        scheduler.notify_changed(self.id());
        log::trace!("move {} to ({}, {})", self.id(), position.x, position.y);
        Some(position)
    }

    /// End the gesture on pointer-up. No-op when idle.
    pub fn end_drag<C: PointerChannel + ?Sized>(&mut self, channel: &mut C) -> Option<GestureEnd> {
        self.finish(channel, GestureEnd::Released)
    }

    /// End the gesture from outside (entity removal, teardown). The position
    /// reached so far is kept.
    pub fn cancel_drag<C: PointerChannel + ?Sized>(
        &mut self,
        channel: &mut C,
    ) -> Option<GestureEnd> {
        self.finish(channel, GestureEnd::Cancelled)
    }

    /// Deliver one message from the ambient stream.
    pub fn handle<C: PointerChannel + ?Sized>(
        &mut self,
        message: PointerMessage,
        channel: &mut C,
        scheduler: &mut RenderScheduler,
    ) -> Transition {
        match message {
            PointerMessage::Sample { x, y } => self
                .on_pointer_move(Point::new(x, y), scheduler)
                .map_or(Transition::Ignored, Transition::Moved),
            PointerMessage::Released => self
                .end_drag(channel)
                .map_or(Transition::Ignored, Transition::Ended),
        }
    }

    fn finish<C: PointerChannel + ?Sized>(
        &mut self,
        channel: &mut C,
        how: GestureEnd,
    ) -> Option<GestureEnd> {
        // Detach even when idle: a bridge must never outlive its gesture.
        let detached = self.bridge.detach(channel);
        if !self.is_dragging() {
            if detached {
                log::warn!("{} was idle with a live subscription", self.id());
            }
            return None;
        }
        self.entity.set_gesture(GestureState::Idle);
        let position = self.position();
        log::debug!(
            "drag {how:?} {} at ({}, {})",
            self.id(),
            position.x,
            position.y
        );
        Some(how)
    }
}
