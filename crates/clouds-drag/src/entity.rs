//! The draggable entity record.
//!
//! ```text
//! Idle -> Dragging { grab_offset }    (pointer down on the entity)
//! Dragging -> Dragging                (pointer move, position updated)
//! Dragging -> Idle                    (pointer up or cancel)
//! ```
//!
//! The grab offset only exists inside `GestureState::Dragging`, so an idle
//! entity with a stale offset cannot be expressed. Position and gesture
//! fields are private; only [`crate::controller::DragController`] mutates them.

use clouds_core::{EntityConfig, EntityId, Offset, PaintConfig, Point};
use clouds_render::{Content, Paint};

/// Gesture state of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Between pointer-down and pointer-up.
    Dragging {
        /// `pointer - position` at pointer-down; constant for the gesture.
        grab_offset: Offset,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraggableEntity {
    id: EntityId,
    position: Point,
    image_ref: Option<String>,
    gesture: GestureState,
}

impl DraggableEntity {
    pub fn new(id: EntityId, position: Point) -> Self {
        Self {
            id,
            position,
            image_ref: None,
            gesture: GestureState::Idle,
        }
    }

    pub fn from_config(config: &EntityConfig) -> Self {
        Self {
            id: config.id,
            position: config.initial_position,
            image_ref: config.image_ref.clone(),
            gesture: GestureState::Idle,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Authoritative render offset.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, GestureState::Dragging { .. })
    }

    /// Defined iff dragging.
    pub fn grab_offset(&self) -> Option<Offset> {
        match self.gesture {
            GestureState::Dragging { grab_offset } => Some(grab_offset),
            GestureState::Idle => None,
        }
    }

    pub(crate) fn set_gesture(&mut self, gesture: GestureState) {
        self.gesture = gesture;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

impl Paint for DraggableEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn content(&self, config: &PaintConfig) -> Content {
        Content::for_image_ref(self.image_ref(), config)
    }
}
