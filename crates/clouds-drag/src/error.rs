//! Drag precondition violations.
//!
//! Only ordering bugs in the host's event delivery end up here. Stray moves
//! after release and repeated `end_drag`/`detach` calls are no-ops, not errors.

use clouds_core::EntityId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DragError {
    /// `begin_drag` on a controller that is already dragging.
    #[error("entity `{0}` is already dragging")]
    AlreadyDragging(EntityId),

    /// `attach` on a bridge that still holds live handlers.
    #[error("pointer bridge for `{0}` is already attached")]
    AlreadyAttached(EntityId),

    /// The host could not register pointer listeners.
    #[error("failed to subscribe `{entity}` to pointer events: {reason}")]
    Subscribe { entity: EntityId, reason: String },

    #[error("no entity `{0}` on this surface")]
    UnknownEntity(EntityId),

    #[error("entity `{0}` already exists on this surface")]
    DuplicateEntity(EntityId),
}
