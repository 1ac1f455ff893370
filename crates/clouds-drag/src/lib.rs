//! Drag gesture engine: turns pointer events into entity positions.
//!
//! - [`controller::DragController`] — per-entity Idle/Dragging state machine
//! - [`bridge::PointerEventBridge`] — one subscription token per gesture
//! - [`surface::Surface`] — all controllers plus the shared channel and
//!   [`clouds_core::RenderScheduler`]

pub mod bridge;
pub mod controller;
pub mod entity;
pub mod error;
pub mod input;
pub mod surface;

pub use bridge::{
    LocalChannel, PointerChannel, PointerEventBridge, SubscriptionId, SubscriptionToken,
};
pub use controller::{DragController, GestureEnd, Transition};
pub use entity::{DraggableEntity, GestureState};
pub use error::DragError;
pub use input::PointerMessage;
pub use surface::Surface;
