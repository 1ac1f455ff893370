//! Pointer message types.
//!
//! Host listeners never touch controller state directly. They translate raw
//! pointer events into a `PointerMessage` and hand it to the owning
//! controller, so every state change goes through one method.

use clouds_core::Point;

/// A pointer event delivered globally while a gesture is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMessage {
    /// Pointer moved (mouse move, pen move).
    Sample { x: i32, y: i32 },

    /// Pointer released. Ends the gesture.
    Released,
}

impl PointerMessage {
    /// Create a move sample from client coordinates.
    pub fn sample(x: i32, y: i32) -> Self {
        Self::Sample { x, y }
    }

    /// Browsers report fractional client coordinates for some pointer types;
    /// the drag model works in whole pixels.
    pub fn sample_f64(x: f64, y: f64) -> Self {
        Self::Sample {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }

    /// Extract the position if this is a move sample.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Sample { x, y } => Some(Point::new(*x, *y)),
            Self::Released => None,
        }
    }
}
