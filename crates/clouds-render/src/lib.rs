//! Rendering capability for draggable entities.
//!
//! The drag core never paints. It hands positions to whatever implements
//! [`paint::Paint`], and hosts that route pointer-down themselves use
//! [`hit::hit_test`] against the same paint list.

pub mod hit;
pub mod paint;

pub use hit::hit_test;
pub use paint::{Content, ElementPaint, Paint};
