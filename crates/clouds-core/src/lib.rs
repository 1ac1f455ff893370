pub mod config;
pub mod geometry;
pub mod id;
pub mod scheduler;

pub use config::{ConfigError, EntityConfig, PaintConfig, SurfaceConfig};
pub use geometry::{Offset, Point, Rect};
pub use id::EntityId;
pub use scheduler::{RedrawBatch, RenderScheduler};
