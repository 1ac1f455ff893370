//! Entity → element paint descriptors.
//!
//! The drag model only knows positions. Anything that can be drawn at a
//! position implements [`Paint`]; the host (DOM, canvas, test harness) turns
//! the resulting [`ElementPaint`] into pixels.

use clouds_core::{EntityConfig, EntityId, PaintConfig, Point, Rect};

/// What an element shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A square image, e.g. a cloud.
    Image { url: String, width: i32, height: i32 },
    /// Text placeholder for entities without an image.
    Label { text: String, width: i32, height: i32 },
}

impl Content {
    pub fn size(&self) -> (i32, i32) {
        match self {
            Self::Image { width, height, .. } | Self::Label { width, height, .. } => {
                (*width, *height)
            }
        }
    }

    /// Image if `image_ref` is present, placeholder label otherwise.
    pub fn for_image_ref(image_ref: Option<&str>, config: &PaintConfig) -> Self {
        match image_ref {
            Some(url) => Self::Image {
                url: url.to_string(),
                width: config.image_size,
                height: config.image_size,
            },
            None => Self::Label {
                text: config.placeholder_label.clone(),
                width: config.placeholder_width,
                height: config.placeholder_height,
            },
        }
    }
}

/// One element placed at an absolute pixel offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementPaint {
    pub id: EntityId,
    pub left: i32,
    pub top: i32,
    pub content: Content,
}

impl ElementPaint {
    /// The painted box, used for hit testing.
    pub fn bounds(&self) -> Rect {
        let (width, height) = self.content.size();
        Rect::new(Point::new(self.left, self.top), width, height)
    }

    /// CSS `left`/`top` values, e.g. `("130px", "120px")`.
    pub fn css_offset(&self) -> (String, String) {
        (format!("{}px", self.left), format!("{}px", self.top))
    }
}

/// Can be rendered given a position.
pub trait Paint {
    fn id(&self) -> EntityId;

    fn content(&self, config: &PaintConfig) -> Content;

    fn paint_at(&self, position: Point, config: &PaintConfig) -> ElementPaint {
        let paint = ElementPaint {
            id: self.id(),
            left: position.x,
            top: position.y,
            content: self.content(config),
        };
        log::trace!("PAINT {} at ({}, {})", paint.id, paint.left, paint.top);
        paint
    }
}

impl Paint for EntityConfig {
    fn id(&self) -> EntityId {
        self.id
    }

    fn content(&self, config: &PaintConfig) -> Content {
        Content::for_image_ref(self.image_ref.as_deref(), config)
    }
}
