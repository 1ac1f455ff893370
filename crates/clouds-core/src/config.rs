//! Surface configuration: which entities exist, where they start, and how
//! the host paints them.
//!
//! Accepted as camelCase JSON from the host page:
//!
//! ```json
//! {
//!   "background": "/web/moving-clouds.png",
//!   "entities": [
//!     { "id": "cloud_a", "initialPosition": { "x": 50, "y": 50 }, "imageRef": "/web/cloud.png" },
//!     { "id": "label", "initialPosition": { "x": 300, "y": 200 } }
//!   ]
//! }
//! ```
//!
//! `imageRef` is opaque to the drag model; only the painter looks at it.

use crate::geometry::Point;
use crate::id::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub const DEFAULT_BACKGROUND: &str = "/web/moving-clouds.png";
pub const DEFAULT_CLOUD_IMAGE: &str = "/web/cloud.png";

/// Errors raised while loading a [`SurfaceConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two configured entities share an id; ids must be unique among live entities.
    #[error("duplicate entity id `{0}`")]
    DuplicateId(EntityId),
}

// ─── Entities ─────────────────────────────────────────────────────────────

/// Initial configuration of one draggable entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    pub id: EntityId,
    pub initial_position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

/// Id for the entity at `index` when the config omits one.
fn anonymous_id(index: usize) -> EntityId {
    EntityId::intern(&format!("cloud_{index}"))
}

impl EntityConfig {
    pub fn new(id: &str, x: i32, y: i32) -> Self {
        Self {
            id: EntityId::intern(id),
            initial_position: Point::new(x, y),
            image_ref: None,
        }
    }

    pub fn with_image(mut self, image_ref: &str) -> Self {
        self.image_ref = Some(image_ref.to_string());
        self
    }
}

// ─── Paint ────────────────────────────────────────────────────────────────

/// Sizes and text the painter uses when turning an entity into an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaintConfig {
    /// Image entities are painted as a square of this many pixels.
    pub image_size: i32,
    /// Text shown by entities without an `imageRef`.
    pub placeholder_label: String,
    pub placeholder_width: i32,
    pub placeholder_height: i32,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            image_size: 100,
            placeholder_label: "Drag Me".to_string(),
            placeholder_width: 80,
            placeholder_height: 24,
        }
    }
}

// ─── Surface ──────────────────────────────────────────────────────────────

/// Everything the host needs to build a draggable surface.
///
/// Entities without an `id` are named `cloud_<index>` after their place in
/// the list, so reloading the same JSON yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSurfaceConfig")]
pub struct SurfaceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub entities: Vec<EntityConfig>,
    pub paint: PaintConfig,
}

/// Wire form of [`SurfaceConfig`] before anonymous ids are assigned.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSurfaceConfig {
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    entities: Vec<RawEntityConfig>,
    #[serde(default)]
    paint: PaintConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntityConfig {
    #[serde(default)]
    id: Option<EntityId>,
    initial_position: Point,
    #[serde(default)]
    image_ref: Option<String>,
}

impl From<RawSurfaceConfig> for SurfaceConfig {
    fn from(raw: RawSurfaceConfig) -> Self {
        let entities = raw
            .entities
            .into_iter()
            .enumerate()
            .map(|(index, entity)| EntityConfig {
                id: entity.id.unwrap_or_else(|| anonymous_id(index)),
                initial_position: entity.initial_position,
                image_ref: entity.image_ref,
            })
            .collect();
        Self {
            background: raw.background,
            entities,
            paint: raw.paint,
        }
    }
}

impl Default for SurfaceConfig {
    /// Four clouds in a row over the sky background.
    fn default() -> Self {
        let entities = [("cloud_a", 50), ("cloud_b", 100), ("cloud_c", 150), ("cloud_d", 200)]
            .into_iter()
            .map(|(id, x)| EntityConfig::new(id, x, 50).with_image(DEFAULT_CLOUD_IMAGE))
            .collect();
        Self {
            background: Some(DEFAULT_BACKGROUND.to_string()),
            entities,
            paint: PaintConfig::default(),
        }
    }
}

impl SurfaceConfig {
    /// Parse and validate a JSON surface description.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!(
            "loaded surface config: {} entities, background {:?}",
            config.entities.len(),
            config.background
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject configurations whose entity ids collide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(self.entities.len());
        for entity in &self.entities {
            if !seen.insert(entity.id) {
                return Err(ConfigError::DuplicateId(entity.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_matches_original_layout() {
        let config = SurfaceConfig::default();
        let xs: Vec<i32> = config.entities.iter().map(|e| e.initial_position.x).collect();
        assert_eq!(xs, vec![50, 100, 150, 200]);
        assert!(config.entities.iter().all(|e| e.initial_position.y == 50));
        assert!(
            config
                .entities
                .iter()
                .all(|e| e.image_ref.as_deref() == Some(DEFAULT_CLOUD_IMAGE))
        );
        assert_eq!(config.background.as_deref(), Some(DEFAULT_BACKGROUND));
    }

    #[test]
    fn parses_camel_case_json() {
        let json = r#"{
            "entities": [
                { "id": "a", "initialPosition": { "x": 50, "y": 50 }, "imageRef": "/web/cloud.png" },
                { "id": "b", "initialPosition": { "x": 100, "y": 50 } }
            ]
        }"#;
        let config = SurfaceConfig::from_json(json).unwrap();
        assert_eq!(
            config.entities,
            vec![
                EntityConfig::new("a", 50, 50).with_image("/web/cloud.png"),
                EntityConfig::new("b", 100, 50),
            ]
        );
        assert_eq!(config.background, None);
        assert_eq!(config.paint, PaintConfig::default());
    }

    #[test]
    fn missing_ids_follow_list_position() {
        let json = r#"{ "entities": [
            { "initialPosition": { "x": 1, "y": 2 } },
            { "id": "named", "initialPosition": { "x": 3, "y": 4 } },
            { "initialPosition": { "x": 5, "y": 6 } }
        ] }"#;
        let first = SurfaceConfig::from_json(json).unwrap();
        let ids: Vec<&str> = first.entities.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["cloud_0", "named", "cloud_2"]);

        let reloaded = SurfaceConfig::from_json(json).unwrap();
        assert_eq!(reloaded, first);
    }

    #[test]
    fn generated_id_can_collide_with_explicit_one() {
        let json = r#"{ "entities": [
            { "initialPosition": { "x": 0, "y": 0 } },
            { "id": "cloud_0", "initialPosition": { "x": 9, "y": 9 } }
        ] }"#;
        assert!(matches!(
            SurfaceConfig::from_json(json),
            Err(ConfigError::DuplicateId(id)) if id.as_str() == "cloud_0"
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{ "entities": [
            { "id": "dup", "initialPosition": { "x": 0, "y": 0 } },
            { "id": "dup", "initialPosition": { "x": 5, "y": 5 } }
        ] }"#;
        match SurfaceConfig::from_json(json) {
            Err(ConfigError::DuplicateId(id)) => assert_eq!(id.as_str(), "dup"),
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            SurfaceConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn partial_paint_config_keeps_defaults() {
        let json = r#"{ "paint": { "placeholderLabel": "Move" } }"#;
        let config = SurfaceConfig::from_json(json).unwrap();
        assert_eq!(config.paint.placeholder_label, "Move");
        assert_eq!(config.paint.image_size, 100);
    }

    #[test]
    fn json_roundtrip_keeps_defaults() {
        let config = SurfaceConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(SurfaceConfig::from_json(&json).unwrap(), config);
    }
}
