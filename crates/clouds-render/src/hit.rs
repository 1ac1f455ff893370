//! Hit testing: point → entity lookup.
//!
//! Walks painted elements back-to-front so the last painted (topmost)
//! element wins, the same order the browser uses for overlapping
//! absolutely-positioned buttons.

use crate::paint::ElementPaint;
use clouds_core::{EntityId, Point};

/// Find the topmost element at `point`.
/// Returns `None` if the point hits the background.
pub fn hit_test(paints: &[ElementPaint], point: Point) -> Option<EntityId> {
    paints
        .iter()
        .rev()
        .find(|paint| paint.bounds().contains(point))
        .map(|paint| paint.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Paint;
    use clouds_core::{EntityConfig, PaintConfig};

    fn painted(entities: &[EntityConfig]) -> Vec<ElementPaint> {
        let config = PaintConfig::default();
        entities
            .iter()
            .map(|e| e.paint_at(e.initial_position, &config))
            .collect()
    }

    #[test]
    fn hit_inside_single_element() {
        let paints = painted(&[EntityConfig::new("hit_a", 50, 50).with_image("c.png")]);
        assert_eq!(
            hit_test(&paints, Point::new(120, 80)),
            Some(EntityId::intern("hit_a"))
        );
    }

    #[test]
    fn miss_returns_none() {
        let paints = painted(&[EntityConfig::new("hit_miss", 50, 50).with_image("c.png")]);
        assert_eq!(hit_test(&paints, Point::new(10, 10)), None);
        assert_eq!(hit_test(&[], Point::new(10, 10)), None);
    }

    #[test]
    fn overlapping_elements_pick_topmost() {
        // Default clouds overlap: (50,50) and (100,50) share x in 100..150.
        let paints = painted(&[
            EntityConfig::new("hit_under", 50, 50).with_image("c.png"),
            EntityConfig::new("hit_over", 100, 50).with_image("c.png"),
        ]);
        assert_eq!(
            hit_test(&paints, Point::new(120, 80)),
            Some(EntityId::intern("hit_over"))
        );
        assert_eq!(
            hit_test(&paints, Point::new(60, 80)),
            Some(EntityId::intern("hit_under"))
        );
    }
}
