//! Integration tests: config → surface → pointer gestures → redraws.
//!
//! Drives the full `clouds-drag` pipeline through a `LocalChannel`, the way
//! a browser host drives it through window listeners.

use clouds_core::{EntityId, Offset, Point, SurfaceConfig};
use clouds_drag::{DragError, GestureEnd, LocalChannel, PointerMessage, Surface, Transition};
use pretty_assertions::assert_eq;

fn mixed_surface() -> Surface<LocalChannel> {
    let config = SurfaceConfig::from_json(include_str!("fixtures/mixed.json")).unwrap();
    Surface::from_config(&config, LocalChannel::new()).unwrap()
}

fn id(name: &str) -> EntityId {
    EntityId::intern(name)
}

// ─── Single gesture ──────────────────────────────────────────────────────

#[test]
fn drag_cloud_a_end_to_end() {
    let mut s = mixed_surface();
    let a = id("A");

    s.pointer_down(a, Point::new(120, 80)).unwrap();
    let entity = s.entity(a).unwrap();
    assert!(entity.is_dragging());
    assert_eq!(entity.grab_offset(), Some(Offset::new(70, 30)));

    assert_eq!(
        s.dispatch(a, PointerMessage::sample(200, 150)).unwrap(),
        Transition::Moved(Point::new(130, 120))
    );
    assert_eq!(
        s.dispatch(a, PointerMessage::sample(205, 140)).unwrap(),
        Transition::Moved(Point::new(135, 110))
    );
    assert_eq!(
        s.dispatch(a, PointerMessage::Released).unwrap(),
        Transition::Ended(GestureEnd::Released)
    );

    let entity = s.entity(a).unwrap();
    assert_eq!(entity.position(), Point::new(135, 110));
    assert!(!entity.is_dragging());
    assert_eq!(entity.grab_offset(), None);
    assert_eq!(s.channel().live_count(), 0);
}

#[test]
fn every_sample_lands_at_pointer_minus_grab_offset() {
    let mut s = mixed_surface();
    let a = id("A");
    let down = Point::new(73, 91);
    s.pointer_down(a, down).unwrap();
    let grab = down - Point::new(50, 50);

    let samples = [(80, 95), (-20, 400), (73, 91), (1000, -5), (0, 0)];
    for (x, y) in samples {
        s.dispatch(a, PointerMessage::sample(x, y)).unwrap();
        assert_eq!(s.position(a), Some(Point::new(x, y) - grab));
    }
}

#[test]
fn late_events_after_release_are_ignored() {
    let mut s = mixed_surface();
    let a = id("A");
    s.pointer_down(a, Point::new(60, 60)).unwrap();
    s.dispatch(a, PointerMessage::sample(70, 70)).unwrap();
    s.dispatch(a, PointerMessage::Released).unwrap();
    s.flush();

    assert_eq!(
        s.dispatch(a, PointerMessage::sample(400, 400)).unwrap(),
        Transition::Ignored
    );
    assert_eq!(
        s.dispatch(a, PointerMessage::Released).unwrap(),
        Transition::Ignored
    );
    assert_eq!(s.position(a), Some(Point::new(60, 60)));
    assert!(s.flush().is_empty());
}

#[test]
fn pointer_down_while_dragging_is_an_error() {
    let mut s = mixed_surface();
    let a = id("A");
    s.pointer_down(a, Point::new(60, 60)).unwrap();
    assert_eq!(
        s.pointer_down(a, Point::new(90, 90)),
        Err(DragError::AlreadyDragging(a))
    );
    assert_eq!(s.entity(a).unwrap().grab_offset(), Some(Offset::new(10, 10)));
    assert_eq!(s.channel().live_count(), 1);
}

// ─── Independent entities ────────────────────────────────────────────────

#[test]
fn moving_a_never_moves_b() {
    let mut s = mixed_surface();
    let (a, b) = (id("A"), id("B"));

    s.pointer_down(a, Point::new(60, 60)).unwrap();
    s.pointer_down(b, Point::new(110, 60)).unwrap();
    assert_eq!(s.channel().live_count(), 2);

    for step in 0..5 {
        s.dispatch(a, PointerMessage::sample(60 + step * 10, 60 + step))
            .unwrap();
    }
    assert_eq!(s.position(a), Some(Point::new(90, 54)));
    assert_eq!(s.position(b), Some(Point::new(100, 50)));

    s.dispatch(a, PointerMessage::Released).unwrap();
    assert!(s.entity(b).unwrap().is_dragging());
    assert!(s.channel().is_subscribed(b));
    assert!(!s.channel().is_subscribed(a));
}

// ─── Redraw coalescing ───────────────────────────────────────────────────

#[test]
fn burst_of_moves_requests_one_tick() {
    let mut s = mixed_surface();
    let (a, b) = (id("A"), id("B"));
    s.pointer_down(a, Point::new(60, 60)).unwrap();
    s.pointer_down(b, Point::new(110, 60)).unwrap();

    let mut ticks_requested = 0;
    for i in 0..20 {
        s.dispatch(a, PointerMessage::sample(60 + i, 60)).unwrap();
        s.dispatch(b, PointerMessage::sample(110, 60 + i)).unwrap();
        if s.take_tick_request() {
            ticks_requested += 1;
        }
    }
    assert_eq!(ticks_requested, 1);

    let mut batch = s.flush().into_vec();
    batch.sort_by_key(|id| id.as_str().to_string());
    assert_eq!(batch, vec![a, b]);
}

#[test]
fn each_tick_flushes_only_new_changes() {
    let mut s = mixed_surface();
    let a = id("A");
    s.pointer_down(a, Point::new(60, 60)).unwrap();

    s.dispatch(a, PointerMessage::sample(61, 60)).unwrap();
    assert_eq!(s.flush().as_slice(), &[a]);
    assert!(s.flush().is_empty());

    s.dispatch(a, PointerMessage::sample(62, 60)).unwrap();
    assert!(s.take_tick_request());
    let paints = s.flush_paints();
    assert_eq!(paints.len(), 1);
    assert_eq!((paints[0].left, paints[0].top), (52, 50));
}

// ─── Teardown ────────────────────────────────────────────────────────────

#[test]
fn removing_entities_mid_gesture_leaks_nothing() {
    let mut s = mixed_surface();
    let (a, b) = (id("A"), id("B"));
    s.pointer_down(a, Point::new(60, 60)).unwrap();
    s.pointer_down(b, Point::new(110, 60)).unwrap();

    s.remove_entity(a).unwrap();
    assert_eq!(s.channel().live_count(), 1);
    s.remove_entity(b).unwrap();
    assert_eq!(s.channel().live_count(), 0);
    assert_eq!(s.channel().totals(), (2, 2));
    assert_eq!(s.len(), 1);
}

#[test]
fn every_subscribe_is_matched_by_an_unsubscribe() {
    let mut s = mixed_surface();
    let a = id("A");
    for round in 0..10 {
        s.pointer_down(a, Point::new(60 + round, 60)).unwrap();
        s.dispatch(a, PointerMessage::sample(70 + round, 70)).unwrap();
        if round % 2 == 0 {
            s.dispatch(a, PointerMessage::Released).unwrap();
        } else {
            s.cancel_drag(a).unwrap();
        }
    }
    assert_eq!(s.channel().totals(), (10, 10));
    assert_eq!(s.channel().live_count(), 0);
}

#[test]
fn placeholder_entity_drags_like_any_other() {
    let mut s = mixed_surface();
    let note = id("note");
    let picked = s.pointer_down_at(Point::new(310, 305)).unwrap();
    assert_eq!(picked, Some(note));

    s.broadcast(PointerMessage::sample(410, 405));
    s.broadcast(PointerMessage::Released);
    assert_eq!(s.position(note), Some(Point::new(400, 400)));
}

#[test]
fn entity_at_the_left_limit_drags_without_overflow() {
    let json = r#"{ "entities": [
        { "id": "far", "initialPosition": { "x": -2147483648, "y": 0 } }
    ] }"#;
    let config = SurfaceConfig::from_json(json).unwrap();
    let mut s = Surface::from_config(&config, LocalChannel::new()).unwrap();
    let far = id("far");

    s.pointer_down(far, Point::new(10, 0)).unwrap();
    assert_eq!(
        s.dispatch(far, PointerMessage::sample(20, 0)).unwrap(),
        Transition::Moved(Point::new(i32::MIN + 10, 0))
    );
    s.dispatch(far, PointerMessage::Released).unwrap();
    assert_eq!(s.position(far), Some(Point::new(i32::MIN + 10, 0)));
}
