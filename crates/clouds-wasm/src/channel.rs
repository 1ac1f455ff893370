//! `window` pointer listeners as a [`PointerChannel`].
//!
//! Each subscription registers a `mousemove` and a `mouseup` listener on
//! `window`. Both forward a [`PointerMessage`] for one entity to the
//! [`PointerSink`]; neither touches drag state itself.
//!
//! The `mouseup` listener ends the gesture, which unsubscribes the closure
//! that is currently running. Listeners are removed from `window` right
//! away, but their closures are parked in `retired` and only dropped by
//! [`WindowChannel::reap`], which the host calls from the next frame.

use clouds_core::EntityId;
use clouds_drag::{DragError, PointerChannel, PointerMessage, SubscriptionId, SubscriptionToken};
use std::collections::HashMap;
use std::rc::Weak;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MouseEvent, Window};

const MOVE_EVENT: &str = "mousemove";
const UP_EVENT: &str = "mouseup";

type Listener = Closure<dyn FnMut(MouseEvent)>;

/// Receiver of pointer messages produced by window listeners.
pub trait PointerSink {
    fn deliver(&self, entity: EntityId, message: PointerMessage);
}

/// The move/up closure pair behind one subscription.
struct ListenerPair {
    entity: EntityId,
    on_move: Listener,
    on_up: Listener,
}

pub struct WindowChannel {
    window: Window,
    sink: Option<Weak<dyn PointerSink>>,
    live: HashMap<SubscriptionId, ListenerPair>,
    /// Removed from `window`, possibly still on the JS stack.
    retired: Vec<ListenerPair>,
    next_id: u64,
}

impl WindowChannel {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            sink: None,
            live: HashMap::new(),
            retired: Vec::new(),
            next_id: 0,
        }
    }

    /// Route listener output to `sink`. Must happen before the first
    /// subscription.
    pub fn bind(&mut self, sink: Weak<dyn PointerSink>) {
        self.sink = Some(sink);
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Drop closures retired by earlier unsubscribes. Never call this from
    /// inside a window listener.
    pub fn reap(&mut self) {
        if !self.retired.is_empty() {
            log::trace!("reaping {} retired listener pair(s)", self.retired.len());
            self.retired.clear();
        }
    }

    fn listener(
        &self,
        entity: EntityId,
        to_message: fn(&MouseEvent) -> PointerMessage,
    ) -> Listener {
        let sink = self.sink.clone();
        Closure::new(move |event: MouseEvent| {
            let Some(sink) = sink.as_ref().and_then(Weak::upgrade) else {
                log::debug!("pointer event for {entity} after surface was dropped");
                return;
            };
            sink.deliver(entity, to_message(&event));
        })
    }

    fn remove_listeners(&self, pair: &ListenerPair) {
        let listeners = [(MOVE_EVENT, &pair.on_move), (UP_EVENT, &pair.on_up)];
        for (event, listener) in listeners {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove {event} listener for {}: {e:?}", pair.entity);
            }
        }
    }
}

impl PointerChannel for WindowChannel {
    fn subscribe(&mut self, entity: EntityId) -> Result<SubscriptionToken, DragError> {
        if self.sink.is_none() {
            return Err(DragError::Subscribe {
                entity,
                reason: "window channel is not bound to a surface".to_string(),
            });
        }
        self.reap();

        let pair = ListenerPair {
            entity,
            on_move: self.listener(entity, |e| PointerMessage::sample(e.client_x(), e.client_y())),
            on_up: self.listener(entity, |_| PointerMessage::Released),
        };

        let added = self
            .window
            .add_event_listener_with_callback(MOVE_EVENT, pair.on_move.as_ref().unchecked_ref())
            .and_then(|()| {
                self.window
                    .add_event_listener_with_callback(UP_EVENT, pair.on_up.as_ref().unchecked_ref())
            });
        if let Err(e) = added {
            // Roll back whichever half made it onto the window.
            self.remove_listeners(&pair);
            return Err(DragError::Subscribe {
                entity,
                reason: format!("{e:?}"),
            });
        }

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, pair);
        Ok(SubscriptionToken::new(id, entity))
    }

    fn unsubscribe(&mut self, token: SubscriptionToken) {
        let id = token.release();
        match self.live.remove(&id) {
            Some(pair) => {
                self.remove_listeners(&pair);
                self.retired.push(pair);
            }
            None => log::warn!("unsubscribe for unknown {id:?}"),
        }
    }
}
