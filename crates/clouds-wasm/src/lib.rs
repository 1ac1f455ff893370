//! WASM bridge for Moving Clouds — mounts draggable entities into a page.
//!
//! Compiled via `wasm-pack build --target web`. The page creates a
//! [`CloudsApp`] over a root element; from then on everything is wired in
//! Rust:
//!
//! - `mousedown` on an entity's element → [`Surface::pointer_down`]
//! - the gesture's `window` listeners ([`WindowChannel`]) → [`Surface::dispatch`]
//! - `requestAnimationFrame` → [`Surface::flush_paints`] → element `left`/`top`

mod channel;
mod dom;
mod lifecycle;

pub use channel::{PointerSink, WindowChannel};

use clouds_core::{EntityId, Point, SurfaceConfig};
use clouds_drag::{PointerMessage, Surface};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use lifecycle::Lifecycle;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, MouseEvent, Window};

const DOWN_EVENT: &str = "mousedown";
const PRIMARY_BUTTON: i16 = 0;

fn js_error(e: impl Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

/// A mounted surface. Shared between the JS-facing handle and the
/// listeners, which only hold `Weak` references to it.
struct Mounted {
    me: Weak<Mounted>,
    window: Window,
    surface: RefCell<Surface<WindowChannel>>,
    elements: RefCell<HashMap<EntityId, HtmlElement>>,
    /// Per-element `mousedown` listeners.
    grabs: RefCell<HashMap<EntityId, Closure<dyn FnMut(MouseEvent)>>>,
    /// Reused for every `requestAnimationFrame`.
    frame: Closure<dyn FnMut(f64)>,
    lifecycle: Lifecycle,
}

impl Mounted {
    fn mount(root: &HtmlElement, config: &SurfaceConfig) -> Result<Rc<Self>, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| js_error("window has no document"))?;

        let surface =
            Surface::from_config(config, WindowChannel::new(window.clone())).map_err(js_error)?;
        dom::prepare_root(root, surface.background())?;

        let mut elements = HashMap::with_capacity(surface.len());
        for paint in surface.paint_list() {
            let element = dom::create_element(&document, root, &paint)?;
            elements.insert(paint.id, element);
        }
        let ids: Vec<EntityId> = elements.keys().copied().collect();

        let mounted = Rc::new_cyclic(|me: &Weak<Self>| {
            let mut surface = surface;
            let sink: Weak<dyn PointerSink> = me.clone();
            surface.channel_mut().bind(sink);

            let owner = me.clone();
            let frame = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
                if let Some(mounted) = owner.upgrade() {
                    mounted.on_frame();
                }
            });

            Self {
                me: me.clone(),
                window,
                surface: RefCell::new(surface),
                elements: RefCell::new(elements),
                grabs: RefCell::new(HashMap::new()),
                frame,
                lifecycle: Lifecycle::default(),
            }
        });

        for id in ids {
            if let Err(e) = mounted.attach_grab(id) {
                mounted.unmount();
                return Err(e);
            }
        }
        log::info!("mounted {} draggable entities", mounted.surface.borrow().len());
        Ok(mounted)
    }

    fn attach_grab(&self, id: EntityId) -> Result<(), JsValue> {
        let element = self
            .elements
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| js_error(format!("no element for {id}")))?;

        let owner = self.me.clone();
        let on_down = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if event.button() != PRIMARY_BUTTON {
                return;
            }
            // Keeps the browser from starting a native image drag.
            event.prevent_default();
            if let Some(mounted) = owner.upgrade() {
                mounted.pointer_down(id, Point::new(event.client_x(), event.client_y()));
            }
        });
        element.add_event_listener_with_callback(DOWN_EVENT, on_down.as_ref().unchecked_ref())?;
        self.grabs.borrow_mut().insert(id, on_down);
        Ok(())
    }

    fn detach_grab(&self, id: EntityId) {
        let Some(on_down) = self.grabs.borrow_mut().remove(&id) else {
            return;
        };
        let elements = self.elements.borrow();
        let Some(element) = elements.get(&id) else {
            return;
        };
        if let Err(e) = element
            .remove_event_listener_with_callback(DOWN_EVENT, on_down.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {DOWN_EVENT} listener for {id}: {e:?}");
        }
    }

    fn pointer_down(&self, id: EntityId, pointer: Point) {
        let Ok(mut surface) = self.surface.try_borrow_mut() else {
            log::warn!("pointer down on {id} while surface is busy; dropped");
            return;
        };
        if let Err(e) = surface.pointer_down(id, pointer) {
            log::warn!("pointer down rejected: {e}");
        }
    }

    fn request_frame(&self) {
        if !self.lifecycle.is_live() {
            return;
        }
        match self
            .window
            .request_animation_frame(self.frame.as_ref().unchecked_ref())
        {
            Ok(handle) => self.lifecycle.frame_requested(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn on_frame(&self) {
        self.lifecycle.frame_fired();
        if !self.lifecycle.is_live() {
            return;
        }
        let paints = {
            let Ok(mut surface) = self.surface.try_borrow_mut() else {
                log::warn!("frame fired while surface is busy; skipped");
                return;
            };
            let paints = surface.flush_paints();
            surface.channel_mut().reap();
            paints
        };

        let elements = self.elements.borrow();
        for paint in &paints {
            let Some(element) = elements.get(&paint.id) else {
                continue;
            };
            if let Err(e) = dom::place(element, paint) {
                log::warn!("failed to place {}: {e:?}", paint.id);
            }
        }
    }

    fn remove_entity(&self, id: EntityId) -> Result<(), JsValue> {
        self.surface
            .borrow_mut()
            .remove_entity(id)
            .map_err(js_error)?;
        self.detach_grab(id);
        if let Some(element) = self.elements.borrow_mut().remove(&id) {
            element.remove();
        }
        Ok(())
    }

    /// Cancel every gesture and the pending frame, and take all elements
    /// off the page. Only the first call does anything.
    fn unmount(&self) {
        if !self.lifecycle.begin_teardown() {
            return;
        }
        if let Some(handle) = self.lifecycle.take_pending_frame() {
            if let Err(e) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {e:?}");
            }
        }
        match self.surface.try_borrow_mut() {
            Ok(mut surface) => {
                surface.teardown();
                surface.channel_mut().reap();
            }
            Err(_) => log::warn!("unmount while surface is busy; gestures left to surface drop"),
        }
        let ids: Vec<EntityId> = self.elements.borrow().keys().copied().collect();
        for id in ids {
            self.detach_grab(id);
        }
        for (_, element) in self.elements.borrow_mut().drain() {
            element.remove();
        }
        log::info!("unmounted surface");
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl PointerSink for Mounted {
    fn deliver(&self, entity: EntityId, message: PointerMessage) {
        let wants_frame = {
            let Ok(mut surface) = self.surface.try_borrow_mut() else {
                log::warn!("{message:?} for {entity} while surface is busy; dropped");
                return;
            };
            match surface.dispatch(entity, message) {
                Ok(transition) => log::trace!("{entity}: {transition:?}"),
                Err(e) => log::debug!("pointer event dropped: {e}"),
            }
            surface.take_tick_request()
        };
        if wants_frame {
            self.request_frame();
        }
    }
}

// ─── JS API ──────────────────────────────────────────────────────────────

/// The JS handle to a mounted surface.
#[wasm_bindgen]
pub struct CloudsApp {
    mounted: Rc<Mounted>,
}

#[wasm_bindgen]
impl CloudsApp {
    /// Mount the entities described by `config_json` under `root`.
    #[wasm_bindgen(constructor)]
    pub fn new(root: HtmlElement, config_json: &str) -> Result<CloudsApp, JsValue> {
        setup_runtime();
        let config = SurfaceConfig::from_json(config_json).map_err(js_error)?;
        Ok(Self {
            mounted: Mounted::mount(&root, &config)?,
        })
    }

    /// Mount the built-in four-cloud surface under `root`.
    #[wasm_bindgen(js_name = withDefaults)]
    pub fn with_defaults(root: HtmlElement) -> Result<CloudsApp, JsValue> {
        setup_runtime();
        Ok(Self {
            mounted: Mounted::mount(&root, &SurfaceConfig::default())?,
        })
    }

    /// Remove an entity, releasing its window listeners if it is mid-drag.
    #[wasm_bindgen(js_name = removeEntity)]
    pub fn remove_entity(&self, id: &str) -> Result<(), JsValue> {
        self.mounted.remove_entity(EntityId::intern(id))
    }

    /// End the gesture on `id` without reverting. Returns `true` if one was active.
    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&self, id: &str) -> Result<bool, JsValue> {
        let ended = self
            .mounted
            .surface
            .borrow_mut()
            .cancel_drag(EntityId::intern(id))
            .map_err(js_error)?;
        Ok(ended.is_some())
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self, id: &str) -> bool {
        self.mounted
            .surface
            .borrow()
            .entity(EntityId::intern(id))
            .is_some_and(|e| e.is_dragging())
    }

    /// Current positions as JSON: `{"cloud_a":{"x":135,"y":110},...}`.
    #[wasm_bindgen(js_name = positionsJson)]
    pub fn positions_json(&self) -> String {
        let surface = self.mounted.surface.borrow();
        let positions: BTreeMap<String, Point> = surface
            .entities()
            .map(|e| (e.id().as_str().to_string(), e.position()))
            .collect();
        match serde_json::to_string(&positions) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("positions serialization failed: {e}");
                "{}".to_string()
            }
        }
    }

    /// Number of live window listener pairs (one per active gesture).
    #[wasm_bindgen(js_name = liveSubscriptions)]
    pub fn live_subscriptions(&self) -> usize {
        self.mounted.surface.borrow().channel().live_count()
    }

    /// Cancel all gestures, remove every listener and element. Freeing the
    /// handle from JS does the same.
    pub fn unmount(self) {
        self.mounted.unmount();
    }
}

// ─── Runtime setup ───────────────────────────────────────────────────────

fn setup_runtime() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SETUP: Once = Once::new();
        SETUP.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Moving Clouds WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if let Err(e) = console_log::init_with_level(log::Level::Debug) {
                web_sys::console::warn_1(&format!("console logger not installed: {e}").into());
            }
        });
    }
}

// ─── Standalone config helpers (no mount needed) ─────────────────────────

/// Validate a surface config. Returns JSON: `{"ok":true,"entities":N}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen(js_name = validateConfig)]
pub fn validate_config(config_json: &str) -> String {
    let result = match SurfaceConfig::from_json(config_json) {
        Ok(config) => serde_json::json!({ "ok": true, "entities": config.entities.len() }),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
    };
    result.to_string()
}

/// The built-in four-cloud surface as JSON, for pages that want to edit it.
#[wasm_bindgen(js_name = defaultConfigJson)]
pub fn default_config_json() -> Result<String, JsValue> {
    SurfaceConfig::default().to_json().map_err(js_error)
}
