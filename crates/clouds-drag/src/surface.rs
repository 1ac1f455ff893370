//! The draggable surface: every controller, one shared channel, one shared
//! scheduler.
//!
//! The surface is what a host talks to. Per-element pointer-down goes to
//! [`Surface::pointer_down`]; listeners created by the channel deliver
//! moves and releases through [`Surface::dispatch`]; the host's frame
//! callback drains [`Surface::flush`]. Dropping the surface cancels every
//! active gesture so no listener outlives it.

use crate::bridge::PointerChannel;
use crate::controller::{DragController, GestureEnd, Transition};
use crate::entity::DraggableEntity;
use crate::error::DragError;
use crate::input::PointerMessage;
use clouds_core::{
    EntityConfig, EntityId, PaintConfig, Point, RedrawBatch, RenderScheduler, SurfaceConfig,
};
use clouds_render::{ElementPaint, Paint, hit_test};

pub struct Surface<C: PointerChannel> {
    /// Paint order: later entries are on top.
    controllers: Vec<DragController>,
    channel: C,
    scheduler: RenderScheduler,
    paint: PaintConfig,
    background: Option<String>,
}

impl<C: PointerChannel> Surface<C> {
    /// Create an empty surface over `channel`.
    pub fn new(channel: C) -> Self {
        Self {
            controllers: Vec::new(),
            channel,
            scheduler: RenderScheduler::new(),
            paint: PaintConfig::default(),
            background: None,
        }
    }

    /// Build a surface with one idle controller per configured entity.
    pub fn from_config(config: &SurfaceConfig, channel: C) -> Result<Self, DragError> {
        let mut surface = Self::new(channel);
        surface.paint = config.paint.clone();
        surface.background = config.background.clone();
        for entity in &config.entities {
            surface.add_entity(entity)?;
        }
        log::debug!("surface ready with {} entities", surface.len());
        Ok(surface)
    }

    pub fn add_entity(&mut self, config: &EntityConfig) -> Result<(), DragError> {
        if self.index_of(config.id).is_ok() {
            return Err(DragError::DuplicateEntity(config.id));
        }
        self.controllers.push(DragController::from_config(config));
        Ok(())
    }

    /// Remove an entity, releasing its subscription first if it is mid-drag.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<DraggableEntity, DragError> {
        let idx = self.index_of(id)?;
        let mut controller = self.controllers.remove(idx);
        if controller.cancel_drag(&mut self.channel).is_some() {
            log::debug!("removed {id} mid-drag");
        }
        self.scheduler.forget(id);
        Ok(controller.entity().clone())
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Pointer pressed on entity `id`.
    pub fn pointer_down(&mut self, id: EntityId, pointer: Point) -> Result<(), DragError> {
        let idx = self.index_of(id)?;
        self.controllers[idx].begin_drag(pointer, &mut self.channel)
    }

    /// Pointer pressed at `pointer` with no element target; the topmost
    /// entity under it starts dragging. Returns `Ok(None)` on background.
    pub fn pointer_down_at(&mut self, pointer: Point) -> Result<Option<EntityId>, DragError> {
        let Some(id) = self.hit_test(pointer) else {
            return Ok(None);
        };
        self.pointer_down(id, pointer)?;
        Ok(Some(id))
    }

    /// Deliver an ambient pointer event to the entity it was subscribed for.
    pub fn dispatch(
        &mut self,
        id: EntityId,
        message: PointerMessage,
    ) -> Result<Transition, DragError> {
        let idx = self.index_of(id)?;
        Ok(self.controllers[idx].handle(message, &mut self.channel, &mut self.scheduler))
    }

    /// Deliver an ambient pointer event to every entity with a live
    /// subscription, the way a global listener fires for each subscriber.
    /// Returns how many controllers received it.
    pub fn broadcast(&mut self, message: PointerMessage) -> usize {
        let mut delivered = 0;
        for controller in &mut self.controllers {
            if controller.bridge().is_attached() {
                controller.handle(message, &mut self.channel, &mut self.scheduler);
                delivered += 1;
            }
        }
        delivered
    }

    /// Cancel the gesture on `id`, if any.
    pub fn cancel_drag(&mut self, id: EntityId) -> Result<Option<GestureEnd>, DragError> {
        let idx = self.index_of(id)?;
        Ok(self.controllers[idx].cancel_drag(&mut self.channel))
    }

    /// Cancel every active gesture and release every subscription.
    /// Safe to call repeatedly.
    pub fn teardown(&mut self) -> usize {
        let mut cancelled = 0;
        for controller in &mut self.controllers {
            if controller.cancel_drag(&mut self.channel).is_some() {
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            log::debug!("teardown cancelled {cancelled} gesture(s)");
        }
        cancelled
    }

    // ─── Redraw ──────────────────────────────────────────────────────────

    /// `true` once per pending tick: the host should schedule a frame.
    pub fn take_tick_request(&mut self) -> bool {
        self.scheduler.take_tick_request()
    }

    /// Ids to repaint this tick, deduplicated.
    pub fn flush(&mut self) -> RedrawBatch {
        self.scheduler.flush()
    }

    /// Flush and paint the changed entities in one step.
    pub fn flush_paints(&mut self) -> Vec<ElementPaint> {
        let batch = self.scheduler.flush();
        batch.iter().filter_map(|id| self.paint(*id)).collect()
    }

    pub fn paint(&self, id: EntityId) -> Option<ElementPaint> {
        self.controllers
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.entity().paint_at(c.position(), &self.paint))
    }

    /// Paint every entity in paint order.
    pub fn paint_list(&self) -> Vec<ElementPaint> {
        self.controllers
            .iter()
            .map(|c| c.entity().paint_at(c.position(), &self.paint))
            .collect()
    }

    pub fn hit_test(&self, pointer: Point) -> Option<EntityId> {
        hit_test(&self.paint_list(), pointer)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn entity(&self, id: EntityId) -> Option<&DraggableEntity> {
        self.controllers
            .iter()
            .find(|c| c.id() == id)
            .map(DragController::entity)
    }

    pub fn position(&self, id: EntityId) -> Option<Point> {
        self.entity(id).map(DraggableEntity::position)
    }

    pub fn entities(&self) -> impl Iterator<Item = &DraggableEntity> {
        self.controllers.iter().map(DragController::entity)
    }

    pub fn dragging(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.controllers
            .iter()
            .filter(|c| c.is_dragging())
            .map(DragController::id)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn paint_config(&self) -> &PaintConfig {
        &self.paint
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    fn index_of(&self, id: EntityId) -> Result<usize, DragError> {
        self.controllers
            .iter()
            .position(|c| c.id() == id)
            .ok_or(DragError::UnknownEntity(id))
    }
}

impl<C: PointerChannel> Drop for Surface<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
