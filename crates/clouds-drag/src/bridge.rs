//! Pointer subscriptions for the lifetime of one gesture.
//!
//! The ambient pointer-move / pointer-up stream is process-wide (in the
//! browser, listeners on `window`). A [`PointerChannel`] registers a pair of
//! listeners for one entity and returns a [`SubscriptionToken`]; the only way
//! to release the pair is to hand the token back through
//! [`PointerChannel::unsubscribe`], which consumes it.
//!
//! [`PointerEventBridge`] owns at most one token. `attach` refuses to stack a
//! second pair; `detach` is idempotent so every gesture-ending path (pointer
//! up, cancel, entity removal, surface teardown) can call it unconditionally.

use crate::error::DragError;
use clouds_core::EntityId;
use std::collections::HashMap;

/// Identifier of one registered listener pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Proof of a live listener pair. Not `Clone`: exactly one owner releases it.
#[derive(Debug)]
pub struct SubscriptionToken {
    id: SubscriptionId,
    entity: EntityId,
    released: bool,
}

impl SubscriptionToken {
    /// Minted by [`PointerChannel`] implementations only.
    pub fn new(id: SubscriptionId, entity: EntityId) -> Self {
        Self {
            id,
            entity,
            released: false,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Consume the token once the channel has removed its listeners.
    pub fn release(mut self) -> SubscriptionId {
        self.released = true;
        self.id
    }
}

impl Drop for SubscriptionToken {
    fn drop(&mut self) {
        if !self.released {
            log::warn!(
                "subscription {:?} for {} dropped without unsubscribe; listeners leaked",
                self.id,
                self.entity
            );
        }
    }
}

/// The ambient pointer-move / pointer-up stream.
pub trait PointerChannel {
    /// Register move + up listeners that deliver to `entity`.
    fn subscribe(&mut self, entity: EntityId) -> Result<SubscriptionToken, DragError>;

    /// Remove both listeners. After this returns, no event reaches `entity`
    /// through this subscription.
    fn unsubscribe(&mut self, token: SubscriptionToken);
}

// ─── Bridge ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct PointerEventBridge {
    token: Option<SubscriptionToken>,
}

impl PointerEventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.token.is_some()
    }

    pub fn subscription(&self) -> Option<SubscriptionId> {
        self.token.as_ref().map(SubscriptionToken::id)
    }

    /// Subscribe `entity` to the ambient stream.
    pub fn attach<C: PointerChannel + ?Sized>(
        &mut self,
        entity: EntityId,
        channel: &mut C,
    ) -> Result<(), DragError> {
        if self.token.is_some() {
            return Err(DragError::AlreadyAttached(entity));
        }
        let token = channel.subscribe(entity)?;
        log::debug!("attached {entity} as {:?}", token.id());
        self.token = Some(token);
        Ok(())
    }

    /// Release the listener pair if one is live. Returns `true` if something
    /// was released; detaching twice is a no-op.
    pub fn detach<C: PointerChannel + ?Sized>(&mut self, channel: &mut C) -> bool {
        match self.token.take() {
            Some(token) => {
                log::debug!("detached {} ({:?})", token.entity(), token.id());
                channel.unsubscribe(token);
                true
            }
            None => false,
        }
    }
}

// ─── In-process channel ──────────────────────────────────────────────────

/// Channel for headless hosts and tests: keeps a registry of live
/// subscriptions and lets the host route global events to them.
#[derive(Debug, Default)]
pub struct LocalChannel {
    live: HashMap<SubscriptionId, EntityId>,
    next_id: u64,
    subscribes: u64,
    unsubscribes: u64,
}

impl LocalChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_subscribed(&self, entity: EntityId) -> bool {
        self.live.values().any(|e| *e == entity)
    }

    /// Entities that currently receive global pointer events, in
    /// subscription order.
    pub fn subscribers(&self) -> Vec<EntityId> {
        let mut live: Vec<_> = self.live.iter().map(|(id, e)| (*id, *e)).collect();
        live.sort_by_key(|(id, _)| *id);
        live.into_iter().map(|(_, e)| e).collect()
    }

    /// Total `(subscribe, unsubscribe)` calls, for leak checks.
    pub fn totals(&self) -> (u64, u64) {
        (self.subscribes, self.unsubscribes)
    }
}

impl PointerChannel for LocalChannel {
    fn subscribe(&mut self, entity: EntityId) -> Result<SubscriptionToken, DragError> {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribes += 1;
        self.live.insert(id, entity);
        Ok(SubscriptionToken::new(id, entity))
    }

    fn unsubscribe(&mut self, token: SubscriptionToken) {
        let id = token.release();
        if self.live.remove(&id).is_some() {
            self.unsubscribes += 1;
        } else {
            log::warn!("unsubscribe for unknown {id:?}");
        }
    }
}
