//! The shared room-document store boundary.
//!
//! The core only ever talks to a [`RoomStore`]: whole-document reads and
//! writes plus a change subscription. No field-level merge, no transactions
//! stronger than "replace the document". A backing service that can do
//! that much can host the engine.
//!
//! [`MemoryStore`] is the in-process implementation used by tests and local
//! play. It keeps each room as one encoded blob, so reads are
//! snapshot-consistent by construction: a reader always decodes a fully
//! formed prior state, never a partial write.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::core::Room;
use crate::error::StoreError;

/// Handle for cancelling a subscription.
pub type SubscriptionId = u64;

/// Change callback; receives the freshly written snapshot. Shared so the
/// store can invoke it without holding its own lock, which lets callbacks
/// call back into the store.
pub type ChangeCallback = Arc<dyn Fn(&Room) + Send + Sync>;

/// Whole-document room persistence.
pub trait RoomStore {
    /// Create a room; errors when the id already exists.
    fn create(&self, room: &Room) -> Result<(), StoreError>;

    /// Read the latest snapshot.
    fn read(&self, room_id: &str) -> Result<Room, StoreError>;

    /// Replace the whole document and fan the new snapshot out to
    /// subscribers.
    fn write(&self, room: &Room) -> Result<(), StoreError>;

    /// Delete a room and drop its subscriptions.
    fn delete(&self, room_id: &str) -> Result<(), StoreError>;

    /// Subscribe to snapshot changes for a room.
    fn subscribe(&self, room_id: &str, on_change: ChangeCallback)
        -> Result<SubscriptionId, StoreError>;

    /// Cancel a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, room_id: &str, subscription: SubscriptionId);
}

#[derive(Default)]
struct StoreInner {
    rooms: HashMap<String, Vec<u8>>,
    subscribers: HashMap<String, Vec<(SubscriptionId, ChangeCallback)>>,
    next_subscription: SubscriptionId,
}

/// In-process [`RoomStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(room: &Room) -> Result<Vec<u8>, StoreError> {
        bincode::serialize(room).map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<Room, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Codec(e.to_string()))
    }
}

impl RoomStore for MemoryStore {
    fn create(&self, room: &Room) -> Result<(), StoreError> {
        let bytes = Self::encode(room)?;
        let mut inner = self.inner.lock();
        if inner.rooms.contains_key(&room.id) {
            return Err(StoreError::RoomExists(room.id.clone()));
        }
        inner.rooms.insert(room.id.clone(), bytes);
        Ok(())
    }

    fn read(&self, room_id: &str) -> Result<Room, StoreError> {
        let inner = self.inner.lock();
        let bytes =
            inner.rooms.get(room_id).ok_or_else(|| StoreError::RoomNotFound(room_id.into()))?;
        Self::decode(bytes)
    }

    fn write(&self, room: &Room) -> Result<(), StoreError> {
        let bytes = Self::encode(room)?;
        {
            let mut inner = self.inner.lock();
            if !inner.rooms.contains_key(&room.id) {
                return Err(StoreError::RoomNotFound(room.id.clone()));
            }
            // Last write wins, whole document.
            inner.rooms.insert(room.id.clone(), bytes);
        }
        debug!(room = %room.id, "room written, fanning out");

        // Snapshot the subscriber list and release the lock before any
        // callback runs; callbacks may read or write the store themselves.
        let subs: Vec<ChangeCallback> = {
            let inner = self.inner.lock();
            inner
                .subscribers
                .get(&room.id)
                .map(|subs| subs.iter().map(|(_, cb)| cb.clone()).collect())
                .unwrap_or_default()
        };
        for on_change in subs {
            on_change(room);
        }
        Ok(())
    }

    fn delete(&self, room_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner
            .rooms
            .remove(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.into()))?;
        inner.subscribers.remove(room_id);
        Ok(())
    }

    fn subscribe(
        &self,
        room_id: &str,
        on_change: ChangeCallback,
    ) -> Result<SubscriptionId, StoreError> {
        let mut inner = self.inner.lock();
        if !inner.rooms.contains_key(room_id) {
            return Err(StoreError::RoomNotFound(room_id.into()));
        }
        inner.next_subscription += 1;
        let id = inner.next_subscription;
        inner.subscribers.entry(room_id.to_string()).or_default().push((id, on_change));
        Ok(id)
    }

    fn unsubscribe(&self, room_id: &str, subscription: SubscriptionId) {
        let mut inner = self.inner.lock();
        if let Some(subs) = inner.subscribers.get_mut(room_id) {
            subs.retain(|(id, _)| *id != subscription);
        }
    }
}
