//! Persistence and change-notification collaborators.
//!
//! The store only sees two narrow seams: [`ListStorage`] reads and writes the
//! serialized list, [`ChangeFeed`] reports writes made by other contexts.
//! [`SharedStorage`] is an in-process implementation of both, where every
//! [`StorageContext`] plays the role of one open view of the list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::error::{GroceryError, GroceryResult};

/// Reads and writes the serialized grocery list
pub trait ListStorage: Send {
    /// Current serialized value, `None` when nothing was ever saved
    fn read(&self) -> GroceryResult<Option<String>>;

    fn write(&self, value: &str) -> GroceryResult<()>;
}

/// A write made by another context
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    /// New serialized value, `None` when the value was removed
    pub new_value: Option<String>,
}

/// Source of out-of-band change notifications
pub trait ChangeFeed: Send {
    /// Next pending change, without blocking
    fn try_next(&mut self) -> Option<StorageChange>;
}

#[derive(Debug, Clone)]
struct Broadcast {
    origin: u64,
    change: StorageChange,
}

/// In-process storage shared by several contexts.
///
/// A write from one context is delivered to every other context's feed.
/// Last write wins; there is no merge.
#[derive(Clone)]
pub struct SharedStorage {
    value: Arc<Mutex<Option<String>>>,
    sender: broadcast::Sender<Broadcast>,
    next_context: Arc<AtomicU64>,
}

impl SharedStorage {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// `capacity` bounds how many unread changes a context may fall behind
    /// before older ones are dropped
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            value: Arc::new(Mutex::new(None)),
            sender,
            next_context: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Pre-populated storage, as if a previous session had saved `value`
    pub fn with_value(value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut slot) = storage.value.lock() {
            *slot = Some(value.into());
        }
        storage
    }

    /// Open a new context (one view of the list) on this storage
    pub fn context(&self) -> StorageContext {
        StorageContext {
            id: self.next_context.fetch_add(1, Ordering::Relaxed),
            storage: self.clone(),
            receiver: self.sender.subscribe(),
        }
    }

    /// Replace the value from outside any context and notify every context.
    ///
    /// `None` removes the value.
    pub fn set_external(&self, value: Option<String>) -> GroceryResult<()> {
        self.store(value.clone())?;
        self.notify(0, StorageChange { new_value: value });
        Ok(())
    }

    pub fn snapshot(&self) -> GroceryResult<Option<String>> {
        self.value
            .lock()
            .map(|v| v.clone())
            .map_err(|e| GroceryError::Storage(e.to_string()))
    }

    fn store(&self, value: Option<String>) -> GroceryResult<()> {
        let mut slot = self
            .value
            .lock()
            .map_err(|e| GroceryError::Storage(e.to_string()))?;
        *slot = value;
        Ok(())
    }

    fn notify(&self, origin: u64, change: StorageChange) {
        // No receivers is fine: nobody else is looking at the list
        let _ = self.sender.send(Broadcast { origin, change });
    }
}

impl Default for SharedStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// One context's handle on a [`SharedStorage`]
pub struct StorageContext {
    id: u64,
    storage: SharedStorage,
    receiver: broadcast::Receiver<Broadcast>,
}

impl StorageContext {
    /// Split into the storage half and the change-feed half
    pub fn split(self) -> (ContextWriter, ContextFeed) {
        (
            ContextWriter {
                id: self.id,
                storage: self.storage,
            },
            ContextFeed {
                id: self.id,
                receiver: self.receiver,
            },
        )
    }
}

/// Storage half of a [`StorageContext`]
pub struct ContextWriter {
    id: u64,
    storage: SharedStorage,
}

impl ListStorage for ContextWriter {
    fn read(&self) -> GroceryResult<Option<String>> {
        self.storage.snapshot()
    }

    fn write(&self, value: &str) -> GroceryResult<()> {
        self.storage.store(Some(value.to_string()))?;
        self.storage.notify(
            self.id,
            StorageChange {
                new_value: Some(value.to_string()),
            },
        );
        Ok(())
    }
}

/// Change-feed half of a [`StorageContext`]; skips the context's own writes
pub struct ContextFeed {
    id: u64,
    receiver: broadcast::Receiver<Broadcast>,
}

impl ChangeFeed for ContextFeed {
    fn try_next(&mut self) -> Option<StorageChange> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.origin == self.id => continue,
                Ok(event) => return Some(event.change),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(context = self.id, skipped, "change feed lagged");
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}

/// Storage that holds a value in memory with no other contexts
#[derive(Default)]
pub struct MemoryStorage {
    value: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }
}

impl ListStorage for MemoryStorage {
    fn read(&self) -> GroceryResult<Option<String>> {
        self.value
            .lock()
            .map(|v| v.clone())
            .map_err(|e| GroceryError::Storage(e.to_string()))
    }

    fn write(&self, value: &str) -> GroceryResult<()> {
        let mut slot = self
            .value
            .lock()
            .map_err(|e| GroceryError::Storage(e.to_string()))?;
        *slot = Some(value.to_string());
        Ok(())
    }
}
