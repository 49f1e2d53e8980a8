mod blob;
pub mod codec;
mod local;

use crate::config::REMINDERS_KEY;
use crate::error::{AppError, AppResult};
use crate::reminder::Reminder;
use log::{debug, error, info, warn};
use std::collections::HashSet;

pub use blob::{BlobStore, MemoryBlobStore};
pub use local::FileBlobStore;

/// Owns the full reminder collection and keeps it persisted
pub struct ReminderStore {
    reminders: Vec<Reminder>,
    blobs: Box<dyn BlobStore>,
    key: String,
}

impl ReminderStore {
    /// Open the store and load whatever is persisted under the default key
    pub fn open(blobs: Box<dyn BlobStore>) -> Self {
        Self::open_with_key(blobs, REMINDERS_KEY)
    }

    pub fn open_with_key(blobs: Box<dyn BlobStore>, key: &str) -> Self {
        let mut store = Self {
            reminders: Vec::new(),
            blobs,
            key: key.to_string(),
        };
        store.reminders = store.load();
        info!("Loaded {} reminders", store.reminders.len());
        store
    }

    /// Read the persisted collection. Missing or unreadable data yields an
    /// empty list; the failure is logged.
    pub fn load(&self) -> Vec<Reminder> {
        let bytes = match self.blobs.read(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Failed to read reminders: {}", e);
                return Vec::new();
            }
        };

        match codec::decode(&bytes) {
            Ok(reminders) => reminders,
            Err(e) => {
                error!("Failed to decode reminders: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the in-memory collection with what is persisted.
    pub fn reload(&mut self) -> &[Reminder] {
        self.reminders = self.load();
        &self.reminders
    }

    /// Overwrite the whole collection, in memory and on the blob store.
    /// Collections repeating an id are rejected and nothing changes.
    pub fn save_all(&mut self, reminders: Vec<Reminder>) -> AppResult<()> {
        let mut seen = HashSet::with_capacity(reminders.len());
        if let Some(duplicate) = reminders.iter().find(|r| !seen.insert(r.id.as_str())) {
            return Err(AppError::validation(format!(
                "Reminder {} appears more than once",
                duplicate.id
            )));
        }
        self.reminders = reminders;
        self.write_snapshot()
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn get(&self, id: &str) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    /// Append a reminder. Ids must stay unique across the collection.
    pub fn add(&mut self, reminder: Reminder) -> AppResult<()> {
        if self.get(&reminder.id).is_some() {
            return Err(AppError::validation(format!(
                "Reminder {} already exists",
                reminder.id
            )));
        }
        debug!("Adding reminder {}", reminder.id);
        self.reminders.push(reminder);
        self.persist();
        Ok(())
    }

    /// Replace the reminder with the same id. Returns false when no such
    /// reminder exists, in which case nothing changes.
    pub fn update(&mut self, reminder: Reminder) -> bool {
        match self.reminders.iter_mut().find(|r| r.id == reminder.id) {
            Some(existing) => {
                *existing = reminder;
                self.persist();
                true
            }
            None => {
                debug!("Update skipped, no reminder {}", reminder.id);
                false
            }
        }
    }

    /// Apply `f` to the reminder with the given id and persist the result.
    pub fn modify<F>(&mut self, id: &str, f: F) -> Option<&Reminder>
    where
        F: FnOnce(&mut Reminder),
    {
        let index = self.reminders.iter().position(|r| r.id == id)?;
        f(&mut self.reminders[index]);
        self.persist();
        Some(&self.reminders[index])
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        if self.reminders.len() == before {
            debug!("Delete skipped, no reminder {}", id);
            return false;
        }
        self.persist();
        true
    }

    /// Drop every reminder and remove the persisted blob.
    pub fn clear(&mut self) {
        self.reminders.clear();
        if let Err(e) = self.blobs.delete(&self.key) {
            warn!("Failed to clear persisted reminders: {}", e);
        }
    }

    fn write_snapshot(&mut self) -> AppResult<()> {
        let bytes = codec::encode(&self.reminders)?;
        self.blobs.write(&self.key, &bytes)
    }

    // In-memory state stays authoritative when the write fails.
    fn persist(&mut self) {
        if let Err(e) = self.write_snapshot() {
            error!("Failed to save reminders: {}", e);
        }
    }
}
