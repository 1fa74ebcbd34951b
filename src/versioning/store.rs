//! Persistence slot for a field's content and version list.
//!
//! The core never performs I/O itself: the caller supplies something that
//! can hand back the stored `(content, versions)` pair at initialize time
//! and accept a write after every state-mutating transition. The durable
//! format is entirely the caller's business.

use std::cell::RefCell;
use std::rc::Rc;

use super::models::ContentVersion;
use crate::error::VersionError;

/// Caller-supplied read/write slot for one field.
pub trait VersionStore {
    /// Stored field content plus its version list. Called only during
    /// `initialize`.
    fn read(&mut self) -> Result<(String, Vec<ContentVersion>), VersionError>;

    /// Persist the active content and the full version list.
    fn write(&mut self, content: &str, versions: &[ContentVersion]) -> Result<(), VersionError>;
}

/// What an [`InMemoryStore`] currently holds, inspectable from outside the
/// controller through the shared slot handle.
#[derive(Debug, Clone, Default)]
pub struct StoredField {
    pub content: String,
    pub versions: Vec<ContentVersion>,
    /// Number of writes accepted so far.
    pub writes: usize,
}

/// Vec-backed store for tests and simple hosts. Clones share the same slot,
/// so a test can keep a handle while the controller owns the store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    slot: Rc<RefCell<StoredField>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(content: &str, versions: Vec<ContentVersion>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(StoredField {
                content: content.to_string(),
                versions,
                writes: 0,
            })),
        }
    }

    /// Shared handle onto the stored field.
    pub fn slot(&self) -> Rc<RefCell<StoredField>> {
        Rc::clone(&self.slot)
    }
}

impl VersionStore for InMemoryStore {
    fn read(&mut self) -> Result<(String, Vec<ContentVersion>), VersionError> {
        let slot = self.slot.borrow();
        Ok((slot.content.clone(), slot.versions.clone()))
    }

    fn write(&mut self, content: &str, versions: &[ContentVersion]) -> Result<(), VersionError> {
        let mut slot = self.slot.borrow_mut();
        slot.content = content.to_string();
        slot.versions = versions.to_vec();
        slot.writes += 1;
        Ok(())
    }
}
