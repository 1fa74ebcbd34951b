//! Public façade a form field binds to.
//!
//! Wraps [`VersionLifecycle`] and limits side effects to the two
//! caller-supplied seams: the persistence slot (written after every
//! state-mutating transition) and the "set displayed content" callback
//! (invoked whenever the controller replaces what the editor shows).

use std::future::Future;

use chrono::{DateTime, Utc};

use super::lifecycle::{LifecycleState, VersionLifecycle};
use super::models::{VersionSet, VersionSource};
use super::store::VersionStore;
use crate::error::VersionError;

/// Row of the version-picker projection, ordered newest first.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VersionListEntry {
    pub id: String,
    pub version_number: u32,
    pub source: VersionSource,
    pub active: bool,
    pub content: String,
    /// Human label: source + relative age, e.g. `"AI · 5 minutes ago"`.
    pub label: String,
}

/// Callback the UI supplies for "replace the editor's displayed content".
pub type DisplayFn = Box<dyn FnMut(&str)>;

pub struct FieldVersionController {
    lifecycle: VersionLifecycle,
    store: Box<dyn VersionStore>,
    on_display: DisplayFn,
}

impl FieldVersionController {
    pub fn new(store: Box<dyn VersionStore>, on_display: DisplayFn) -> Self {
        Self {
            lifecycle: VersionLifecycle::new(),
            store,
            on_display,
        }
    }

    /// Read the stored field, adopt its versions, and push the stored
    /// content to the display. The only operation that reads the store.
    pub fn initialize(&mut self) -> Result<(), VersionError> {
        let (content, versions) = self.store.read()?;
        let changed = self.lifecycle.initialize(&content, versions);
        if changed {
            self.persist()?;
        }
        (self.on_display)(&content);
        Ok(())
    }

    /// Fired on every editor content change.
    pub fn notify_content_changed(&mut self, live_content: &str) -> Result<(), VersionError> {
        if self.lifecycle.observe_edit(live_content) {
            self.persist()?;
        }
        Ok(())
    }

    /// Fired when the field loses focus; drives the save transition.
    pub fn notify_blur(&mut self, live_content: &str) -> Result<(), VersionError> {
        if self.lifecycle.save(live_content) {
            self.persist()?;
        }
        Ok(())
    }

    /// Activate a version from the history list and show its content.
    pub fn select_version(&mut self, id: &str) -> Result<(), VersionError> {
        let selected = self.lifecycle.select_version(id)?;
        self.persist()?;
        (self.on_display)(&selected.content);
        Ok(())
    }

    /// Drop every version except the active one, then snap the editor back
    /// to the active content. Unsaved live edits are intentionally discarded
    /// in favor of the last-saved content.
    pub fn clear_history(&mut self) -> Result<(), VersionError> {
        if self.lifecycle.clear_history() {
            self.persist()?;
        }
        if let Some(content) = self.lifecycle.active_content().map(str::to_string) {
            (self.on_display)(&content);
        }
        Ok(())
    }

    // ========================================================================
    // Generation hooks
    // ========================================================================

    pub fn begin_generation(&mut self) -> Result<(), VersionError> {
        self.lifecycle.begin_generation()
    }

    pub fn complete_generation(&mut self, generated_content: &str) -> Result<(), VersionError> {
        self.lifecycle.complete_generation(generated_content);
        self.persist()?;
        (self.on_display)(generated_content);
        Ok(())
    }

    pub fn fail_generation(&mut self) {
        self.lifecycle.fail_generation();
    }

    /// Run one opaque generation future through the begin/complete/fail
    /// protocol. On failure the lifecycle is already back to idle when the
    /// error is returned.
    pub async fn generate_with<F, E>(&mut self, generation: F) -> Result<(), VersionError>
    where
        F: Future<Output = Result<String, E>>,
        E: std::fmt::Display,
    {
        self.begin_generation()?;
        match generation.await {
            Ok(text) => self.complete_generation(&text),
            Err(e) => {
                self.fail_generation();
                Err(VersionError::GenerationFailed(e.to_string()))
            }
        }
    }

    // ========================================================================
    // Projection
    // ========================================================================

    /// Version-picker rows, ordered by version number descending.
    pub fn version_list(&self) -> Vec<VersionListEntry> {
        self.version_list_at(Utc::now())
    }

    /// Same as [`version_list`](Self::version_list) with an explicit clock,
    /// so relative-age labels are testable.
    pub fn version_list_at(&self, now: DateTime<Utc>) -> Vec<VersionListEntry> {
        let mut entries: Vec<VersionListEntry> = self
            .lifecycle
            .versions()
            .iter()
            .map(|v| VersionListEntry {
                id: v.id.clone(),
                version_number: v.version_number,
                source: v.source,
                active: v.active,
                content: v.content.clone(),
                label: v.label(now),
            })
            .collect();
        entries.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        entries
    }

    pub fn active_version_id(&self) -> Option<&str> {
        self.lifecycle.versions().active().map(|v| v.id.as_str())
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn versions(&self) -> &VersionSet {
        self.lifecycle.versions()
    }

    fn persist(&mut self) -> Result<(), VersionError> {
        let content = self
            .lifecycle
            .active_content()
            .map(str::to_string)
            .unwrap_or_default();
        self.store
            .write(&content, self.lifecycle.versions().versions())
    }
}

impl std::fmt::Debug for FieldVersionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldVersionController")
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}
