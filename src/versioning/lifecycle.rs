//! Version lifecycle state machine for a single free-text field.
//!
//! Consolidates the per-form reimplementations of "when does an edit become
//! a version" into one explicit machine: initialization, manual-edit
//! capture, AI-generation capture, version selection, and history clearing.
//! The ad-hoc "edited since load" booleans and timer-based race workarounds
//! of the old forms are replaced by the state enum plus an explicit origin
//! tag carried in the machine itself.

use serde::{Deserialize, Serialize};

use super::classifier;
use super::models::{ContentVersion, VersionSet, VersionSource};
use crate::error::VersionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// No versions and no baseline content observed yet.
    Uninitialized,
    /// Has an active version; baseline equals its content; no pending edit.
    Idle,
    /// Live content has diverged from the baseline; baseline is unchanged
    /// until the next save point.
    EditedSinceBaseline,
    /// An AI generation is in flight; automatic version creation from
    /// content-change observation is suppressed.
    Generating,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Idle => write!(f, "idle"),
            Self::EditedSinceBaseline => write!(f, "edited_since_baseline"),
            Self::Generating => write!(f, "generating"),
        }
    }
}

/// The event after which the *next* edit starts a new, separately tracked
/// change. Each origin yields at most one automatically captured version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Field was initialized from stored content.
    Load,
    /// Field content was last replaced by a completed AI generation.
    AiGeneration,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::AiGeneration => write!(f, "ai generation"),
        }
    }
}

/// State machine tracking the edit history of one field.
///
/// All operations are synchronous transitions; methods that can change the
/// version set return `true` when it (or the active content) changed, so the
/// caller knows a persist is due.
#[derive(Debug)]
pub struct VersionLifecycle {
    state: LifecycleState,
    versions: VersionSet,
    baseline: String,
    origin: Origin,
    origin_captured: bool,
}

impl Default for VersionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionLifecycle {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            versions: VersionSet::new(),
            baseline: String::new(),
            origin: Origin::Load,
            origin_captured: false,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Adopt existing versions (or synthesize version 1 from non-empty live
    /// content) and establish the baseline.
    ///
    /// If no stored version is flagged active, the most recently timestamped
    /// one is promoted and marked active. With neither versions nor content
    /// the machine stays `Uninitialized` until content appears.
    pub fn initialize(&mut self, live_content: &str, existing: Vec<ContentVersion>) -> bool {
        self.origin = Origin::Load;
        self.origin_captured = false;

        if !existing.is_empty() {
            let set = VersionSet::from(existing);
            let active_count = set.iter().filter(|v| v.active).count();
            let active_id = match set.active() {
                Some(v) => v.id.clone(),
                None => {
                    // No active flag survived persistence: promote the most
                    // recently timestamped version.
                    let id = set
                        .iter()
                        .max_by_key(|v| v.timestamp)
                        .map(|v| v.id.clone())
                        .unwrap_or_default();
                    log::warn!("No active version in stored set; promoting most recent");
                    id
                }
            };
            if active_count > 1 {
                log::warn!(
                    "{} active versions in stored set; keeping the first",
                    active_count
                );
            }
            // Any normalization (none or several actives) must be persisted
            let repaired = active_count != 1;
            // with_activated also normalizes a corrupt multi-active set
            match set.with_activated(&active_id) {
                Ok(normalized) => self.versions = normalized,
                Err(_) => self.versions = set,
            }
            self.baseline = self
                .versions
                .active()
                .map(|v| v.content.clone())
                .unwrap_or_default();
            self.state = LifecycleState::Idle;
            log::debug!(
                "Initialized with {} stored versions, active v{}",
                self.versions.len(),
                self.versions.active().map(|v| v.version_number).unwrap_or(0)
            );
            return repaired;
        }

        if !live_content.is_empty() {
            self.versions = VersionSet::new().with_new_active_version(live_content, VersionSource::Manual);
            self.baseline = live_content.to_string();
            self.state = LifecycleState::Idle;
            log::debug!("Initialized with synthesized version 1 from live content");
            return true;
        }

        self.versions = VersionSet::new();
        self.baseline.clear();
        self.state = LifecycleState::Uninitialized;
        false
    }

    /// Observe a live content change.
    ///
    /// Suppressed while a generation is in flight (its content assignment
    /// must not count as a user edit). The first edit after each origin
    /// (load or AI output) captures a manual version immediately; further
    /// edits before the next save point do not.
    pub fn observe_edit(&mut self, live_content: &str) -> bool {
        match self.state {
            LifecycleState::Generating => {
                log::debug!("Edit observed during generation; suppressed");
                false
            }
            // First version is created at the first save point, not per
            // keystroke, so an uninitialized field ignores observations.
            LifecycleState::Uninitialized => false,
            LifecycleState::EditedSinceBaseline => false,
            LifecycleState::Idle => {
                if live_content.is_empty() || live_content == self.baseline {
                    return false;
                }
                if self.origin_captured {
                    self.state = LifecycleState::EditedSinceBaseline;
                    return false;
                }
                self.versions = self
                    .versions
                    .with_new_active_version(live_content, VersionSource::Manual);
                self.origin_captured = true;
                self.state = LifecycleState::EditedSinceBaseline;
                log::info!(
                    "Auto-captured manual version {} (first edit after {})",
                    self.versions.highest_version_number(),
                    self.origin
                );
                true
            }
        }
    }

    /// Save point (blur/defocus). Empty content, content equal to the active
    /// version, and changes the classifier calls not-significant are all
    /// ignored; otherwise a new manual active version is recorded and the
    /// baseline moves to it. With no versions yet, falls back to creating
    /// version 1.
    pub fn save(&mut self, live_content: &str) -> bool {
        if self.state == LifecycleState::Generating {
            log::debug!("Save during generation; suppressed");
            return false;
        }
        if live_content.is_empty() {
            return false;
        }

        let active_content = match self.versions.active() {
            Some(v) => v.content.clone(),
            None => {
                self.versions = self
                    .versions
                    .with_new_active_version(live_content, VersionSource::Manual);
                self.baseline = live_content.to_string();
                self.origin_captured = true;
                self.state = LifecycleState::Idle;
                log::info!("Saved first version of field");
                return true;
            }
        };

        if live_content == active_content
            || !classifier::is_significant(live_content, &active_content)
        {
            // Not worth a version; still a save point, so re-sync to the
            // active content as the baseline.
            self.baseline = active_content;
            self.state = LifecycleState::Idle;
            return false;
        }

        self.versions = self
            .versions
            .with_new_active_version(live_content, VersionSource::Manual);
        self.baseline = live_content.to_string();
        self.state = LifecycleState::Idle;
        log::info!(
            "Saved manual version {}",
            self.versions.highest_version_number()
        );
        true
    }

    /// Activate the version with the given id, making its content the new
    /// baseline. Legal in any state; cancels edit tracking. Unknown ids are
    /// an error and leave the machine untouched.
    pub fn select_version(&mut self, id: &str) -> Result<ContentVersion, VersionError> {
        self.versions = self.versions.with_activated(id)?;
        let selected = self
            .versions
            .get(id)
            .cloned()
            .ok_or_else(|| VersionError::InvalidVersionReference(id.to_string()))?;
        self.baseline = selected.content.clone();
        self.state = LifecycleState::Idle;
        // Selection is not a new origin; the next edit waits for the blur
        // save instead of auto-capturing.
        self.origin_captured = true;
        log::info!("Selected version {} as active", selected.version_number);
        Ok(selected)
    }

    /// Enter the generating state. Rejected when a generation is already in
    /// flight (at most one per field).
    pub fn begin_generation(&mut self) -> Result<(), VersionError> {
        if self.state == LifecycleState::Generating {
            return Err(VersionError::GenerationInFlight);
        }
        self.state = LifecycleState::Generating;
        log::debug!("Generation started; edit observation suppressed");
        Ok(())
    }

    /// Record the generated content as a new active AI version and start a
    /// fresh edit origin from it.
    pub fn complete_generation(&mut self, generated_content: &str) {
        if self.state != LifecycleState::Generating {
            // Generated text must never be lost, even on a protocol slip.
            log::warn!("Generation completed while not generating; recording anyway");
        }
        self.versions = self
            .versions
            .with_new_active_version(generated_content, VersionSource::Ai);
        self.baseline = generated_content.to_string();
        self.origin = Origin::AiGeneration;
        self.origin_captured = false;
        self.state = LifecycleState::Idle;
        log::info!(
            "Recorded AI version {}",
            self.versions.highest_version_number()
        );
    }

    /// Leave the generating state without recording a version. Live content
    /// is untouched; surfacing the failure is the caller's concern.
    pub fn fail_generation(&mut self) {
        if self.state != LifecycleState::Generating {
            log::warn!("Generation failure reported while not generating; ignored");
            return;
        }
        self.state = if self.versions.is_empty() {
            LifecycleState::Uninitialized
        } else {
            LifecycleState::Idle
        };
        log::info!("Generation failed; no version recorded");
    }

    /// Discard every version except the active one. Its content and number
    /// are preserved, and the baseline is unchanged. No-op with zero
    /// versions.
    pub fn clear_history(&mut self) -> bool {
        if self.versions.is_empty() {
            return false;
        }
        if self.versions.len() == 1 {
            return false;
        }
        let before = self.versions.len();
        self.versions = self.versions.collapsed_to_active();
        log::info!(
            "Cleared history: {} versions removed, v{} kept",
            before - self.versions.len(),
            self.versions.active().map(|v| v.version_number).unwrap_or(0)
        );
        true
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn versions(&self) -> &VersionSet {
        &self.versions
    }

    /// The content last agreed to be saved.
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn active_content(&self) -> Option<&str> {
        self.versions.active().map(|v| v.content.as_str())
    }
}
