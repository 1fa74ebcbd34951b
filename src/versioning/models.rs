use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VersionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
    Manual,
    Ai,
    Import,
}

impl Default for VersionSource {
    fn default() -> Self {
        Self::Manual
    }
}

impl std::fmt::Display for VersionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Ai => write!(f, "ai"),
            Self::Import => write!(f, "import"),
        }
    }
}

impl From<String> for VersionSource {
    fn from(s: String) -> Self {
        match s.as_str() {
            "manual" => Self::Manual,
            "ai" => Self::Ai,
            "import" => Self::Import,
            _ => Self::Manual,
        }
    }
}

impl VersionSource {
    /// Human form used in version-picker labels.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Ai => "AI",
            Self::Import => "Import",
        }
    }
}

/// One immutable snapshot of a field's text plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentVersion {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub source: VersionSource,
    pub active: bool,
    pub version_number: u32,
}

impl ContentVersion {
    /// Human label for the version picker: source + relative age, e.g.
    /// `"AI · 5 minutes ago"`. Takes `now` so labels are testable.
    pub fn label(&self, now: DateTime<Utc>) -> String {
        format!(
            "{} · {}",
            self.source.display_name(),
            relative_age(now.signed_duration_since(self.timestamp))
        )
    }
}

fn relative_age(age: chrono::Duration) -> String {
    let secs = age.num_seconds().max(0);
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        let n = secs / 60;
        format!("{} minute{} ago", n, if n == 1 { "" } else { "s" })
    } else if secs < 86_400 {
        let n = secs / 3600;
        format!("{} hour{} ago", n, if n == 1 { "" } else { "s" })
    } else {
        let n = secs / 86_400;
        format!("{} day{} ago", n, if n == 1 { "" } else { "s" })
    }
}

// ============================================================================
// VersionSet
// ============================================================================

/// The ordered collection of versions for one field.
///
/// Invariants held after every operation: a non-empty set has exactly one
/// active member, version numbers are unique, and the maximum number only
/// ever increases (numbers are never reused, even after a clear).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionSet {
    versions: Vec<ContentVersion>,
    /// High-water mark for minted numbers. Collapsing the set to its active
    /// member can discard the highest-numbered versions; this keeps their
    /// numbers retired so the next mint never reuses one.
    #[serde(skip)]
    highest_minted: u32,
}

impl VersionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Max of every number this field has ever minted, or 0 when empty.
    /// Counts numbers whose versions were since cleared away.
    pub fn highest_version_number(&self) -> u32 {
        self.versions
            .iter()
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            .max(self.highest_minted)
    }

    /// New set with every existing version deactivated and a freshly minted
    /// version appended as active, numbered `highest + 1`.
    pub fn with_new_active_version(&self, content: &str, source: VersionSource) -> VersionSet {
        let mut versions: Vec<ContentVersion> = self
            .versions
            .iter()
            .cloned()
            .map(|mut v| {
                v.active = false;
                v
            })
            .collect();
        versions.push(ContentVersion {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
            source,
            active: true,
            version_number: self.highest_version_number() + 1,
        });
        VersionSet {
            versions,
            highest_minted: self.highest_minted,
        }
    }

    /// New set with the matching version active and all others cleared.
    /// Fails with `InvalidVersionReference` (original set untouched) when
    /// the id is not present.
    pub fn with_activated(&self, id: &str) -> Result<VersionSet, VersionError> {
        if !self.versions.iter().any(|v| v.id == id) {
            return Err(VersionError::InvalidVersionReference(id.to_string()));
        }
        Ok(VersionSet {
            versions: self
                .versions
                .iter()
                .cloned()
                .map(|mut v| {
                    v.active = v.id == id;
                    v
                })
                .collect(),
            highest_minted: self.highest_minted,
        })
    }

    /// New set containing only the current active version, content and
    /// number unchanged. The discarded versions' numbers stay retired: the
    /// number high-water mark survives the collapse even when the active
    /// member is not the highest-numbered one.
    pub fn collapsed_to_active(&self) -> VersionSet {
        VersionSet {
            versions: self.versions.iter().filter(|v| v.active).cloned().collect(),
            highest_minted: self.highest_version_number(),
        }
    }

    pub fn active(&self) -> Option<&ContentVersion> {
        self.versions.iter().find(|v| v.active)
    }

    pub fn get(&self, id: &str) -> Option<&ContentVersion> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentVersion> {
        self.versions.iter()
    }

    pub fn versions(&self) -> &[ContentVersion] {
        &self.versions
    }
}

impl From<Vec<ContentVersion>> for VersionSet {
    fn from(versions: Vec<ContentVersion>) -> Self {
        // The stored members are all we know about past numbering; the
        // high-water mark recomputes from them via highest_version_number
        VersionSet {
            versions,
            highest_minted: 0,
        }
    }
}
