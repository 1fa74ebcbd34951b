use thiserror::Error;

/// Typed error hierarchy for the versioning core.
///
/// Serializes as a plain string (the frontend's `error.message` convention)
/// while giving Rust code typed variants that can be matched or propagated
/// with `?`.
#[derive(Debug, Error)]
pub enum VersionError {
    /// Select/activate of a version id that is not in the set. The set is
    /// left untouched — the core never silently picks a default.
    #[error("Unknown version: {0}")]
    InvalidVersionReference(String),

    /// A second generation was requested while one is already in flight
    /// for this field.
    #[error("A generation is already running for this field")]
    GenerationInFlight,

    /// The caller's generation future resolved with an error. Reported
    /// after the lifecycle has already returned cleanly to idle.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The caller-supplied persistence slot failed to read or write.
    #[error("{0}")]
    Store(String),
}

/// Serialize as a plain string so a UI layer receives the same
/// `"error message"` string it already expects.
impl serde::Serialize for VersionError {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

// ── From impls ─────────────────────────────────────────────────────────────

/// Allows store implementations to use `.map_err(|e| format!("…", e))?`
/// without naming a variant at every call site.
impl From<String> for VersionError {
    fn from(s: String) -> Self {
        VersionError::Store(s)
    }
}

impl From<&str> for VersionError {
    fn from(s: &str) -> Self {
        VersionError::Store(s.to_string())
    }
}
