//! draftdeck — content-version lifecycle management for the free-text fields
//! of a podcast production planner (guest bios, research notes, episode
//! introductions).
//!
//! The crate owns the in-memory lifecycle rules only: when an edit is
//! significant enough to record as a version, which version is active, and
//! how manual edits interleave with asynchronous AI-generated replacements.
//! Rendering, the generation network call, and durable persistence stay with
//! the caller, reached through the seams in [`versioning`].

pub mod error;
pub mod versioning;

pub use error::VersionError;
pub use versioning::{
    ContentVersion, FieldVersionController, InMemoryStore, LifecycleState, Origin,
    VersionLifecycle, VersionListEntry, VersionSet, VersionSource, VersionStore,
};
