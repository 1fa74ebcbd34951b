//! Consolidated content-version lifecycle for one free-text field.
//!
//! One field (a guest bio, a set of research notes, an introduction) owns an
//! ordered set of content versions with exactly one active member. This
//! module is the single implementation of the rules the old forms each
//! reimplemented: significance-gated version creation on save, one
//! auto-captured version per edit origin, and clean interleaving of manual
//! edits with asynchronous AI replacements.

pub mod classifier;
mod controller;
mod lifecycle;
mod models;
mod store;


pub use controller::{DisplayFn, FieldVersionController, VersionListEntry};
pub use lifecycle::{LifecycleState, Origin, VersionLifecycle};
pub use models::{ContentVersion, VersionSet, VersionSource};
pub use store::{InMemoryStore, StoredField, VersionStore};
