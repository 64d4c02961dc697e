//! JSON helpers for untyped persisted state
//!
//! # Architecture
//!
//! - `accessors.rs` - Defensive field readers used by every migration step
//! - `validator.rs` - Canonical shape validation rules

pub mod accessors;
mod validator;

pub use validator::{
    CanonicalStateValidator, FetchMetadataRule, SettingsChoiceRule, SettingsShapeRule,
    ValidationRule, VersionTagRule, is_canonical,
};
