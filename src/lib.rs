//! Formkit - Editing Core for a Visual Form Builder
//!
//! A host assembles a data-entry form from a palette of field kinds,
//! configures each field and previews the result. This crate holds the
//! state behind that:
//!
//! - [`editor::ElementCollection`]: the ordered elements and their pure edit
//!   operations
//! - [`editor::HistoryStore`]: linear, bounded undo/redo over snapshots
//! - [`editor::SelectionState`]: the element open for editing
//! - [`editor::EditorSession`]: the three values above, owned for a host
//!
//! Per-kind behavior (defaults, input descriptors, validation rules) lives
//! in one table in [`fields`]. Saved forms go through a
//! [`persistence::FormStore`].

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod fields;
pub mod id;
pub mod model;
pub mod persistence;
pub mod preview;
pub mod workspace;

pub use error::{FormError, Result};
