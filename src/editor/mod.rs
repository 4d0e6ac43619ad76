//! Editing State
//!
//! The three values a form builder edits (element collection, snapshot
//! history, selection) and the session that owns them for a host.

pub mod collection;
pub mod history;
pub mod selection;
pub mod session;

pub use collection::{ElementCollection, COPY_LABEL_SUFFIX, COPY_NAME_SUFFIX};
pub use history::{HistoryStore, Snapshot, DEFAULT_HISTORY_CAPACITY};
pub use selection::SelectionState;
pub use session::{ChangeSink, EditorSession, FormInfo};
