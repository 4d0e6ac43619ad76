//! Workspace on disk
//!
//! A workspace directory keeps an editing session between runs:
//!
//! ```text
//! <workspace>/
//!   form.json      current form definition
//!   history.json   snapshot history with its cursor
//!   session.json   selection and fingerprint of the last save
//!   formkit.json   editor configuration (optional)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::editor::{EditorSession, FormInfo, HistoryStore, SelectionState, Snapshot};
use crate::error::{FormError, Result};
use crate::model::FormConfig;

pub const FORM_FILE: &str = "form.json";
pub const HISTORY_FILE: &str = "history.json";
pub const SESSION_FILE: &str = "session.json";

/// Per-session state that is not part of the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    #[serde(default)]
    selection: SelectionState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_fingerprint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    path: PathBuf,
    config: EditorConfig,
}

impl Workspace {
    /// Create a workspace at `path` holding `form`.
    pub fn init(path: &Path, form: FormConfig) -> Result<Self> {
        if path.join(FORM_FILE).exists() {
            return Err(FormError::WorkspaceExists {
                path: path.to_path_buf(),
            });
        }

        fs::create_dir_all(path).map_err(|e| FormError::DirectoryCreateError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = EditorConfig::load(path)?;
        let workspace = Self {
            path: path.to_path_buf(),
            config,
        };
        let session = EditorSession::with_capacity(form, workspace.config.history_capacity);
        workspace.save_session(&session)?;

        tracing::info!(path = %path.display(), "initialized workspace");
        Ok(workspace)
    }

    /// Open an existing workspace.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.join(FORM_FILE).exists() {
            return Err(FormError::WorkspaceNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            config: EditorConfig::load(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Rebuild the editing session.
    ///
    /// A missing history starts fresh from `form.json`. When `form.json`
    /// was edited outside the editor, its elements are committed on top of
    /// the stored history so the change can still be undone.
    pub fn load_session(&self) -> Result<EditorSession> {
        let form: FormConfig = read_json(&self.path.join(FORM_FILE))?;
        let history_path = self.path.join(HISTORY_FILE);

        let mut history = if history_path.exists() {
            read_json::<HistoryStore<Snapshot>>(&history_path)?
                .with_new_capacity(self.config.history_capacity)
        } else {
            HistoryStore::with_capacity(
                Snapshot::initial(form.elements.clone()),
                self.config.history_capacity,
            )
        };

        if history.current().elements != form.elements {
            tracing::warn!(path = %self.path.display(), "form.json changed outside the editor");
            history = history.commit(Snapshot::new(form.elements.clone(), "External edit"));
        }

        let session_path = self.path.join(SESSION_FILE);
        let state: SessionFile = if session_path.exists() {
            read_json(&session_path)?
        } else {
            SessionFile::default()
        };

        Ok(EditorSession::restore(FormInfo::from(&form), history, state.selection)
            .with_saved_fingerprint(state.saved_fingerprint))
    }

    /// Write the session's form, history and selection.
    pub fn save_session(&self, session: &EditorSession) -> Result<()> {
        write_json(&self.path.join(FORM_FILE), &session.form_config())?;
        write_json(&self.path.join(HISTORY_FILE), session.history())?;
        write_json(
            &self.path.join(SESSION_FILE),
            &SessionFile {
                selection: session.selection().clone(),
                saved_fingerprint: session.saved_fingerprint().map(str::to_string),
            },
        )?;
        tracing::debug!(
            path = %self.path.display(),
            cursor = session.history().cursor(),
            "saved workspace"
        );
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| FormError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).map_err(|e| FormError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIds;
    use crate::model::FieldKind;
    use tempfile::TempDir;

    #[test]
    fn test_init_twice_fails() {
        let temp_dir = TempDir::new().unwrap();
        Workspace::init(temp_dir.path(), FormConfig::default()).unwrap();
        let err = Workspace::init(temp_dir.path(), FormConfig::default()).unwrap_err();
        assert!(matches!(err, FormError::WorkspaceExists { .. }));
    }

    #[test]
    fn test_open_missing_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let err = Workspace::open(&temp_dir.path().join("nowhere")).unwrap_err();
        assert_eq!(err.error_code(), "WORKSPACE_NOT_FOUND");
    }

    #[test]
    fn test_session_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::init(temp_dir.path(), FormConfig::default()).unwrap();

        let mut session = workspace.load_session().unwrap().with_ids(SequentialIds::new("w"));
        let first = session.add_element(FieldKind::Textbox).unwrap();
        session.add_element(FieldKind::Email).unwrap();
        session.undo();
        session.select(first.clone());
        workspace.save_session(&session).unwrap();

        let loaded = Workspace::open(temp_dir.path()).unwrap().load_session().unwrap();
        assert_eq!(loaded.history().cursor(), 1);
        assert_eq!(loaded.history().len(), 3);
        assert!(loaded.can_redo());
        assert_eq!(loaded.selection().selected_id(), Some(first.as_str()));
        assert_eq!(loaded.form_config(), session.form_config());
    }

    #[test]
    fn test_external_edit_is_committed() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::init(temp_dir.path(), FormConfig::default()).unwrap();
        let mut session = workspace.load_session().unwrap();
        session.add_element(FieldKind::Textbox).unwrap();
        workspace.save_session(&session).unwrap();

        let mut edited = session.form_config();
        let first = edited.elements.ids()[0].to_string();
        edited.elements = edited.elements.remove(&first);
        write_json(&temp_dir.path().join(FORM_FILE), &edited).unwrap();

        let loaded = workspace.load_session().unwrap();
        assert!(loaded.elements().is_empty());
        assert_eq!(loaded.history().current().description, "External edit");
        assert_eq!(loaded.selection().selected_id(), None);
    }

    #[test]
    fn test_missing_history_starts_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::init(temp_dir.path(), FormConfig::default()).unwrap();
        fs::remove_file(temp_dir.path().join(HISTORY_FILE)).unwrap();

        let loaded = workspace.load_session().unwrap();
        assert_eq!(loaded.history().len(), 1);
        assert!(!loaded.can_undo());
    }
}
