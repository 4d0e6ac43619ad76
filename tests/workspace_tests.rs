//! Workspace Integration Tests
//!
//! Sessions saved to a workspace directory and reopened.

use formkit::config::{EditorConfig, CONFIG_FILE};
use formkit::editor::DEFAULT_HISTORY_CAPACITY;
use formkit::id::SequentialIds;
use formkit::model::{FieldKind, FormConfig};
use formkit::workspace::{Workspace, FORM_FILE, HISTORY_FILE, SESSION_FILE};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn create_workspace() -> (TempDir, Workspace) {
    let temp_dir = TempDir::new().unwrap();
    let workspace = Workspace::init(temp_dir.path(), FormConfig::default()).unwrap();
    (temp_dir, workspace)
}

#[test]
fn test_init_writes_layout() {
    let (temp_dir, workspace) = create_workspace();
    for file in [FORM_FILE, HISTORY_FILE, SESSION_FILE] {
        assert!(temp_dir.path().join(file).exists(), "missing {}", file);
    }
    assert_eq!(workspace.config().history_capacity, DEFAULT_HISTORY_CAPACITY);
}

#[test]
fn test_history_survives_reopen() {
    let (temp_dir, workspace) = create_workspace();
    let mut session = workspace
        .load_session()
        .unwrap()
        .with_ids(SequentialIds::new("ws"));

    let name = session.add_element(FieldKind::Textbox).unwrap();
    let email = session.add_element(FieldKind::Email).unwrap();
    let patch = json!({"label": "Work email"}).as_object().cloned().unwrap();
    session.update_settings(&email, &patch);
    session.undo();
    session.select(name.clone());
    workspace.save_session(&session).unwrap();

    let reopened = Workspace::open(temp_dir.path()).unwrap();
    let mut loaded = reopened.load_session().unwrap();
    assert_eq!(loaded.history().len(), 4);
    assert_eq!(loaded.history().cursor(), 2);
    assert_eq!(loaded.selection().selected_id(), Some(name.as_str()));
    assert_eq!(loaded.elements().get(&email).unwrap().label(), "Email");

    assert!(loaded.redo());
    assert_eq!(loaded.elements().get(&email).unwrap().label(), "Work email");
}

#[test]
fn test_configured_capacity_trims_loaded_history() {
    let (temp_dir, workspace) = create_workspace();
    let mut session = workspace
        .load_session()
        .unwrap()
        .with_ids(SequentialIds::new("ws"));
    for _ in 0..6 {
        session.add_element(FieldKind::Checkbox).unwrap();
    }
    workspace.save_session(&session).unwrap();

    EditorConfig {
        history_capacity: 3,
        ..EditorConfig::default()
    }
    .save(temp_dir.path())
    .unwrap();
    assert!(temp_dir.path().join(CONFIG_FILE).exists());

    let loaded = Workspace::open(temp_dir.path()).unwrap().load_session().unwrap();
    assert_eq!(loaded.history().len(), 3);
    assert_eq!(loaded.history().capacity(), 3);
    assert_eq!(loaded.elements().len(), 6);
}

#[test]
fn test_shrinking_capacity_keeps_undone_state() {
    let (temp_dir, workspace) = create_workspace();
    let mut session = workspace
        .load_session()
        .unwrap()
        .with_ids(SequentialIds::new("ws"));
    for _ in 0..6 {
        session.add_element(FieldKind::Radio).unwrap();
    }
    for _ in 0..4 {
        session.undo();
    }
    assert_eq!(session.elements().len(), 2);
    workspace.save_session(&session).unwrap();

    EditorConfig {
        history_capacity: 2,
        ..EditorConfig::default()
    }
    .save(temp_dir.path())
    .unwrap();

    let loaded = Workspace::open(temp_dir.path()).unwrap().load_session().unwrap();
    assert_eq!(loaded.elements().len(), 2);
    assert_eq!(loaded.history().len(), 2);
    assert_eq!(loaded.history().cursor(), 0);
    assert_ne!(loaded.history().current().description, "External edit");
    assert!(loaded.can_redo());
}

#[test]
fn test_corrupt_history_is_reported() {
    let (temp_dir, workspace) = create_workspace();
    std::fs::write(
        temp_dir.path().join(HISTORY_FILE),
        r#"{"snapshots":[],"cursor":0,"capacity":50}"#,
    )
    .unwrap();

    let err = workspace.load_session().unwrap_err();
    assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
}
