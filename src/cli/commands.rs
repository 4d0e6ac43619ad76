//! CLI Command Implementations
//!
//! Each edit command loads the workspace session, applies one intent and
//! writes the session back.

use std::path::Path;

use log::{info, warn};
use serde_json::Value;

use crate::editor::EditorSession;
use crate::error::{FormError, Result};
use crate::fields::palette;
use crate::model::{FieldKind, FormConfig, SettingsPatch};
use crate::persistence::{FormStore, JsonFileStore};
use crate::preview::{Preview, SubmittedValues};
use crate::workspace::Workspace;

/// Load the session, run `edit`, save the session.
fn with_session<T>(path: &Path, edit: impl FnOnce(&mut EditorSession) -> Result<T>) -> Result<T> {
    let workspace = Workspace::open(path)?;
    let mut session = workspace.load_session()?;
    let result = edit(&mut session)?;
    workspace.save_session(&session)?;
    Ok(result)
}

/// Parse `key=value`; the value is read as JSON and falls back to a string.
pub fn parse_setting(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw.split_once('=').ok_or_else(|| FormError::InvalidArgument {
        reason: format!("expected key=value, got '{}'", raw),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(FormError::InvalidArgument {
            reason: format!("missing setting name in '{}'", raw),
        });
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Create a new workspace.
pub fn init(path: &Path, name: Option<&str>, description: Option<&str>) -> Result<()> {
    info!("Creating workspace at: {}", path.display());

    let mut form = FormConfig::default();
    if let Some(name) = name {
        form.name = name.to_string();
    }
    form.description = description.map(str::to_string);

    let workspace = Workspace::init(path, form)?;
    println!("Workspace created: {}", workspace.path().display());
    Ok(())
}

/// Print the field palette.
pub fn show_palette() -> Result<()> {
    println!("{:<16} {:<16} DESCRIPTION", "KIND", "LABEL");
    for spec in palette() {
        println!("{:<16} {:<16} {}", spec.kind, spec.label, spec.description);
    }
    Ok(())
}

/// Add a field of `kind` and select it.
pub fn add(path: &Path, kind: &str) -> Result<()> {
    let kind: FieldKind = kind.parse()?;
    info!("Adding {} to: {}", kind, path.display());

    let id = with_session(path, |session| session.add_element(kind))?;
    println!("Added {}: {}", kind, id);
    Ok(())
}

pub fn remove(path: &Path, id: &str) -> Result<()> {
    info!("Removing {} from: {}", id, path.display());

    if with_session(path, |session| Ok(session.remove(id)))? {
        println!("Removed: {}", id);
    } else {
        warn!("No element with id {}", id);
        println!("Nothing to remove.");
    }
    Ok(())
}

/// Move the element at `from` to `to`.
pub fn move_element(path: &Path, from: usize, to: usize) -> Result<()> {
    info!("Moving element {} -> {} in: {}", from, to, path.display());

    if with_session(path, |session| session.reorder(from, to))? {
        println!("Moved element {} to position {}", from, to);
    } else {
        println!("Nothing to move.");
    }
    Ok(())
}

/// Merge `key=value` settings into an element.
pub fn set(path: &Path, id: &str, settings: &[String]) -> Result<()> {
    let patch = settings
        .iter()
        .map(|raw| parse_setting(raw))
        .collect::<Result<SettingsPatch>>()?;
    info!("Updating {} settings of {} in: {}", patch.len(), id, path.display());

    if with_session(path, |session| Ok(session.update_settings(id, &patch)))? {
        println!("Updated: {}", id);
    } else {
        println!("No changes.");
    }
    Ok(())
}

pub fn duplicate(path: &Path, id: &str) -> Result<()> {
    info!("Duplicating {} in: {}", id, path.display());

    let copy = with_session(path, |session| session.duplicate(id))?;
    println!("Duplicated {} as {}", id, copy);
    Ok(())
}

/// Select `id`, or clear the selection when `id` is `None`.
pub fn select(path: &Path, id: Option<&str>) -> Result<()> {
    with_session(path, |session| {
        match id {
            Some(id) => {
                if !session.elements().contains(id) {
                    return Err(FormError::NotFound { id: id.to_string() });
                }
                session.select(id);
            }
            None => session.clear_selection(),
        }
        Ok(())
    })?;

    match id {
        Some(id) => println!("Selected: {}", id),
        None => println!("Selection cleared."),
    }
    Ok(())
}

pub fn rename(path: &Path, name: &str, description: Option<&str>) -> Result<()> {
    info!("Renaming form in: {}", path.display());

    with_session(path, |session| {
        let description = description
            .map(str::to_string)
            .or_else(|| session.info().description.clone());
        session.set_form_info(name, description);
        Ok(())
    })?;
    println!("Form renamed: {}", name);
    Ok(())
}

/// Undo the last edit.
pub fn undo(path: &Path) -> Result<()> {
    info!("Undoing last edit in: {}", path.display());

    let undone = with_session(path, |session| {
        let description = session.history().current().description.clone();
        Ok(session.undo().then_some(description))
    })?;

    match undone {
        Some(description) => println!("Undone: {}", description),
        None => println!("Nothing to undo."),
    }
    Ok(())
}

/// Redo the last undone edit.
pub fn redo(path: &Path) -> Result<()> {
    info!("Redoing last undone edit in: {}", path.display());

    let redone = with_session(path, |session| {
        let redone = session.redo();
        Ok(redone.then(|| session.history().current().description.clone()))
    })?;

    match redone {
        Some(description) => println!("Redone: {}", description),
        None => println!("Nothing to redo."),
    }
    Ok(())
}

/// Show edit history.
pub fn show_history(path: &Path) -> Result<()> {
    info!("Showing history for: {}", path.display());

    let session = Workspace::open(path)?.load_session()?;
    let history = session.history();

    println!("Edit History:");
    println!("{:-<60}", "");

    for (i, snapshot) in history.snapshots().iter().enumerate() {
        let marker = if i == history.cursor() { ">>> " } else { "    " };
        println!(
            "{}{}: {} [{} elements] ({})",
            marker,
            i,
            snapshot.description,
            snapshot.elements.len(),
            snapshot.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }

    println!("{:-<60}", "");
    println!(
        "Undo: {} | Redo: {} | Capacity: {} | Evicted: {}",
        history.cursor(),
        history.len() - history.cursor() - 1,
        history.capacity(),
        history.evicted()
    );

    Ok(())
}

/// Print the current form definition.
pub fn print_form(path: &Path, inputs: bool) -> Result<()> {
    let session = Workspace::open(path)?.load_session()?;
    let form = session.form_config();

    let json = if inputs {
        serde_json::to_string_pretty(&Preview::new(&form)?.inputs())?
    } else {
        serde_json::to_string_pretty(&form)?
    };
    println!("{}", json);

    if let Some(selected) = session.selection().selected_id() {
        println!("\nSelected: {}", selected);
    }
    if session.has_unsaved_changes()? {
        println!("Unsaved changes.");
    }

    Ok(())
}

/// Validate `values` against the form and print the submitted data.
pub fn submit(path: &Path, values: &str) -> Result<()> {
    let values: SubmittedValues = match serde_json::from_str::<Value>(values)? {
        Value::Object(map) => map,
        other => {
            return Err(FormError::InvalidArgument {
                reason: format!("values must be a JSON object, got {}", other),
            })
        }
    };

    let session = Workspace::open(path)?.load_session()?;
    let form = session.form_config();
    let preview = Preview::new(&form)?;

    let mut log_submission = |data: &SubmittedValues| {
        info!("Form {} submitted with {} fields", form.id, data.len());
    };
    match preview.submit(&values, &mut log_submission) {
        Ok(data) => {
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        Err(FormError::Validation { errors }) => {
            for error in &errors {
                println!("  {}", error);
            }
            Err(FormError::Validation { errors })
        }
        Err(e) => Err(e),
    }
}

#[cfg(feature = "http-store")]
fn remote_store(url: &str) -> Result<Option<Box<dyn FormStore>>> {
    info!("Using form API at {}", url);
    Ok(Some(Box::new(crate::persistence::HttpFormStore::new(url)?)))
}

#[cfg(not(feature = "http-store"))]
fn remote_store(url: &str) -> Result<Option<Box<dyn FormStore>>> {
    warn!("Ignoring form API {}: built without the http-store feature", url);
    Ok(None)
}

fn open_store(workspace: &Workspace) -> Result<Box<dyn FormStore>> {
    let config = workspace.config();
    if let Some(url) = &config.api_base_url {
        if let Some(store) = remote_store(url)? {
            return Ok(store);
        }
    }
    Ok(Box::new(JsonFileStore::new(config.store_path(workspace.path()))))
}

/// Save the form to the configured store.
pub fn save(path: &Path) -> Result<()> {
    info!("Saving form from: {}", path.display());

    let workspace = Workspace::open(path)?;
    let mut session = workspace.load_session()?;
    let mut store = open_store(&workspace)?;

    let saved = session.save(store.as_mut())?;
    workspace.save_session(&session)?;

    println!("Form saved: {} ({})", saved.name, saved.id);
    Ok(())
}

/// List forms in the file store.
pub fn list_forms(path: &Path) -> Result<()> {
    let workspace = Workspace::open(path)?;
    let store = JsonFileStore::new(workspace.config().store_path(workspace.path()));
    let forms = store.list()?;

    if forms.is_empty() {
        println!("No saved forms in {}", store.dir().display());
        return Ok(());
    }

    for form in forms {
        println!(
            "{}  {} [{} elements] ({})",
            form.id,
            form.name,
            form.elements,
            form.modified_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_setting() {
        assert_eq!(
            parse_setting("cols=6").unwrap(),
            ("cols".to_string(), json!(6))
        );
        assert_eq!(
            parse_setting("label=Full name").unwrap(),
            ("label".to_string(), json!("Full name"))
        );
        assert_eq!(
            parse_setting("validation={\"required\":true}").unwrap(),
            ("validation".to_string(), json!({"required": true}))
        );
        assert_eq!(
            parse_setting("placeholder=").unwrap(),
            ("placeholder".to_string(), json!(""))
        );
        assert!(parse_setting("label").is_err());
        assert!(parse_setting("=x").is_err());
    }

    #[test]
    fn test_edit_commands_persist() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path();
        init(path, Some("Contact"), None).unwrap();
        add(path, "email").unwrap();
        add(path, "textbox").unwrap();

        let session = Workspace::open(path).unwrap().load_session().unwrap();
        let ids: Vec<String> = session.elements().ids().iter().map(|s| s.to_string()).collect();
        assert_eq!(session.info().name, "Contact");
        assert_eq!(ids.len(), 2);

        move_element(path, 1, 0).unwrap();
        set(path, &ids[0], &["label=Work email".to_string()]).unwrap();
        undo(path).unwrap();

        let session = Workspace::open(path).unwrap().load_session().unwrap();
        assert_eq!(session.elements().ids(), vec![ids[1].as_str(), ids[0].as_str()]);
        assert_eq!(session.elements().get(&ids[0]).unwrap().label(), "Email");
        assert!(session.can_redo());
    }

    #[test]
    fn test_add_unknown_kind() {
        let temp_dir = TempDir::new().unwrap();
        init(temp_dir.path(), None, None).unwrap();
        let err = add(temp_dir.path(), "hologram").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_FIELD_KIND");
    }

    #[test]
    fn test_save_writes_to_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path();
        init(path, None, None).unwrap();
        add(path, "number").unwrap();
        save(path).unwrap();

        let session = Workspace::open(path).unwrap().load_session().unwrap();
        assert!(!session.form_config().is_unsaved());
        assert!(!session.has_unsaved_changes().unwrap());

        let store = JsonFileStore::new(path.join("forms"));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_select_unknown_id() {
        let temp_dir = TempDir::new().unwrap();
        init(temp_dir.path(), None, None).unwrap();
        let err = select(temp_dir.path(), Some("ghost")).unwrap_err();
        assert!(matches!(err, FormError::NotFound { .. }));
    }
}
