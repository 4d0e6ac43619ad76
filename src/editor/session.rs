//! Editor Session
//!
//! Owns the editing state of one form: its metadata, the snapshot history
//! and the selection. Every edit intent runs a collection operation, commits
//! the result, reconciles the selection and tells the change sinks.

use std::fmt;
use std::mem;

use serde::{Deserialize, Serialize};

use crate::editor::collection::ElementCollection;
use crate::editor::history::{HistoryStore, Snapshot, DEFAULT_HISTORY_CAPACITY};
use crate::editor::selection::SelectionState;
use crate::error::Result;
use crate::id::{IdGenerator, UuidGenerator};
use crate::model::{FieldKind, FormConfig, FormElement, FormSettings, SettingsPatch};
use crate::persistence::FormStore;

/// Receives the full form definition after every visible change.
pub trait ChangeSink {
    fn form_changed(&mut self, form: &FormConfig);
}

impl<F> ChangeSink for F
where
    F: FnMut(&FormConfig),
{
    fn form_changed(&mut self, form: &FormConfig) {
        self(form)
    }
}

/// Everything about a form except its elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub settings: FormSettings,
}

impl From<&FormConfig> for FormInfo {
    fn from(form: &FormConfig) -> Self {
        Self {
            id: form.id.clone(),
            name: form.name.clone(),
            description: form.description.clone(),
            settings: form.settings.clone(),
        }
    }
}

/// The host-side owner of a form being edited.
pub struct EditorSession {
    info: FormInfo,
    history: HistoryStore<Snapshot>,
    selection: SelectionState,
    ids: Box<dyn IdGenerator>,
    sinks: Vec<Box<dyn ChangeSink>>,
    saved_fingerprint: Option<String>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("info", &self.info)
            .field("elements", &self.elements().len())
            .field("cursor", &self.history.cursor())
            .field("selection", &self.selection)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// An empty, unsaved form.
    pub fn new() -> Self {
        Self::from_form(FormConfig::default())
    }

    /// Start editing `form`; its elements become the initial snapshot.
    pub fn from_form(form: FormConfig) -> Self {
        Self::with_capacity(form, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(form: FormConfig, capacity: usize) -> Self {
        let info = FormInfo::from(&form);
        let history = HistoryStore::with_capacity(Snapshot::initial(form.elements), capacity);
        Self::restore(info, history, SelectionState::new())
    }

    /// Rebuild a session from previously saved parts. A selection that
    /// points at an element missing from the current snapshot is dropped.
    pub fn restore(info: FormInfo, history: HistoryStore<Snapshot>, selection: SelectionState) -> Self {
        let selection = selection.reconcile(&history.current().elements);
        Self {
            info,
            history,
            selection,
            ids: Box::new(UuidGenerator),
            sinks: Vec::new(),
            saved_fingerprint: None,
        }
    }

    /// Replace the id generator used for new and duplicated elements.
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Treat the current form as the stored one.
    pub fn with_saved_fingerprint(mut self, fingerprint: Option<String>) -> Self {
        self.saved_fingerprint = fingerprint;
        self
    }

    pub fn subscribe(&mut self, sink: impl ChangeSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn info(&self) -> &FormInfo {
        &self.info
    }

    /// Elements of the visible snapshot.
    pub fn elements(&self) -> &ElementCollection {
        &self.history.current().elements
    }

    pub fn history(&self) -> &HistoryStore<Snapshot> {
        &self.history
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selected_element(&self) -> Option<&FormElement> {
        self.selection.selected_element(self.elements())
    }

    pub fn saved_fingerprint(&self) -> Option<&str> {
        self.saved_fingerprint.as_deref()
    }

    /// The full definition of the form as it is now.
    pub fn form_config(&self) -> FormConfig {
        FormConfig {
            id: self.info.id.clone(),
            name: self.info.name.clone(),
            description: self.info.description.clone(),
            elements: self.elements().clone(),
            settings: self.info.settings.clone(),
        }
    }

    /// True when the form differs from what was last saved or loaded.
    pub fn has_unsaved_changes(&self) -> Result<bool> {
        match &self.saved_fingerprint {
            Some(saved) => Ok(*saved != self.form_config().fingerprint()?),
            None => Ok(true),
        }
    }

    /// Drop a new element of `kind` at the end and select it.
    pub fn add_element(&mut self, kind: FieldKind) -> Result<String> {
        let id = self.ids.generate();
        let element = FormElement::from_kind(kind, id.clone());
        let elements = self.elements().append(element)?;
        self.commit(elements, format!("Add {}", kind.spec().label));
        self.selection = mem::take(&mut self.selection).select(id.clone());
        Ok(id)
    }

    /// Append a ready-made element.
    pub fn append(&mut self, element: FormElement) -> Result<()> {
        let description = format!("Add {}", element.label());
        let elements = self.elements().append(element)?;
        self.commit(elements, description);
        Ok(())
    }

    /// Remove the element with `id`. Returns whether anything changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let description = self.describe_edit("Remove", id);
        let elements = self.elements().remove(id);
        self.commit(elements, description)
    }

    /// Move the element at `from` to `to`. Returns whether anything changed.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool> {
        let elements = self.elements().reorder(from, to)?;
        let description = match self.elements().as_slice().get(from) {
            Some(element) => format!("Move {}", element.label()),
            None => "Move element".to_string(),
        };
        Ok(self.commit(elements, description))
    }

    /// Merge `patch` into the settings of `id`. Returns whether anything
    /// changed.
    pub fn update_settings(&mut self, id: &str, patch: &SettingsPatch) -> bool {
        let description = self.describe_edit("Update", id);
        let elements = self.elements().update_settings(id, patch);
        self.commit(elements, description)
    }

    /// Append a copy of `id` and return the copy's id. The selection is
    /// left alone.
    pub fn duplicate(&mut self, id: &str) -> Result<String> {
        let description = self.describe_edit("Duplicate", id);
        let (elements, new_id) = self
            .history
            .current()
            .elements
            .duplicate(id, self.ids.as_mut())?;
        self.commit(elements, description);
        Ok(new_id)
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selection = mem::take(&mut self.selection).select(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection = mem::take(&mut self.selection).clear();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one snapshot. Returns false at the oldest one.
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        tracing::debug!(description = %self.history.current().description, "undo");
        self.step_history(HistoryStore::undo);
        self.after_change();
        true
    }

    /// Step forward one snapshot. Returns false at the newest one.
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        self.step_history(HistoryStore::redo);
        tracing::debug!(description = %self.history.current().description, "redo");
        self.after_change();
        true
    }

    /// Change the form name and description. Not recorded in history.
    pub fn set_form_info(&mut self, name: impl Into<String>, description: Option<String>) {
        let name = name.into();
        if self.info.name == name && self.info.description == description {
            return;
        }
        self.info.name = name;
        self.info.description = description;
        self.notify();
    }

    /// Replace the form-wide settings. Not recorded in history.
    pub fn set_form_settings(&mut self, settings: FormSettings) {
        if self.info.settings == settings {
            return;
        }
        self.info.settings = settings;
        self.notify();
    }

    /// Persist the form through `store`.
    ///
    /// Unsaved forms are created, saved ones updated. On success the session
    /// adopts the metadata the store returned; on failure nothing changes.
    pub fn save(&mut self, store: &mut dyn FormStore) -> Result<FormConfig> {
        let form = self.form_config();
        let saved = if form.is_unsaved() {
            store.create(&form)?
        } else {
            store.update(&form.id, &form.to_patch())?
        };

        tracing::info!(id = %saved.id, elements = saved.elements.len(), "form saved");
        self.info = FormInfo::from(&saved);
        self.saved_fingerprint = Some(self.form_config().fingerprint()?);
        Ok(saved)
    }

    fn describe_edit(&self, verb: &str, id: &str) -> String {
        match self.elements().get(id) {
            Some(element) => format!("{} {}", verb, element.label()),
            None => format!("{} {}", verb, id),
        }
    }

    /// Commit `elements` unless they equal the visible snapshot.
    fn commit(&mut self, elements: ElementCollection, description: String) -> bool {
        if elements == *self.elements() {
            tracing::debug!(%description, "edit left the form unchanged");
            return false;
        }
        tracing::debug!(%description, elements = elements.len(), "commit");
        let snapshot = Snapshot::new(elements, description);
        self.step_history(|history| history.commit(snapshot));
        self.after_change();
        true
    }

    fn step_history(&mut self, step: impl FnOnce(HistoryStore<Snapshot>) -> HistoryStore<Snapshot>) {
        let placeholder = HistoryStore::with_capacity(Snapshot::initial(ElementCollection::new()), 1);
        let history = mem::replace(&mut self.history, placeholder);
        self.history = step(history);
    }

    fn after_change(&mut self) {
        let current = &self.history.current().elements;
        self.selection = mem::take(&mut self.selection).reconcile(current);
        self.notify();
    }

    fn notify(&mut self) {
        if self.sinks.is_empty() {
            return;
        }
        let form = self.form_config();
        for sink in &mut self.sinks {
            sink.form_changed(&form);
        }
    }
}
