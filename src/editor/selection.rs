//! Which element, if any, is open for editing.

use serde::{Deserialize, Serialize};

use crate::editor::collection::ElementCollection;
use crate::model::FormElement;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_id: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`. Callers pass ids taken from the current collection.
    #[must_use]
    pub fn select(self, id: impl Into<String>) -> Self {
        Self {
            selected_id: Some(id.into()),
        }
    }

    #[must_use]
    pub fn clear(self) -> Self {
        Self { selected_id: None }
    }

    /// Drop a selection whose element is no longer in `collection`.
    #[must_use]
    pub fn reconcile(self, collection: &ElementCollection) -> Self {
        match &self.selected_id {
            Some(id) if !collection.contains(id) => {
                tracing::debug!(id = %id, "selected element is gone, clearing selection");
                self.clear()
            }
            _ => self,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }

    pub fn selected_element<'a>(&self, collection: &'a ElementCollection) -> Option<&'a FormElement> {
        self.selected_id.as_deref().and_then(|id| collection.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementSettings, FieldKind};

    fn items(ids: &[&str]) -> ElementCollection {
        ElementCollection::from_elements(
            ids.iter()
                .map(|id| FormElement::new(*id, FieldKind::Checkbox, ElementSettings::new(*id, *id)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_select_and_clear() {
        let state = SelectionState::new().select("a");
        assert_eq!(state.selected_id(), Some("a"));
        assert!(state.is_selected("a"));

        let state = state.clear();
        assert_eq!(state.selected_id(), None);
    }

    #[test]
    fn test_select_does_not_check_existence() {
        let state = SelectionState::new().select("ghost");
        assert_eq!(state.selected_id(), Some("ghost"));
    }

    #[test]
    fn test_reconcile_clears_removed_selection() {
        let collection = items(&["a", "b"]);
        let state = SelectionState::new().select("b");

        let kept = state.clone().reconcile(&collection);
        assert_eq!(kept, state);

        let removed = collection.remove("b");
        let state = state.reconcile(&removed);
        assert_eq!(state.selected_id(), None);
    }

    #[test]
    fn test_reconcile_empty_selection_is_unchanged() {
        let state = SelectionState::new().reconcile(&items(&[]));
        assert_eq!(state, SelectionState::new());
    }

    #[test]
    fn test_selected_element_lookup() {
        let collection = items(&["a", "b"]);
        let state = SelectionState::new().select("b");
        assert_eq!(state.selected_element(&collection).map(|e| e.id.as_str()), Some("b"));
        assert!(SelectionState::new().selected_element(&collection).is_none());
    }
}
