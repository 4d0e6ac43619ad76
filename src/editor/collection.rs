//! Ordered element collection and its edit operations.
//!
//! Every operation borrows the collection and returns a new one; the input
//! is never touched. Order drives grid placement, so it is preserved by
//! everything except [`ElementCollection::reorder`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};
use crate::id::IdGenerator;
use crate::model::{FormElement, SettingsPatch};

/// Suffix appended to a duplicated element's `name`.
pub const COPY_NAME_SUFFIX: &str = "_copy";

/// Suffix appended to a duplicated element's `label`.
pub const COPY_LABEL_SUFFIX: &str = " (Copy)";

/// An ordered list of form elements with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ElementCollection {
    elements: Vec<FormElement>,
}

impl ElementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from existing elements, rejecting repeated ids.
    pub fn from_elements(elements: Vec<FormElement>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(elements.len());
        for element in &elements {
            if !seen.insert(element.id.as_str()) {
                return Err(FormError::DuplicateId {
                    id: element.id.clone(),
                });
            }
        }
        Ok(Self { elements })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FormElement> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[FormElement] {
        &self.elements
    }

    pub fn get(&self, id: &str) -> Option<&FormElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.id.as_str()).collect()
    }

    /// Insert `element` at the end.
    pub fn append(&self, element: FormElement) -> Result<Self> {
        if self.contains(&element.id) {
            return Err(FormError::DuplicateId { id: element.id });
        }
        let mut elements = self.elements.clone();
        elements.push(element);
        Ok(Self { elements })
    }

    /// Drop the element with `id`. Unknown ids return an equal collection.
    pub fn remove(&self, id: &str) -> Self {
        Self {
            elements: self
                .elements
                .iter()
                .filter(|e| e.id != id)
                .cloned()
                .collect(),
        }
    }

    /// Move the element at `from` to `to`, shifting the ones in between.
    pub fn reorder(&self, from: usize, to: usize) -> Result<Self> {
        let len = self.len();
        for index in [from, to] {
            if index >= len {
                return Err(FormError::IndexOutOfRange { index, len });
            }
        }
        let mut elements = self.elements.clone();
        let moved = elements.remove(from);
        elements.insert(to, moved);
        Ok(Self { elements })
    }

    /// Shallow-merge `patch` into the settings of the element with `id`.
    /// Unknown ids return an equal collection.
    pub fn update_settings(&self, id: &str, patch: &SettingsPatch) -> Self {
        let mut elements = self.elements.clone();
        if let Some(element) = elements.iter_mut().find(|e| e.id == id) {
            element.settings.merge(patch);
        }
        Self { elements }
    }

    /// Append a copy of the element with `id` under a fresh id.
    ///
    /// The copy's `name` and `label` get [`COPY_NAME_SUFFIX`] and
    /// [`COPY_LABEL_SUFFIX`]. Returns the new collection and the new id.
    pub fn duplicate(&self, id: &str, ids: &mut dyn IdGenerator) -> Result<(Self, String)> {
        let original = self.get(id).ok_or_else(|| FormError::NotFound {
            id: id.to_string(),
        })?;

        let mut copy = original.clone();
        copy.id = ids.generate();
        copy.settings.name.push_str(COPY_NAME_SUFFIX);
        copy.settings.label.push_str(COPY_LABEL_SUFFIX);

        let new_id = copy.id.clone();
        let collection = self.append(copy)?;
        Ok((collection, new_id))
    }
}

impl<'de> Deserialize<'de> for ElementCollection {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let elements = Vec::<FormElement>::deserialize(deserializer)?;
        ElementCollection::from_elements(elements).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a ElementCollection {
    type Item = &'a FormElement;
    type IntoIter = std::slice::Iter<'a, FormElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
