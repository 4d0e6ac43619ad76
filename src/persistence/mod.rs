//! Form Persistence
//!
//! Stores receive a whole form on first save and a partial update
//! afterwards. A rejected call surfaces as [`FormError::Persistence`] and
//! never touches the editing state that asked for it.
//!
//! [`FormError::Persistence`]: crate::error::FormError::Persistence

pub mod file;
#[cfg(feature = "http-store")]
pub mod http;

use serde::Serialize;

use crate::editor::ElementCollection;
use crate::error::Result;
use crate::model::{FormConfig, FormPatch, FormSettings};

pub use file::{JsonFileStore, StoredForm};
#[cfg(feature = "http-store")]
pub use http::HttpFormStore;

/// Where saved forms live.
pub trait FormStore {
    /// Store a form that has no id yet; the returned form carries the
    /// assigned id.
    fn create(&mut self, form: &FormConfig) -> Result<FormConfig>;

    /// Apply `patch` to the stored form `id` and return the result.
    fn update(&mut self, id: &str, patch: &FormPatch) -> Result<FormConfig>;

    /// Fetch the stored form `id`.
    fn load(&mut self, id: &str) -> Result<FormConfig>;
}

/// Body of a create call: a form without its id.
#[derive(Debug, Serialize)]
pub struct NewForm<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub elements: &'a ElementCollection,
    pub settings: &'a FormSettings,
}

impl<'a> From<&'a FormConfig> for NewForm<'a> {
    fn from(form: &'a FormConfig) -> Self {
        Self {
            name: &form.name,
            description: form.description.as_deref(),
            elements: &form.elements,
            settings: &form.settings,
        }
    }
}
