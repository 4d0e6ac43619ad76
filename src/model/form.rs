//! Form definitions as handed to hosts and stores.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::editor::ElementCollection;
use crate::error::Result;
use crate::model::element::LabelPosition;

/// Id carried by a form that has never been saved.
pub const DEFAULT_FORM_ID: &str = "default";

/// Name given to new forms.
pub const DEFAULT_FORM_NAME: &str = "New Form";

/// Horizontal placement of the submit button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonPosition {
    Left,
    Center,
    #[default]
    Right,
}

/// When the preview runs field validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    #[default]
    OnChange,
    OnBlur,
    OnSubmit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitButton {
    pub text: String,
    pub position: ButtonPosition,
}

impl Default for SubmitButton {
    fn default() -> Self {
        Self {
            text: "Submit".to_string(),
            position: ButtonPosition::Right,
        }
    }
}

/// Form-wide layout and behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    #[serde(default)]
    pub label_position: LabelPosition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_button: Option<SubmitButton>,

    #[serde(default)]
    pub validation_mode: ValidationMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_gap: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_border: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            label_position: LabelPosition::Top,
            submit_button: Some(SubmitButton::default()),
            validation_mode: ValidationMode::OnChange,
            grid_gap: None,
            show_border: None,
            background_color: None,
        }
    }
}

/// A complete form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub elements: ElementCollection,

    #[serde(default)]
    pub settings: FormSettings,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_FORM_ID.to_string(),
            name: DEFAULT_FORM_NAME.to_string(),
            description: None,
            elements: ElementCollection::new(),
            settings: FormSettings::default(),
        }
    }
}

impl FormConfig {
    /// True until a store has assigned a real id.
    pub fn is_unsaved(&self) -> bool {
        self.id == DEFAULT_FORM_ID || self.id.is_empty()
    }

    /// SHA-256 over the serialized definition, hex encoded.
    ///
    /// Two forms with equal fingerprints serialize identically, which is
    /// what a host compares to decide whether there are unsaved changes.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// Every field of this form as a partial update.
    pub fn to_patch(&self) -> FormPatch {
        FormPatch {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            elements: Some(self.elements.clone()),
            settings: Some(self.settings.clone()),
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &FormPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(elements) = &patch.elements {
            self.elements = elements.clone();
        }
        if let Some(settings) = &patch.settings {
            self.settings = settings.clone();
        }
    }
}

/// Partial form definition sent on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `Some(None)` clears the description; `None` leaves it alone.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "nullable"
    )]
    pub description: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<ElementCollection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<FormSettings>,
}

/// Serde adapter telling an absent key apart from an explicit `null`.
mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_default_form_json_shape() {
        let form = FormConfig::default();
        assert_eq!(
            serde_json::to_value(&form).unwrap(),
            json!({
                "id": "default",
                "name": "New Form",
                "elements": [],
                "settings": {
                    "labelPosition": "top",
                    "submitButton": {"text": "Submit", "position": "right"},
                    "validationMode": "onChange"
                }
            })
        );
        assert!(form.is_unsaved());
    }

    #[test]
    fn test_minimal_form_deserializes() {
        let form: FormConfig = serde_json::from_value(json!({
            "id": "test-form",
            "name": "Test Form",
            "elements": [],
            "settings": {"labelPosition": "left", "validationMode": "onBlur"}
        }))
        .unwrap();
        assert_eq!(form.settings.label_position, LabelPosition::Left);
        assert_eq!(form.settings.validation_mode, ValidationMode::OnBlur);
        assert!(form.settings.submit_button.is_none());
        assert!(!form.is_unsaved());
    }

    #[test]
    fn test_fingerprint_tracks_changes() {
        let mut form = FormConfig::default();
        let before = form.fingerprint().unwrap();
        assert_eq!(before.len(), 64);
        assert_eq!(before, form.clone().fingerprint().unwrap());

        form.name = "Signup".to_string();
        assert_ne!(before, form.fingerprint().unwrap());
    }

    #[test]
    fn test_apply_patch() {
        let mut form = FormConfig::default();
        form.apply(&FormPatch {
            name: Some("Survey".to_string()),
            description: Some(Some("Quarterly".to_string())),
            ..FormPatch::default()
        });
        assert_eq!(form.name, "Survey");
        assert_eq!(form.description.as_deref(), Some("Quarterly"));
        assert!(form.elements.is_empty());

        form.apply(&FormPatch::default());
        assert_eq!(form.description.as_deref(), Some("Quarterly"));

        form.apply(&FormPatch {
            description: Some(None),
            ..FormPatch::default()
        });
        assert_eq!(form.description, None);
    }

    #[test]
    fn test_patch_json_distinguishes_clear_from_absent() {
        let clear = FormPatch {
            description: Some(None),
            ..FormPatch::default()
        };
        assert_eq!(serde_json::to_value(&clear).unwrap(), json!({"description": null}));
        assert_eq!(serde_json::to_value(FormPatch::default()).unwrap(), json!({}));

        let parsed: FormPatch = serde_json::from_value(json!({"description": null})).unwrap();
        assert_eq!(parsed.description, Some(None));
        let parsed: FormPatch = serde_json::from_value(json!({"name": "X"})).unwrap();
        assert_eq!(parsed.description, None);
    }
}
