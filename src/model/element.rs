//! Form elements and their settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FormError, Result};

/// Partial settings applied by [`ElementSettings::merge`].
pub type SettingsPatch = Map<String, Value>;

/// The kinds of field a form can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Textbox,
    Multiline,
    Dropdown,
    SearchDropdown,
    Checkbox,
    Radio,
    Slider,
    Rating,
    FileUpload,
    Camera,
    Button,
    DatePicker,
    TimePicker,
    Email,
    Phone,
    Currency,
    Password,
    Number,
}

impl FieldKind {
    /// Every kind, in palette order.
    pub const ALL: [FieldKind; 18] = [
        FieldKind::Textbox,
        FieldKind::Multiline,
        FieldKind::Dropdown,
        FieldKind::SearchDropdown,
        FieldKind::Checkbox,
        FieldKind::Radio,
        FieldKind::Slider,
        FieldKind::Rating,
        FieldKind::FileUpload,
        FieldKind::Camera,
        FieldKind::Button,
        FieldKind::DatePicker,
        FieldKind::TimePicker,
        FieldKind::Email,
        FieldKind::Phone,
        FieldKind::Currency,
        FieldKind::Password,
        FieldKind::Number,
    ];

    /// Serialized name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Textbox => "textbox",
            FieldKind::Multiline => "multiline",
            FieldKind::Dropdown => "dropdown",
            FieldKind::SearchDropdown => "searchdropdown",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Slider => "slider",
            FieldKind::Rating => "rating",
            FieldKind::FileUpload => "fileupload",
            FieldKind::Camera => "camera",
            FieldKind::Button => "button",
            FieldKind::DatePicker => "datepicker",
            FieldKind::TimePicker => "timepicker",
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
            FieldKind::Currency => "currency",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| FormError::UnknownFieldKind {
                kind: s.to_string(),
            })
    }
}

/// Where a field's label is drawn relative to its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Top,
    Left,
}

/// One choice of a dropdown, radio or checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: None,
        }
    }
}

/// Declarative validation attached to a field under `settings.validation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Settings of a single element.
///
/// `name` and `label` are always present. Every other key is kind-specific
/// and kept as raw JSON so that unknown keys survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSettings {
    /// Data key used on submission.
    pub name: String,

    /// Text shown next to the input.
    pub label: String,

    /// Kind-specific keys (`placeholder`, `options`, `validation`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElementSettings {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            extra: Map::new(),
        }
    }

    /// Builder-style insert of a kind-specific key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Raw value of a kind-specific key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// True only when the key holds `true`.
    pub fn flag(&self, key: &str) -> bool {
        self.get_bool(key).unwrap_or(false)
    }

    pub fn label_position(&self) -> LabelPosition {
        self.get("labelPosition")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Grid span in a 12-column layout, clamped to `1..=12`.
    pub fn cols(&self) -> u8 {
        self.get("cols")
            .and_then(Value::as_u64)
            .map(|cols| cols.clamp(1, 12) as u8)
            .unwrap_or(12)
    }

    /// Parsed `options`, skipping malformed entries.
    pub fn options(&self) -> Vec<FieldOption> {
        match self.get("options") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(FieldOption::new(s.clone(), s.clone())),
                    other => serde_json::from_value(other.clone()).ok(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Parsed `validation`, if any. A malformed block reads as absent.
    pub fn validation(&self) -> Option<ValidationConfig> {
        self.get("validation")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn is_required(&self) -> bool {
        self.validation()
            .and_then(|v| v.required)
            .unwrap_or(false)
    }

    /// Shallow merge of `patch` into these settings.
    ///
    /// `name` and `label` only accept strings; a `null` removes an optional
    /// key. Returns true when anything changed.
    pub fn merge(&mut self, patch: &SettingsPatch) -> bool {
        let mut changed = false;
        for (key, value) in patch {
            match key.as_str() {
                "name" | "label" => {
                    let Some(text) = value.as_str() else {
                        tracing::warn!(key = %key, "ignoring non-string value for required setting");
                        continue;
                    };
                    let slot = if key == "name" {
                        &mut self.name
                    } else {
                        &mut self.label
                    };
                    if slot != text {
                        *slot = text.to_string();
                        changed = true;
                    }
                }
                _ if value.is_null() => {
                    changed |= self.extra.remove(key).is_some();
                }
                _ => {
                    if self.extra.get(key) != Some(value) {
                        self.extra.insert(key.clone(), value.clone());
                        changed = true;
                    }
                }
            }
        }
        changed
    }
}

/// One configurable field of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    /// Unique, immutable identifier.
    pub id: String,

    /// Field kind.
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Kind-specific settings.
    pub settings: ElementSettings,
}

impl FormElement {
    pub fn new(id: impl Into<String>, kind: FieldKind, settings: ElementSettings) -> Self {
        Self {
            id: id.into(),
            kind,
            settings,
        }
    }

    /// A freshly dropped element with the kind's default settings.
    ///
    /// The `name` is derived from the kind and every alphanumeric character
    /// of the id, so distinct ids never share a data key unless they differ
    /// only in punctuation.
    pub fn from_kind(kind: FieldKind, id: impl Into<String>) -> Self {
        let id = id.into();
        let suffix: String = id.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        let spec = kind.spec();
        let mut settings = ElementSettings::new(format!("{}_{}", kind, suffix), spec.label);
        (spec.defaults)(&mut settings.extra);
        Self::new(id, kind, settings)
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn label(&self) -> &str {
        &self.settings.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_kind_serializes_lowercase() {
        let json = serde_json::to_string(&FieldKind::SearchDropdown).unwrap();
        assert_eq!(json, "\"searchdropdown\"");
        let kind: FieldKind = serde_json::from_str("\"datepicker\"").unwrap();
        assert_eq!(kind, FieldKind::DatePicker);
    }

    #[test]
    fn test_field_kind_from_str() {
        assert_eq!("Email".parse::<FieldKind>().unwrap(), FieldKind::Email);
        let err = "text".parse::<FieldKind>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_FIELD_KIND");
    }

    #[test]
    fn test_settings_keep_unknown_keys() {
        let raw = json!({
            "name": "email",
            "label": "Email",
            "placeholder": "you@example.com",
            "somethingCustom": {"nested": true}
        });
        let settings: ElementSettings = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(settings.get_str("placeholder"), Some("you@example.com"));
        assert_eq!(serde_json::to_value(&settings).unwrap(), raw);
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut settings = ElementSettings::new("a", "A")
            .with("validation", json!({"required": true, "minLength": 2}));
        let patch = json!({"validation": {"maxLength": 5}})
            .as_object()
            .cloned()
            .unwrap();

        assert!(settings.merge(&patch));
        assert_eq!(settings.get("validation"), Some(&json!({"maxLength": 5})));
    }

    #[test]
    fn test_merge_rejects_non_string_name() {
        let mut settings = ElementSettings::new("a", "A");
        let patch = json!({"name": 3, "label": "Renamed"})
            .as_object()
            .cloned()
            .unwrap();

        assert!(settings.merge(&patch));
        assert_eq!(settings.name, "a");
        assert_eq!(settings.label, "Renamed");
    }

    #[test]
    fn test_merge_null_removes_key() {
        let mut settings = ElementSettings::new("a", "A").with("helpText", "hint");
        let patch = json!({"helpText": null}).as_object().cloned().unwrap();

        assert!(settings.merge(&patch));
        assert!(settings.get("helpText").is_none());
        assert!(!settings.merge(&patch));
    }

    #[test]
    fn test_options_accept_plain_strings() {
        let settings = ElementSettings::new("color", "Color").with(
            "options",
            json!(["red", {"label": "Blue", "value": "blue", "disabled": true}, 7]),
        );
        let options = settings.options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0], FieldOption::new("red", "red"));
        assert_eq!(options[1].disabled, Some(true));
    }

    #[test]
    fn test_cols_are_clamped() {
        let settings = ElementSettings::new("a", "A").with("cols", 40);
        assert_eq!(settings.cols(), 12);
        let settings = ElementSettings::new("a", "A").with("cols", 0);
        assert_eq!(settings.cols(), 1);
    }

    #[test]
    fn test_from_kind_uses_defaults() {
        let element = FormElement::from_kind(FieldKind::Slider, "k3f9-21ab");
        assert_eq!(element.name(), "slider_k3f921ab");
        assert_eq!(element.label(), "Slider");
        assert_eq!(element.settings.get_f64("max"), Some(100.0));
        assert_eq!(element.settings.cols(), 12);
        assert_eq!(element.settings.label_position(), LabelPosition::Top);
    }

    #[test]
    fn test_from_kind_names_follow_whole_id() {
        let first = FormElement::from_kind(FieldKind::Textbox, "element-1");
        let twelfth = FormElement::from_kind(FieldKind::Textbox, "element-12");
        assert_eq!(first.name(), "textbox_element1");
        assert_eq!(twelfth.name(), "textbox_element12");

        let uuid = FormElement::from_kind(FieldKind::Email, "6f1c2a9e-0b3d-4c5e-8f7a-9b0c1d2e3f4a");
        assert_eq!(uuid.name(), "email_6f1c2a9e0b3d4c5e8f7a9b0c1d2e3f4a");
    }
}
