//! Field Kind Table
//!
//! Everything that varies by [`FieldKind`] lives in one static table:
//! palette text, the settings a freshly dropped element starts with, the
//! settings sections a host shows, the input control used to render it and
//! the extra validation rules it contributes. Adding a kind means adding a
//! variant and one table row.

pub mod input;
pub mod rules;

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::model::{ElementSettings, FieldKind, FormElement, ValidationConfig};

pub use input::{describe, Control, InputSpec, InputType};
pub use rules::{rules_for, Rule};

/// A tab of the element settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsSection {
    Common,
    Validation,
    Options,
    Slider,
    Rating,
    File,
    Camera,
    Date,
    Time,
    Format,
}

impl SettingsSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsSection::Common => "common",
            SettingsSection::Validation => "validation",
            SettingsSection::Options => "options",
            SettingsSection::Slider => "slider",
            SettingsSection::Rating => "rating",
            SettingsSection::File => "file",
            SettingsSection::Camera => "camera",
            SettingsSection::Date => "date",
            SettingsSection::Time => "time",
            SettingsSection::Format => "format",
        }
    }
}

/// Shape of the value a field submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
    /// One value out of the configured options.
    Choice,
    /// A boolean or a list of option values.
    MultiChoice,
    Files,
    /// Buttons submit nothing.
    None,
}

/// Builder for rules a kind adds on top of the common ones.
pub type RuleBuilder = fn(&FormElement, &ValidationConfig, NaiveDate, &mut Vec<Rule>) -> Result<()>;

/// Fills kind-specific parts of an [`InputSpec`] from the settings.
pub type Decorator = fn(&ElementSettings, NaiveDate, &mut InputSpec);

/// One row of the field table.
pub struct FieldSpec {
    pub kind: FieldKind,
    /// Palette label, also the default element label.
    pub label: &'static str,
    pub description: &'static str,
    pub sections: &'static [SettingsSection],
    pub control: Control,
    pub value: ValueKind,
    /// Kind-specific default settings for a new element.
    pub defaults: fn(&mut Map<String, Value>),
    pub decorate: Decorator,
    pub rules: RuleBuilder,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("control", &self.control)
            .finish_non_exhaustive()
    }
}

use SettingsSection::{
    Camera as CameraTab, Common, Date as DateTab, File as FileTab, Format, Options, Rating as RatingTab,
    Slider as SliderTab, Time as TimeTab, Validation,
};

const BASIC: &[SettingsSection] = &[Common, Validation];
const CHOICE: &[SettingsSection] = &[Common, Validation, Options];
const FORMATTED: &[SettingsSection] = &[Common, Validation, Format];

/// Keys every new element starts with.
fn base_defaults(settings: &mut Map<String, Value>) {
    settings.insert("labelPosition".into(), json!("top"));
    settings.insert("cols".into(), json!(12));
    settings.insert("disabled".into(), json!(false));
}

fn plain_defaults(settings: &mut Map<String, Value>) {
    base_defaults(settings);
}

fn choice_defaults(settings: &mut Map<String, Value>) {
    base_defaults(settings);
    let options: Vec<Value> = (1..=3)
        .map(|n| json!({"label": format!("Option {}", n), "value": format!("option-{}", n)}))
        .collect();
    settings.insert("options".into(), Value::Array(options));
}

fn search_defaults(settings: &mut Map<String, Value>) {
    choice_defaults(settings);
    settings.insert("searchPlaceholder".into(), json!("Search..."));
}

fn slider_defaults(settings: &mut Map<String, Value>) {
    base_defaults(settings);
    settings.insert("min".into(), json!(0));
    settings.insert("max".into(), json!(100));
    settings.insert("step".into(), json!(1));
    settings.insert("showValue".into(), json!(true));
}

fn rating_defaults(settings: &mut Map<String, Value>) {
    base_defaults(settings);
    settings.insert("maxRating".into(), json!(5));
    settings.insert("allowHalf".into(), json!(false));
    settings.insert("starColor".into(), json!("#ffd700"));
}

fn file_defaults(settings: &mut Map<String, Value>) {
    base_defaults(settings);
    settings.insert("multiple".into(), json!(false));
    settings.insert("maxFiles".into(), json!(1));
}

fn camera_defaults(settings: &mut Map<String, Value>) {
    base_defaults(settings);
    settings.insert("cameraType".into(), json!("environment"));
    settings.insert("imageFormat".into(), json!("jpeg"));
    settings.insert("showPreview".into(), json!(true));
}

fn phone_defaults(settings: &mut Map<String, Value>) {
    base_defaults(settings);
    settings.insert("phoneFormat".into(), json!("(###) ###-####"));
}

fn currency_defaults(settings: &mut Map<String, Value>) {
    base_defaults(settings);
    settings.insert("currencySymbol".into(), json!("$"));
    settings.insert("decimals".into(), json!(2));
}

fn password_defaults(settings: &mut Map<String, Value>) {
    base_defaults(settings);
    settings.insert("showPasswordToggle".into(), json!(true));
}

/// Indexed by `FieldKind as usize`; order matches [`FieldKind::ALL`].
static FIELD_SPECS: [FieldSpec; 18] = [
    FieldSpec {
        kind: FieldKind::Textbox,
        label: "Text Box",
        description: "Single line text input",
        sections: BASIC,
        control: Control::Input(InputType::Text),
        value: ValueKind::Text,
        defaults: plain_defaults,
        decorate: input::plain,
        rules: rules::no_extra_rules,
    },
    FieldSpec {
        kind: FieldKind::Multiline,
        label: "Multiline Text",
        description: "Multiple line text input",
        sections: BASIC,
        control: Control::TextArea,
        value: ValueKind::Text,
        defaults: plain_defaults,
        decorate: input::multiline,
        rules: rules::no_extra_rules,
    },
    FieldSpec {
        kind: FieldKind::Dropdown,
        label: "Dropdown",
        description: "Select from options",
        sections: CHOICE,
        control: Control::Select,
        value: ValueKind::Choice,
        defaults: choice_defaults,
        decorate: input::dropdown,
        rules: rules::choice_rules,
    },
    FieldSpec {
        kind: FieldKind::SearchDropdown,
        label: "Search Dropdown",
        description: "Searchable dropdown",
        sections: CHOICE,
        control: Control::SearchSelect,
        value: ValueKind::Choice,
        defaults: search_defaults,
        decorate: input::search_dropdown,
        rules: rules::choice_rules,
    },
    FieldSpec {
        kind: FieldKind::Checkbox,
        label: "Checkbox",
        description: "Multiple choice checkbox",
        sections: CHOICE,
        control: Control::CheckboxGroup,
        value: ValueKind::MultiChoice,
        defaults: choice_defaults,
        decorate: input::checkbox,
        rules: rules::choice_rules,
    },
    FieldSpec {
        kind: FieldKind::Radio,
        label: "Radio Button",
        description: "Single choice radio",
        sections: CHOICE,
        control: Control::RadioGroup,
        value: ValueKind::Choice,
        defaults: choice_defaults,
        decorate: input::radio,
        rules: rules::choice_rules,
    },
    FieldSpec {
        kind: FieldKind::Slider,
        label: "Slider",
        description: "Range slider",
        sections: &[Common, Validation, SliderTab],
        control: Control::Range,
        value: ValueKind::Number,
        defaults: slider_defaults,
        decorate: input::numeric,
        rules: rules::numeric_rules,
    },
    FieldSpec {
        kind: FieldKind::Rating,
        label: "Rating",
        description: "Star rating input",
        sections: &[Common, Validation, RatingTab],
        control: Control::Rating,
        value: ValueKind::Number,
        defaults: rating_defaults,
        decorate: input::rating,
        rules: rules::rating_rules,
    },
    FieldSpec {
        kind: FieldKind::FileUpload,
        label: "File Upload",
        description: "File upload input",
        sections: &[Common, Validation, FileTab],
        control: Control::FileUpload,
        value: ValueKind::Files,
        defaults: file_defaults,
        decorate: input::file_upload,
        rules: rules::file_rules,
    },
    FieldSpec {
        kind: FieldKind::Camera,
        label: "Camera",
        description: "Camera/Image upload",
        sections: &[Common, Validation, CameraTab],
        control: Control::Camera,
        value: ValueKind::Files,
        defaults: camera_defaults,
        decorate: input::camera,
        rules: rules::file_rules,
    },
    FieldSpec {
        kind: FieldKind::Button,
        label: "Button",
        description: "Clickable button",
        sections: BASIC,
        control: Control::Button,
        value: ValueKind::None,
        defaults: plain_defaults,
        decorate: input::plain,
        rules: rules::no_extra_rules,
    },
    FieldSpec {
        kind: FieldKind::DatePicker,
        label: "Date Picker",
        description: "Date selection",
        sections: &[Common, Validation, DateTab],
        control: Control::Input(InputType::Date),
        value: ValueKind::Text,
        defaults: plain_defaults,
        decorate: input::date_picker,
        rules: rules::bounded_rules,
    },
    FieldSpec {
        kind: FieldKind::TimePicker,
        label: "Time Picker",
        description: "Time selection",
        sections: &[Common, Validation, TimeTab],
        control: Control::Input(InputType::Time),
        value: ValueKind::Text,
        defaults: plain_defaults,
        decorate: input::time_picker,
        rules: rules::bounded_rules,
    },
    FieldSpec {
        kind: FieldKind::Email,
        label: "Email",
        description: "Email input",
        sections: FORMATTED,
        control: Control::Input(InputType::Email),
        value: ValueKind::Text,
        defaults: plain_defaults,
        decorate: input::plain,
        rules: rules::email_rules,
    },
    FieldSpec {
        kind: FieldKind::Phone,
        label: "Phone",
        description: "Phone input",
        sections: FORMATTED,
        control: Control::Input(InputType::Tel),
        value: ValueKind::Text,
        defaults: phone_defaults,
        decorate: input::phone,
        rules: rules::no_extra_rules,
    },
    FieldSpec {
        kind: FieldKind::Currency,
        label: "Currency",
        description: "Currency input",
        sections: FORMATTED,
        control: Control::Input(InputType::Number),
        value: ValueKind::Number,
        defaults: currency_defaults,
        decorate: input::currency,
        rules: rules::numeric_rules,
    },
    FieldSpec {
        kind: FieldKind::Password,
        label: "Password",
        description: "Password input",
        sections: FORMATTED,
        control: Control::Input(InputType::Password),
        value: ValueKind::Text,
        defaults: password_defaults,
        decorate: input::plain,
        rules: rules::no_extra_rules,
    },
    FieldSpec {
        kind: FieldKind::Number,
        label: "Number",
        description: "Numeric input",
        sections: FORMATTED,
        control: Control::Input(InputType::Number),
        value: ValueKind::Number,
        defaults: plain_defaults,
        decorate: input::numeric,
        rules: rules::numeric_rules,
    },
];

impl FieldKind {
    /// The table row for this kind.
    pub fn spec(&self) -> &'static FieldSpec {
        &FIELD_SPECS[*self as usize]
    }
}

/// All table rows in palette order.
pub fn palette() -> &'static [FieldSpec] {
    &FIELD_SPECS
}
