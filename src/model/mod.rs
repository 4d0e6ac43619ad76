//! Form Data Model
//!
//! Elements, their settings and whole-form definitions, serialized in the
//! camelCase JSON shape hosts and stores exchange.

pub mod element;
pub mod form;

pub use element::{
    ElementSettings, FieldKind, FieldOption, FormElement, LabelPosition, SettingsPatch,
    ValidationConfig,
};
pub use form::{
    ButtonPosition, FormConfig, FormPatch, FormSettings, SubmitButton, ValidationMode,
    DEFAULT_FORM_ID, DEFAULT_FORM_NAME,
};
