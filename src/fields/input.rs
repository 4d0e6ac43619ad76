//! Input descriptors.
//!
//! A host renders each element from an [`InputSpec`]: which control to
//! draw, the HTML-style attributes derived from the element's settings,
//! and the options to list. No markup is produced here.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{ElementSettings, FieldOption, FormElement, LabelPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Email,
    Password,
    Tel,
    Number,
    Date,
    Time,
}

/// Control family used to render a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "control", content = "type", rename_all = "lowercase")]
pub enum Control {
    Input(InputType),
    TextArea,
    Select,
    SearchSelect,
    CheckboxGroup,
    RadioGroup,
    Range,
    Rating,
    FileUpload,
    Camera,
    Button,
}

/// Everything a host needs to draw one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    pub id: String,
    pub name: String,
    pub label: String,
    pub label_position: LabelPosition,
    pub cols: u8,
    pub required: bool,
    pub disabled: bool,
    pub control: Control,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Text drawn inside the input before the value (currency symbol).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

fn fallback_options() -> Vec<FieldOption> {
    (1..=3)
        .map(|n| {
            let text = format!("Option {}", n);
            FieldOption::new(text.clone(), text)
        })
        .collect()
}

pub(crate) fn number_attr(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn copy_number(settings: &ElementSettings, input: &mut InputSpec, key: &'static str) {
    if let Some(value) = settings.get_f64(key) {
        input.attributes.insert(key, number_attr(value));
    }
}

fn copy_str(settings: &ElementSettings, input: &mut InputSpec, key: &str, attr: &'static str) {
    if let Some(value) = settings.get_str(key) {
        input.attributes.insert(attr, value.to_string());
    }
}

pub(crate) fn plain(_: &ElementSettings, _: NaiveDate, _: &mut InputSpec) {}

pub(crate) fn multiline(_: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    input.attributes.insert("rows", "3".to_string());
}

pub(crate) fn numeric(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    copy_number(settings, input, "min");
    copy_number(settings, input, "max");
    copy_number(settings, input, "step");
}

pub(crate) fn currency(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    input.attributes.insert("step", "0.01".to_string());
    input.prefix = Some(settings.get_str("currencySymbol").unwrap_or("$").to_string());
    input.placeholder.get_or_insert_with(|| "0.00".to_string());
}

pub(crate) fn phone(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    if input.placeholder.is_none() {
        let format = settings.get_str("phoneFormat").unwrap_or("(###) ###-####");
        input.placeholder = Some(format.to_string());
    }
}

pub(crate) fn dropdown(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    input.options = settings.options();
    input
        .placeholder
        .get_or_insert_with(|| "Select an option".to_string());
}

pub(crate) fn checkbox(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    input.options = settings.options();
}

pub(crate) fn radio(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    input.options = settings.options();
    if input.options.is_empty() {
        input.options = fallback_options();
    }
}

pub(crate) fn search_dropdown(settings: &ElementSettings, today: NaiveDate, input: &mut InputSpec) {
    radio(settings, today, input);
    let placeholder = settings.get_str("searchPlaceholder").unwrap_or("Search...");
    input.placeholder = Some(placeholder.to_string());
}

pub(crate) fn rating(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    let max = settings.get_f64("maxRating").unwrap_or(5.0);
    input.attributes.insert("max", number_attr(max));
}

pub(crate) fn file_upload(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    copy_str(settings, input, "acceptedTypes", "accept");
    if settings.flag("multiple") {
        input.attributes.insert("multiple", "true".to_string());
    }
}

pub(crate) fn camera(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    input.attributes.insert("accept", "image/*".to_string());
    let facing = settings.get_str("cameraType").unwrap_or("environment");
    input.attributes.insert("capture", facing.to_string());
}

pub(crate) fn date_picker(settings: &ElementSettings, today: NaiveDate, input: &mut InputSpec) {
    let today = today.format("%Y-%m-%d").to_string();
    if settings.flag("disablePastDates") {
        input.attributes.insert("min", today.clone());
    } else {
        copy_str(settings, input, "minDate", "min");
    }
    if settings.flag("disableFutureDates") {
        input.attributes.insert("max", today);
    } else {
        copy_str(settings, input, "maxDate", "max");
    }
}

pub(crate) fn time_picker(settings: &ElementSettings, _: NaiveDate, input: &mut InputSpec) {
    copy_str(settings, input, "minTime", "min");
    copy_str(settings, input, "maxTime", "max");
    if let Some(minutes) = settings.get_f64("timeInterval") {
        input.attributes.insert("step", number_attr(minutes * 60.0));
    }
}

/// Describe how to render `element`. `today` resolves the "no past/future
/// dates" switches of date pickers.
pub fn describe(element: &FormElement, today: NaiveDate) -> InputSpec {
    let settings = &element.settings;
    let spec = element.kind.spec();
    let mut input = InputSpec {
        id: element.id.clone(),
        name: settings.name.clone(),
        label: settings.label.clone(),
        label_position: settings.label_position(),
        cols: settings.cols(),
        required: settings.is_required(),
        disabled: settings.flag("disabled"),
        control: spec.control,
        placeholder: settings.get_str("placeholder").map(str::to_string),
        help_text: settings.get_str("helpText").map(str::to_string),
        prefix: None,
        attributes: BTreeMap::new(),
        options: Vec::new(),
    };
    (spec.decorate)(settings, today, &mut input);
    input
}
