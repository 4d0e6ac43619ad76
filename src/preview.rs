//! Form preview and submission.
//!
//! A [`Preview`] compiles the rules of every element once, then validates
//! submitted values and hands the flat `name → value` map to a
//! [`SubmitSink`].

use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};

use crate::error::{FieldError, FormError, Result};
use crate::fields::{describe, rules_for, InputSpec, Rule, ValueKind};
use crate::model::{FormConfig, FormElement};

/// Flat mapping of field `name` to submitted value.
pub type SubmittedValues = Map<String, Value>;

/// Receives the values of a valid submission.
pub trait SubmitSink {
    fn submitted(&mut self, values: &SubmittedValues);
}

impl<F> SubmitSink for F
where
    F: FnMut(&SubmittedValues),
{
    fn submitted(&mut self, values: &SubmittedValues) {
        self(values)
    }
}

/// A form ready to accept submissions.
#[derive(Debug)]
pub struct Preview<'a> {
    form: &'a FormConfig,
    fields: Vec<(&'a FormElement, Vec<Rule>)>,
    today: NaiveDate,
}

impl<'a> Preview<'a> {
    /// Compile the rules of `form` against the local date.
    pub fn new(form: &'a FormConfig) -> Result<Self> {
        Self::with_today(form, Local::now().date_naive())
    }

    /// Compile the rules of `form`; `today` anchors date restrictions.
    pub fn with_today(form: &'a FormConfig, today: NaiveDate) -> Result<Self> {
        let fields = form
            .elements
            .iter()
            .filter(|element| element.kind.spec().value != ValueKind::None)
            .map(|element| rules_for(element, today).map(|rules| (element, rules)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            form,
            fields,
            today,
        })
    }

    pub fn form(&self) -> &FormConfig {
        self.form
    }

    /// Render descriptors for every element, buttons included, in order.
    pub fn inputs(&self) -> Vec<InputSpec> {
        self.form
            .elements
            .iter()
            .map(|element| describe(element, self.today))
            .collect()
    }

    /// Every failing field in form order; each field reports its first
    /// failing rule.
    pub fn validate(&self, values: &SubmittedValues) -> Vec<FieldError> {
        self.fields
            .iter()
            .filter_map(|(element, rules)| {
                let value = values.get(element.name()).unwrap_or(&Value::Null);
                rules
                    .iter()
                    .find_map(|rule| rule.check(value))
                    .map(|message| FieldError {
                        field: element.name().to_string(),
                        message: message.to_string(),
                    })
            })
            .collect()
    }

    /// Collect the submitted value of every field.
    ///
    /// Missing values fall back to the element's `defaultValue` setting,
    /// then to `null`. Keys that match no field are dropped.
    pub fn collect(&self, values: &SubmittedValues) -> SubmittedValues {
        self.fields
            .iter()
            .map(|(element, _)| {
                let value = values
                    .get(element.name())
                    .or_else(|| element.settings.get("defaultValue"))
                    .cloned()
                    .unwrap_or(Value::Null);
                (element.name().to_string(), value)
            })
            .collect()
    }

    /// Validate `values` and, when valid, forward them to `sink`.
    pub fn submit(
        &self,
        values: &SubmittedValues,
        sink: &mut dyn SubmitSink,
    ) -> Result<SubmittedValues> {
        let errors = self.validate(values);
        if !errors.is_empty() {
            tracing::debug!(form = %self.form.id, failed = errors.len(), "submission rejected");
            return Err(FormError::Validation { errors });
        }
        let data = self.collect(values);
        sink.submitted(&data);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ElementCollection;
    use crate::model::{ElementSettings, FieldKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn form() -> FormConfig {
        let elements = ElementCollection::from_elements(vec![
            FormElement::new(
                "1",
                FieldKind::Textbox,
                ElementSettings::new("name", "Name").with("validation", json!({"required": true})),
            ),
            FormElement::new(
                "2",
                FieldKind::Email,
                ElementSettings::new("email", "Email"),
            ),
            FormElement::new(
                "3",
                FieldKind::Number,
                ElementSettings::new("age", "Age").with("defaultValue", 30),
            ),
            FormElement::new("4", FieldKind::Button, ElementSettings::new("go", "Go")),
        ])
        .unwrap();
        FormConfig {
            elements,
            ..FormConfig::default()
        }
    }

    fn values(raw: Value) -> SubmittedValues {
        raw.as_object().cloned().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    #[test]
    fn test_validate_reports_fields_in_order() {
        let form = form();
        let preview = Preview::with_today(&form, today()).unwrap();
        let errors = preview.validate(&values(json!({"email": "nope"})));
        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: "name".to_string(),
                    message: "This field is required".to_string(),
                },
                FieldError {
                    field: "email".to_string(),
                    message: "Please enter a valid email".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_submit_forwards_flat_values() {
        let form = form();
        let preview = Preview::with_today(&form, today()).unwrap();
        let mut received = Vec::new();
        let mut sink = |v: &SubmittedValues| received.push(v.clone());

        let data = preview
            .submit(
                &values(json!({"name": "Ada", "email": "ada@example.com", "extra": 1})),
                &mut sink,
            )
            .unwrap();

        assert_eq!(
            Value::Object(data),
            json!({"name": "Ada", "email": "ada@example.com", "age": 30})
        );
        assert_eq!(received.len(), 1);
    }

    #[test]
    fn test_invalid_submission_skips_sink() {
        let form = form();
        let preview = Preview::with_today(&form, today()).unwrap();
        let mut calls = 0;
        let mut sink = |_: &SubmittedValues| calls += 1;

        let err = preview.submit(&values(json!({})), &mut sink).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_inputs_include_buttons() {
        let form = form();
        let preview = Preview::with_today(&form, today()).unwrap();
        let inputs = preview.inputs();
        assert_eq!(inputs.len(), 4);
        assert!(inputs[0].required);
        assert_eq!(inputs[3].label, "Go");
    }
}
