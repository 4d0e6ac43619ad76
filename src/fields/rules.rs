//! Validation rules built from `settings.validation`.
//!
//! Every submitting field gets the common rules (required, length, pattern).
//! Its kind's [`RuleBuilder`](super::RuleBuilder) then adds or replaces
//! rules. An empty value only ever fails [`Rule::Required`].

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde_json::Value;

use crate::error::{FormError, Result};
use crate::fields::input::{describe, number_attr};
use crate::fields::ValueKind;
use crate::model::{FieldKind, FormElement, ValidationConfig};

const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

/// A single check applied to a submitted value.
#[derive(Debug, Clone)]
pub enum Rule {
    Required { message: String },
    MinLength { limit: usize, message: String },
    MaxLength { limit: usize, message: String },
    Pattern { regex: Regex, message: String },
    Numeric { message: String },
    Min { limit: f64, message: String },
    Max { limit: f64, message: String },
    /// Value (or every list entry) must be one of `values`.
    OneOf { values: Vec<String>, message: String },
    /// Email domain must be one of `domains` (case-insensitive).
    AllowedDomains { domains: Vec<String>, message: String },
    /// Date or time value must not be earlier than `bound`.
    Earliest { bound: String, message: String },
    /// Date or time value must not be later than `bound`.
    Latest { bound: String, message: String },
    MaxFiles { limit: usize, message: String },
}

/// Null, empty strings, unchecked boxes and empty lists count as no value.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(checked) => !checked,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Orders a date or time value against a bound. Dates and clock times are
/// compared as parsed values; anything else falls back to string order.
fn compare_bound(value: &str, bound: &str) -> Ordering {
    let (value, bound) = (value.trim(), bound.trim());
    if let (Ok(v), Ok(b)) = (
        NaiveDate::parse_from_str(value, "%Y-%m-%d"),
        NaiveDate::parse_from_str(bound, "%Y-%m-%d"),
    ) {
        return v.cmp(&b);
    }
    if let (Some(v), Some(b)) = (parse_time(value), parse_time(bound)) {
        return v.cmp(&b);
    }
    value.cmp(bound)
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Rule {
    /// The failure message, or `None` when `value` passes.
    pub fn check(&self, value: &Value) -> Option<&str> {
        if is_empty_value(value) {
            return match self {
                Rule::Required { message } => Some(message.as_str()),
                _ => None,
            };
        }

        let passed = match self {
            Rule::Required { .. } => true,
            Rule::MinLength { limit, .. } => {
                text_of(value).map_or(true, |s| s.chars().count() >= *limit)
            }
            Rule::MaxLength { limit, .. } => {
                text_of(value).map_or(true, |s| s.chars().count() <= *limit)
            }
            Rule::Pattern { regex, .. } => text_of(value).map_or(true, |s| regex.is_match(&s)),
            Rule::Numeric { .. } => number_of(value).is_some(),
            Rule::Min { limit, .. } => number_of(value).map_or(true, |n| n >= *limit),
            Rule::Max { limit, .. } => number_of(value).map_or(true, |n| n <= *limit),
            Rule::OneOf { values, .. } => match value {
                Value::String(s) => values.contains(s),
                Value::Array(items) => items
                    .iter()
                    .all(|item| item.as_str().is_some_and(|s| values.iter().any(|v| v == s))),
                _ => true,
            },
            Rule::AllowedDomains { domains, .. } => match value.as_str() {
                Some(address) => address.rsplit_once('@').is_some_and(|(_, domain)| {
                    domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
                }),
                None => true,
            },
            Rule::Earliest { bound, .. } => value
                .as_str()
                .map_or(true, |s| compare_bound(s, bound) != Ordering::Less),
            Rule::Latest { bound, .. } => value
                .as_str()
                .map_or(true, |s| compare_bound(s, bound) != Ordering::Greater),
            Rule::MaxFiles { limit, .. } => match value {
                Value::Array(items) => items.len() <= *limit,
                _ => true,
            },
        };

        if passed {
            None
        } else {
            Some(self.message())
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Rule::Required { message }
            | Rule::MinLength { message, .. }
            | Rule::MaxLength { message, .. }
            | Rule::Pattern { message, .. }
            | Rule::Numeric { message }
            | Rule::Min { message, .. }
            | Rule::Max { message, .. }
            | Rule::OneOf { message, .. }
            | Rule::AllowedDomains { message, .. }
            | Rule::Earliest { message, .. }
            | Rule::Latest { message, .. }
            | Rule::MaxFiles { message, .. } => message.as_str(),
        }
    }
}

fn compile(element: &FormElement, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
        field: element.settings.name.clone(),
        source,
    })
}

/// Rules for `element`, in the order they are checked.
pub fn rules_for(element: &FormElement, today: NaiveDate) -> Result<Vec<Rule>> {
    let spec = element.kind.spec();
    if spec.value == ValueKind::None {
        return Ok(Vec::new());
    }

    let validation = element.settings.validation().unwrap_or_default();
    let mut rules = Vec::new();

    if validation.required == Some(true) {
        rules.push(Rule::Required {
            message: validation
                .error_message
                .clone()
                .unwrap_or_else(|| "This field is required".to_string()),
        });
    }
    if let Some(limit) = validation.min_length.filter(|n| *n > 0) {
        rules.push(Rule::MinLength {
            limit,
            message: format!("Minimum length is {}", limit),
        });
    }
    if let Some(limit) = validation.max_length.filter(|n| *n > 0) {
        rules.push(Rule::MaxLength {
            limit,
            message: format!("Maximum length is {}", limit),
        });
    }
    if let Some(pattern) = validation.pattern.as_deref().filter(|p| !p.is_empty()) {
        rules.push(Rule::Pattern {
            regex: compile(element, pattern)?,
            message: validation
                .error_message
                .clone()
                .unwrap_or_else(|| "Invalid format".to_string()),
        });
    }

    (spec.rules)(element, &validation, today, &mut rules)?;
    Ok(rules)
}

pub(crate) fn no_extra_rules(
    _: &FormElement,
    _: &ValidationConfig,
    _: NaiveDate,
    _: &mut Vec<Rule>,
) -> Result<()> {
    Ok(())
}

pub(crate) fn numeric_rules(
    element: &FormElement,
    validation: &ValidationConfig,
    _: NaiveDate,
    rules: &mut Vec<Rule>,
) -> Result<()> {
    let settings = &element.settings;
    rules.push(Rule::Numeric {
        message: "Please enter a valid number".to_string(),
    });
    if let Some(limit) = validation.min.or_else(|| settings.get_f64("min")) {
        rules.push(Rule::Min {
            limit,
            message: format!("Minimum value is {}", number_attr(limit)),
        });
    }
    if let Some(limit) = validation.max.or_else(|| settings.get_f64("max")) {
        rules.push(Rule::Max {
            limit,
            message: format!("Maximum value is {}", number_attr(limit)),
        });
    }
    Ok(())
}

pub(crate) fn rating_rules(
    element: &FormElement,
    _: &ValidationConfig,
    _: NaiveDate,
    rules: &mut Vec<Rule>,
) -> Result<()> {
    let max = element.settings.get_f64("maxRating").unwrap_or(5.0);
    rules.push(Rule::Numeric {
        message: "Please enter a valid number".to_string(),
    });
    rules.push(Rule::Min {
        limit: 1.0,
        message: "Minimum value is 1".to_string(),
    });
    rules.push(Rule::Max {
        limit: max,
        message: format!("Maximum value is {}", number_attr(max)),
    });
    Ok(())
}

pub(crate) fn email_rules(
    element: &FormElement,
    _: &ValidationConfig,
    _: NaiveDate,
    rules: &mut Vec<Rule>,
) -> Result<()> {
    // The email format replaces any configured pattern.
    rules.retain(|rule| !matches!(rule, Rule::Pattern { .. }));
    rules.push(Rule::Pattern {
        regex: compile(element, EMAIL_PATTERN)?,
        message: "Please enter a valid email".to_string(),
    });

    let domains: Vec<String> = match element.settings.get("allowedDomains") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    if !domains.is_empty() {
        rules.push(Rule::AllowedDomains {
            message: format!("Email domain must be one of: {}", domains.join(", ")),
            domains,
        });
    }
    Ok(())
}

pub(crate) fn choice_rules(
    element: &FormElement,
    _: &ValidationConfig,
    today: NaiveDate,
    rules: &mut Vec<Rule>,
) -> Result<()> {
    let values: Vec<String> = describe(element, today)
        .options
        .into_iter()
        .filter(|option| option.disabled != Some(true))
        .map(|option| option.value)
        .collect();
    if !values.is_empty() {
        rules.push(Rule::OneOf {
            values,
            message: "Please select a valid option".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn bounded_rules(
    element: &FormElement,
    _: &ValidationConfig,
    today: NaiveDate,
    rules: &mut Vec<Rule>,
) -> Result<()> {
    let (noun, after, before) = match element.kind {
        FieldKind::TimePicker => ("Time", "at or after", "at or before"),
        _ => ("Date", "on or after", "on or before"),
    };
    let input = describe(element, today);
    if let Some(min) = input.attributes.get("min") {
        rules.push(Rule::Earliest {
            bound: min.clone(),
            message: format!("{} must be {} {}", noun, after, min),
        });
    }
    if let Some(max) = input.attributes.get("max") {
        rules.push(Rule::Latest {
            bound: max.clone(),
            message: format!("{} must be {} {}", noun, before, max),
        });
    }
    Ok(())
}

pub(crate) fn file_rules(
    element: &FormElement,
    _: &ValidationConfig,
    _: NaiveDate,
    rules: &mut Vec<Rule>,
) -> Result<()> {
    let settings = &element.settings;
    let limit = if settings.flag("multiple") {
        settings
            .get("maxFiles")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
    } else {
        Some(1)
    };
    if let Some(limit) = limit {
        rules.push(Rule::MaxFiles {
            limit,
            message: format!("You can upload at most {} file(s)", limit),
        });
    }
    Ok(())
}
