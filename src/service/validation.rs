//! Request validation from per-field rules.

use crate::error::{AppError, FieldError, ValidationErrors};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Local part, `@`, then a dotted domain of LDH labels.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            nullable: false,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: false,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against per-field rules. Reports every violation, not just the first.
    /// Fields without a rule are ignored.
    pub fn validate(body: &Map<String, Value>, rules: &[FieldRule]) -> Result<(), AppError> {
        let mut errors = ValidationErrors::default();
        for rule in rules {
            match body.get(rule.name) {
                None if rule.required => errors.push(FieldError::missing(rule.name)),
                None => {}
                Some(Value::Null) if rule.nullable => {}
                Some(Value::Null) => errors.push(FieldError::new(
                    rule.name,
                    "null",
                    format!("{} may not be null", rule.name),
                )),
                Some(v) => {
                    if let Some(err) = validate_field(rule, v) {
                        errors.push(err);
                    }
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// Check `body` is a JSON object satisfying `rules`, then deserialize it.
    pub fn parse<T: DeserializeOwned>(body: Value, rules: &[FieldRule]) -> Result<T, AppError> {
        let map = match body {
            Value::Object(m) => m,
            _ => {
                return Err(AppError::invalid(
                    "body",
                    "type",
                    "body must be a JSON object",
                ))
            }
        };
        Self::validate(&map, rules)?;
        serde_json::from_value(Value::Object(map))
            .map_err(|e| AppError::invalid("body", "type", e.to_string()))
    }
}

fn validate_field(rule: &FieldRule, v: &Value) -> Option<FieldError> {
    let col = rule.name;
    match rule.kind {
        FieldKind::Bool if !v.is_boolean() => Some(FieldError::new(
            col,
            "type",
            format!("{} must be a boolean", col),
        )),
        FieldKind::String | FieldKind::Email if !v.is_string() => Some(FieldError::new(
            col,
            "type",
            format!("{} must be a string", col),
        )),
        FieldKind::Email => {
            let s = v.as_str().unwrap_or_default();
            if is_valid_email(s) {
                None
            } else {
                Some(FieldError::new(
                    col,
                    "email",
                    format!("{} must be a valid email address", col),
                ))
            }
        }
        _ => None,
    }
}

pub fn is_valid_email(s: &str) -> bool {
    s.len() <= 254 && EMAIL_RE.is_match(s)
}

/// Lowercase the domain part; the local part is kept as given.
pub fn normalize_email(s: &str) -> String {
    match s.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_ascii_lowercase()),
        None => s.to_string(),
    }
}
