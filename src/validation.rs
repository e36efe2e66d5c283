use serde_json::Value;

use crate::model::{AssetKind, Category};

pub const ASSET_KINDS: &[&str] = &["Plugin", "3D Asset", "2D Asset", "SFX", "VFX", "Other"];
pub const CATEGORIES: &[&str] = &["UE4", "Unity", "Misc", "General"];

const MUTABLE_FIELDS: &[&str] = &["title", "description", "images", "type", "tags", "category"];

pub const USERNAME_MIN: usize = 8;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 8;

/// A single field-level constraint failure: the dot/index path of the
/// offending field plus a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { field: field.into(), reason: reason.into() }
    }
}

/// Check a create-asset body: every mutable field is required and must
/// satisfy its constraint. Returns all violations, not just the first.
pub fn validate_asset_create(body: &Value) -> Vec<Violation> {
    let Some(obj) = body.as_object() else {
        return vec![Violation::new("body", "must be a JSON object")];
    };

    let mut violations = Vec::new();
    for field in MUTABLE_FIELDS {
        match obj.get(*field) {
            Some(value) => check_asset_field(field, value, &mut violations),
            None => violations.push(Violation::new(*field, "is required")),
        }
    }
    violations
}

/// Check a partial-update body: at least one recognized mutable field must be
/// present, every present field must satisfy its full create-time constraint,
/// and unrecognized fields are rejected so nothing else can reach the update
/// document.
pub fn validate_asset_patch(body: &Value) -> Vec<Violation> {
    let Some(obj) = body.as_object() else {
        return vec![Violation::new("body", "must be a JSON object")];
    };

    let mut violations = Vec::new();
    let mut recognized = 0usize;
    for (field, value) in obj {
        if MUTABLE_FIELDS.contains(&field.as_str()) {
            recognized += 1;
            check_asset_field(field, value, &mut violations);
        } else {
            violations.push(Violation::new(field.clone(), "is not an updatable field"));
        }
    }
    if recognized == 0 {
        violations.push(Violation::new("body", "must contain at least one updatable field"));
    }
    violations
}

/// Check a registration body: username 8-20 characters, password at least 8.
pub fn validate_register(body: &Value) -> Vec<Violation> {
    let Some(obj) = body.as_object() else {
        return vec![Violation::new("body", "must be a JSON object")];
    };

    let mut violations = Vec::new();
    match obj.get("username").and_then(Value::as_str) {
        Some(username) => {
            let len = username.chars().count();
            if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
                violations.push(Violation::new(
                    "username",
                    format!("must be {} to {} characters", USERNAME_MIN, USERNAME_MAX),
                ));
            }
        }
        None => violations.push(Violation::new("username", "must be a string")),
    }
    match obj.get("password").and_then(Value::as_str) {
        Some(password) if password.chars().count() >= PASSWORD_MIN => {}
        Some(_) => violations.push(Violation::new(
            "password",
            format!("must be at least {} characters", PASSWORD_MIN),
        )),
        None => violations.push(Violation::new("password", "must be a string")),
    }
    violations
}

/// Check a login body: both credentials must be present strings. Length rules
/// are not re-applied here; the credential check itself decides.
pub fn validate_login(body: &Value) -> Vec<Violation> {
    let Some(obj) = body.as_object() else {
        return vec![Violation::new("body", "must be a JSON object")];
    };

    let mut violations = Vec::new();
    for field in ["username", "password"] {
        if obj.get(field).and_then(Value::as_str).is_none() {
            violations.push(Violation::new(field, "must be a string"));
        }
    }
    violations
}

fn check_asset_field(field: &str, value: &Value, violations: &mut Vec<Violation>) {
    match field {
        "title" | "description" => {
            if !value.is_string() {
                violations.push(Violation::new(field, "must be a string"));
            }
        }
        "type" => check_enum::<AssetKind>(field, value, ASSET_KINDS, violations),
        "category" => check_enum::<Category>(field, value, CATEGORIES, violations),
        "images" => check_elements(field, value, violations, check_image),
        "tags" => check_elements(field, value, violations, check_tag),
        _ => unreachable!("unknown mutable field {field}"),
    }
}

fn check_enum<T: serde::de::DeserializeOwned>(
    field: &str,
    value: &Value,
    allowed: &[&str],
    violations: &mut Vec<Violation>,
) {
    if !value.is_string() {
        violations.push(Violation::new(field, "must be a string"));
    } else if serde_json::from_value::<T>(value.clone()).is_err() {
        violations.push(Violation::new(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        ));
    }
}

fn check_elements(
    field: &str,
    value: &Value,
    violations: &mut Vec<Violation>,
    check: fn(&str, &Value, &mut Vec<Violation>),
) {
    let Some(items) = value.as_array() else {
        violations.push(Violation::new(field, "must be an array"));
        return;
    };
    for (i, item) in items.iter().enumerate() {
        check(&format!("{}[{}]", field, i), item, violations);
    }
}

fn check_image(path: &str, value: &Value, violations: &mut Vec<Violation>) {
    let Some(obj) = value.as_object() else {
        violations.push(Violation::new(path, "must be an object"));
        return;
    };
    if !obj.get("url").map_or(false, Value::is_string) {
        violations.push(Violation::new(format!("{path}.url"), "must be a string"));
    }
    for dim in ["height", "width"] {
        if !obj.get(dim).map_or(false, Value::is_number) {
            violations.push(Violation::new(format!("{path}.{dim}"), "must be a number"));
        }
    }
    // type is optional, but when present it must be a string
    if let Some(kind) = obj.get("type") {
        if !kind.is_string() {
            violations.push(Violation::new(format!("{path}.type"), "must be a string"));
        }
    }
}

fn check_tag(path: &str, value: &Value, violations: &mut Vec<Violation>) {
    let Some(obj) = value.as_object() else {
        violations.push(Violation::new(path, "must be an object"));
        return;
    };
    for key in ["name", "path"] {
        if !obj.get(key).map_or(false, Value::is_string) {
            violations.push(Violation::new(format!("{path}.{key}"), "must be a string"));
        }
    }
}
