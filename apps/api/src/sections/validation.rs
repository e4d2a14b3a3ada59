use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::sections::models::{Entry, Section};
use crate::sections::registry::{FieldDefinition, FieldKind};

/// Inline field errors keyed by `sectionId-entryId-fieldKey`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn key(section_id: Uuid, entry_id: Uuid, field_key: &str) -> String {
        format!("{section_id}-{entry_id}-{field_key}")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: String, message: String) {
        self.0.insert(key, message);
    }
}

/// Validates one value against its field definition.
///
/// Rules run in priority order and the first failure wins:
/// 1. required and blank
/// 2. longer than `max_length` characters
/// 3. email without a `local@domain.tld` shape
/// 4. url without an `http://` / `https://` scheme
/// 5. the field's custom validator (select fields without one check option membership)
pub fn validate_field(def: &FieldDefinition, value: &str) -> Option<String> {
    let trimmed = value.trim();

    if def.required && trimmed.is_empty() {
        return Some(format!("{} is required", def.label));
    }

    if let Some(max) = def.max_length {
        if value.chars().count() > max {
            return Some(format!("{} must be less than {} characters", def.label, max));
        }
    }

    if trimmed.is_empty() {
        return None;
    }

    match def.kind {
        FieldKind::Email if !is_email_shaped(trimmed) => {
            return Some("Please enter a valid email address".to_string());
        }
        FieldKind::Url if !has_http_scheme(trimmed) => {
            return Some("Please enter a valid URL (starting with http:// or https://)".to_string());
        }
        _ => {}
    }

    match def.validator {
        Some(custom) => custom(value),
        None if def.kind == FieldKind::Select && !def.options.contains(&trimmed) => Some(format!(
            "{} must be one of: {}",
            def.label,
            def.options.join(", ")
        )),
        None => None,
    }
}

/// Validates every template field of an entry. Values missing from the entry
/// count as empty.
pub fn validate_entry(section: &Section, entry: &Entry) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for def in section.section_type.template().fields {
        if let Some(message) = validate_field(def, entry.value(def.key)) {
            errors.insert(ValidationErrors::key(section.id, entry.id, def.key), message);
        }
    }
    errors
}

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the
/// domain with characters on both sides.
fn is_email_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn has_http_scheme(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
