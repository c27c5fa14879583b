use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::ValidationErrors;

use crate::shared::types::FieldError;

lazy_static! {
    /// Regex for validating student email addresses
    /// - Valid: "jane.doe@school.edu", "a-b@mail.co.uk"
    /// - Invalid: "jane@", "@school.edu", "jane@school", "jane@school.education",
    ///   "josé@school.edu" (`\w` is ASCII only)
    pub static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?-u)^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").unwrap();
}

/// Deserialize an explicit `null` string field as empty, so it fails field
/// validation like a missing one
pub fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Convert a Rust field name to the camelCase name used on the wire
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten validator output into field-level messages, sorted by field.
///
/// `renames` maps Rust field names whose JSON name is not simply their
/// camelCase form (e.g. `("class_label", "class")`).
pub fn to_field_errors(errors: &ValidationErrors, renames: &[(&str, &str)]) -> Vec<FieldError> {
    let mut out = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        let field: &str = field.as_ref();
        let name = renames
            .iter()
            .find(|(from, _)| *from == field)
            .map(|(_, to)| to.to_string())
            .unwrap_or_else(|| camel_case(field));

        for error in field_errors.iter() {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", name));
            out.push(FieldError {
                field: name.clone(),
                message,
            });
        }
    }

    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}
