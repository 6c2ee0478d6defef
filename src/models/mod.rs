//! Data models for the Proco backend.
//!
//! Field names follow the JSON the marketing site already consumes: camelCase,
//! with the record identifier exposed as `_id`.

mod course;
mod inquiry;
mod notification;
mod project;

pub use course::*;
pub use inquiry::*;
pub use notification::*;
pub use project::*;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Non-empty value of an optional text field, kept as sent.
fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Accept any JSON scalar for a text field. Numbers and booleans are kept in
/// their JSON spelling; `null`, arrays and objects count as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}
