//! Record value helpers
//!
//! Changelist rows are dynamic JSON objects: each record maps field names to
//! values, relation values arrive either as plain keys or as nested objects,
//! and to-many accessors arrive as arrays. These helpers give columns one
//! shared notion of "blank" and one shared text rendering per value.

use crate::schema::ModelMeta;
use serde_json::{Map, Value};

/// One changelist row
pub type Record = Map<String, Value>;

/// Whether a value counts as absent for display purposes
///
/// Missing keys, `null`, the empty string, and the empty array are blank;
/// everything else, including `0` and `false`, is a real value.
///
/// # Examples
///
/// ```
/// use adminbrowse::records::is_blank;
/// use serde_json::json;
///
/// assert!(is_blank(None));
/// assert!(is_blank(Some(&json!(null))));
/// assert!(is_blank(Some(&json!(""))));
/// assert!(is_blank(Some(&json!([]))));
/// assert!(!is_blank(Some(&json!(0))));
/// ```
pub fn is_blank(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => true,
		Some(Value::String(s)) => s.is_empty(),
		Some(Value::Array(items)) => items.is_empty(),
		Some(_) => false,
	}
}

/// Plain text rendering of a single value
///
/// Strings render without quotes; numbers and booleans render in their JSON
/// form; `null` renders empty.
pub fn scalar_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		Value::Number(n) => n.to_string(),
		Value::Bool(b) => b.to_string(),
		other => other.to_string(),
	}
}

/// Display text of a related value under `meta`
///
/// Nested objects render through the model's display field, falling back to
/// the primary key; anything else renders as a plain value.
pub fn display_text(meta: &ModelMeta, value: &Value) -> String {
	match value {
		Value::Object(fields) => {
			let display = meta
				.display_field()
				.and_then(|name| fields.get(name))
				.or_else(|| fields.get(meta.pk_field()));
			display.map(scalar_text).unwrap_or_default()
		}
		other => scalar_text(other),
	}
}

/// Items of a to-many accessor value
///
/// Anything that is not an array reads as no items.
pub fn related_items(value: Option<&Value>) -> &[Value] {
	match value {
		Some(Value::Array(items)) => items,
		_ => &[],
	}
}
