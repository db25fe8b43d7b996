use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A caller-supplied record addressed by field name.
///
/// The engine never assumes a shape beyond named field access; values keep
/// their JSON types so filters can coerce them per filter kind.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item {
	fields: Map<String, Value>,
}

impl Item {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Add or replace a field.
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.fields.insert(name.into(), value.into());
		self
	}

	/// Raw value of a field. `null` is reported as absent.
	#[must_use]
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.get(name).filter(|value| !value.is_null())
	}

	/// Textual rendering of a scalar field, or `None` when the field is
	/// missing or not a string, number or boolean.
	#[must_use]
	pub fn text(&self, name: &str) -> Option<String> {
		self.field(name).and_then(scalar_text)
	}

	pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.fields.iter().map(|(name, value)| (name.as_str(), value))
	}

	/// Build an item from a JSON value. Non-objects yield `None`.
	#[must_use]
	pub fn from_value(value: Value) -> Option<Self> {
		match value {
			Value::Object(fields) => Some(Self { fields }),
			_ => None,
		}
	}

	#[must_use]
	pub fn to_value(&self) -> Value {
		Value::Object(self.fields.clone())
	}
}

impl From<Map<String, Value>> for Item {
	fn from(fields: Map<String, Value>) -> Self {
		Self { fields }
	}
}

/// Render a scalar JSON value as text. Arrays, objects and `null` have no
/// scalar rendering.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}

/// Non-empty textual values held by a field: the scalar itself, or each
/// scalar element of an array.
pub(crate) fn field_values(value: &Value) -> Vec<String> {
	match value {
		Value::Array(values) => values
			.iter()
			.filter_map(scalar_text)
			.filter(|text| !text.is_empty())
			.collect(),
		other => scalar_text(other)
			.filter(|text| !text.is_empty())
			.into_iter()
			.collect(),
	}
}
