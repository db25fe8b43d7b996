use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::FilterValue;
use crate::error::EngineError;

/// The comparison family a filter belongs to. Fixed for the life of a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
	Text,
	Select,
	Multiselect,
	Boolean,
	Date,
	Range,
}

impl FilterKind {
	/// Whether facets are computed for filters of this kind.
	#[must_use]
	pub fn is_categorical(self) -> bool {
		matches!(self, Self::Select | Self::Multiselect)
	}

	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Select => "select",
			Self::Multiselect => "multiselect",
			Self::Boolean => "boolean",
			Self::Date => "date",
			Self::Range => "range",
		}
	}

	/// Parse textual input (command line, config) into a value of this kind.
	///
	/// Multiselect values are comma-separated, booleans accept
	/// `true/false/yes/no/1/0`, and ranges accept `lo..hi` or `lo,hi`.
	/// Returns `None` when the text cannot be read as this kind.
	#[must_use]
	pub fn parse_value(self, raw: &str) -> Option<FilterValue> {
		let raw = raw.trim();
		match self {
			Self::Text | Self::Select | Self::Date => Some(FilterValue::Text(raw.to_string())),
			Self::Multiselect => Some(FilterValue::List(
				raw.split(',')
					.map(str::trim)
					.filter(|part| !part.is_empty())
					.map(str::to_string)
					.collect(),
			)),
			Self::Boolean => parse_bool(raw).map(FilterValue::Bool),
			Self::Range => {
				let (low, high) = raw.split_once("..").or_else(|| raw.split_once(','))?;
				let low = low.trim().parse::<f64>().ok()?;
				let high = high.trim().parse::<f64>().ok()?;
				Some(FilterValue::Range(low, high))
			}
		}
	}
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"true" | "yes" | "1" => Some(true),
		"false" | "no" | "0" => Some(false),
		_ => None,
	}
}

/// A static choice offered by a select or multiselect filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
	pub value: String,
	pub label: String,
}

impl FilterOption {
	#[must_use]
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// Immutable description of one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
	id: String,
	kind: FilterKind,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	label: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	field: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	options: Vec<FilterOption>,
	#[serde(
		default,
		rename = "default",
		alias = "defaultValue",
		skip_serializing_if = "Option::is_none"
	)]
	default_value: Option<FilterValue>,
}

impl FilterSpec {
	#[must_use]
	pub fn new(id: impl Into<String>, kind: FilterKind) -> Self {
		Self {
			id: id.into(),
			kind,
			label: None,
			field: None,
			options: Vec::new(),
			default_value: None,
		}
	}

	#[must_use]
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Read a different item field than the filter id.
	#[must_use]
	pub fn with_field(mut self, field: impl Into<String>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn with_options(mut self, options: Vec<FilterOption>) -> Self {
		self.options = options;
		self
	}

	#[must_use]
	pub fn with_default(mut self, value: impl Into<FilterValue>) -> Self {
		self.default_value = Some(value.into());
		self
	}

	#[must_use]
	pub fn id(&self) -> &str {
		&self.id
	}

	#[must_use]
	pub fn kind(&self) -> FilterKind {
		self.kind
	}

	/// Human-readable name, falling back to the id.
	#[must_use]
	pub fn label(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.id)
	}

	/// The item field this filter reads.
	#[must_use]
	pub fn field(&self) -> &str {
		self.field.as_deref().unwrap_or(&self.id)
	}

	#[must_use]
	pub fn options(&self) -> &[FilterOption] {
		&self.options
	}

	/// The configured default, ignoring empty values.
	#[must_use]
	pub fn default_value(&self) -> Option<&FilterValue> {
		self.default_value.as_ref().filter(|value| !value.is_empty())
	}

	/// Label of a static option, if one is declared for `value`.
	#[must_use]
	pub fn option_label(&self, value: &str) -> Option<&str> {
		self.options
			.iter()
			.find(|option| option.value == value)
			.map(|option| option.label.as_str())
	}
}

/// A validated filter configuration with unique ids, in declaration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterSpecs {
	specs: IndexMap<String, FilterSpec>,
}

impl FilterSpecs {
	/// # Errors
	///
	/// Returns [`EngineError::DuplicateFilterId`] when two specs share an id.
	pub fn new(specs: impl IntoIterator<Item = FilterSpec>) -> Result<Self, EngineError> {
		let mut map = IndexMap::new();
		for spec in specs {
			if map.contains_key(spec.id()) {
				return Err(EngineError::DuplicateFilterId {
					id: spec.id().to_string(),
				});
			}
			map.insert(spec.id().to_string(), spec);
		}
		Ok(Self { specs: map })
	}

	#[must_use]
	pub fn get(&self, id: &str) -> Option<&FilterSpec> {
		self.specs.get(id)
	}

	pub fn iter(&self) -> impl Iterator<Item = &FilterSpec> {
		self.specs.values()
	}

	/// Specs that get facets, in declaration order.
	pub fn categorical(&self) -> impl Iterator<Item = &FilterSpec> {
		self.iter().filter(|spec| spec.kind().is_categorical())
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.specs.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.specs.is_empty()
	}
}
