use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::FilterKind;

/// The live value of one filter.
///
/// Serialized untagged so the persisted form is the plain JSON shape: a
/// string, a boolean, a `[low, high]` pair, or an array of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
	Text(String),
	Bool(bool),
	Range(f64, f64),
	List(Vec<String>),
}

impl FilterValue {
	/// Empty strings and empty lists carry no constraint.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Text(text) => text.is_empty(),
			Self::List(values) => values.is_empty(),
			Self::Bool(_) | Self::Range(..) => false,
		}
	}

	/// Whether the value has the shape expected by `kind`.
	#[must_use]
	pub fn fits(&self, kind: FilterKind) -> bool {
		matches!(
			(kind, self),
			(
				FilterKind::Text | FilterKind::Select | FilterKind::Date,
				Self::Text(_)
			) | (FilterKind::Multiselect, Self::List(_))
				| (FilterKind::Boolean, Self::Bool(_))
				| (FilterKind::Range, Self::Range(..))
		)
	}
}

/// Renders the textual form accepted by [`FilterKind::parse_value`].
impl fmt::Display for FilterValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Bool(flag) => write!(f, "{flag}"),
			Self::Range(low, high) => write!(f, "{low}..{high}"),
			Self::List(values) => f.write_str(&values.join(",")),
		}
	}
}

impl From<&str> for FilterValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for FilterValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for FilterValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<(f64, f64)> for FilterValue {
	fn from((low, high): (f64, f64)) -> Self {
		Self::Range(low, high)
	}
}

impl From<Vec<String>> for FilterValue {
	fn from(values: Vec<String>) -> Self {
		Self::List(values)
	}
}

impl From<Vec<&str>> for FilterValue {
	fn from(values: Vec<&str>) -> Self {
		Self::List(values.into_iter().map(str::to_string).collect())
	}
}

/// Active filter values keyed by filter id, in the order they were set.
///
/// Every entry holds a non-empty value: setting an empty value removes the
/// key, which keeps [`len`](Self::len) equal to the number of filters that
/// actually constrain the result.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
	from = "IndexMap<String, FilterValue>",
	into = "IndexMap<String, FilterValue>"
)]
pub struct FilterValueMap {
	values: IndexMap<String, FilterValue>,
}

impl FilterValueMap {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Set or remove a value. `None` and empty values remove the key.
	/// Returns whether the map changed.
	pub fn set(&mut self, id: impl Into<String>, value: Option<FilterValue>) -> bool {
		let id = id.into();
		match value.filter(|value| !value.is_empty()) {
			Some(value) => {
				if self.values.get(&id) == Some(&value) {
					return false;
				}
				self.values.insert(id, value);
				true
			}
			None => self.values.shift_remove(&id).is_some(),
		}
	}

	/// Returns whether the key was present.
	pub fn remove(&mut self, id: &str) -> bool {
		self.values.shift_remove(id).is_some()
	}

	/// Returns whether anything was removed.
	pub fn clear(&mut self) -> bool {
		let had_values = !self.values.is_empty();
		self.values.clear();
		had_values
	}

	#[must_use]
	pub fn get(&self, id: &str) -> Option<&FilterValue> {
		self.values.get(id)
	}

	#[must_use]
	pub fn contains(&self, id: &str) -> bool {
		self.values.contains_key(id)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
		self.values.iter().map(|(id, value)| (id.as_str(), value))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.values.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl From<IndexMap<String, FilterValue>> for FilterValueMap {
	fn from(mut values: IndexMap<String, FilterValue>) -> Self {
		values.retain(|_, value| !value.is_empty());
		Self { values }
	}
}

impl From<FilterValueMap> for IndexMap<String, FilterValue> {
	fn from(map: FilterValueMap) -> Self {
		map.values
	}
}

impl<K: Into<String>> FromIterator<(K, FilterValue)> for FilterValueMap {
	fn from_iter<I: IntoIterator<Item = (K, FilterValue)>>(iter: I) -> Self {
		let mut map = Self::new();
		for (id, value) in iter {
			map.set(id, Some(value));
		}
		map
	}
}
