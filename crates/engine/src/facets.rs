//! Per-filter value counts over a result set.

use indexmap::IndexMap;
use serde::Serialize;

use crate::filter::{FilterSpec, FilterSpecs};
use crate::item::{Item, field_values};

/// One distinct value of a categorical field and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetValue {
	pub value: String,
	pub label: String,
	pub count: usize,
}

/// Distinct values of one categorical filter, most frequent first.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Facet {
	values: Vec<FacetValue>,
}

impl Facet {
	#[must_use]
	pub fn values(&self) -> &[FacetValue] {
		&self.values
	}

	/// Count for `value`, or zero when it does not occur.
	#[must_use]
	pub fn count_of(&self, value: &str) -> usize {
		self.values
			.iter()
			.find(|entry| entry.value == value)
			.map_or(0, |entry| entry.count)
	}

	/// Sum of all value counts. Can be less than the item count because items
	/// with an empty field are skipped, or more for array-valued fields.
	#[must_use]
	pub fn total(&self) -> usize {
		self.values.iter().map(|entry| entry.count).sum()
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

/// Facets keyed by filter id, in spec declaration order.
pub type FacetMap = IndexMap<String, Facet>;

/// Count the values of one filter's field across `items`.
///
/// Empty and missing values are skipped. Ties keep first-seen order.
pub fn compute_facet<'a>(spec: &FilterSpec, items: impl IntoIterator<Item = &'a Item>) -> Facet {
	let mut counts: IndexMap<String, usize> = IndexMap::new();
	for item in items {
		let Some(value) = item.field(spec.field()) else {
			continue;
		};
		for text in field_values(value) {
			*counts.entry(text).or_default() += 1;
		}
	}

	let mut values: Vec<FacetValue> = counts
		.into_iter()
		.map(|(value, count)| FacetValue {
			label: spec.option_label(&value).unwrap_or(&value).to_string(),
			value,
			count,
		})
		.collect();
	// Stable sort keeps first-seen order among equal counts.
	values.sort_by(|a, b| b.count.cmp(&a.count));
	Facet { values }
}

/// Compute facets for every select and multiselect spec.
pub fn compute_facets<'a, I>(specs: &FilterSpecs, items: I) -> FacetMap
where
	I: IntoIterator<Item = &'a Item>,
	I::IntoIter: Clone,
{
	let items = items.into_iter();
	specs
		.categorical()
		.map(|spec| (spec.id().to_string(), compute_facet(spec, items.clone())))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::filter::{FilterKind, FilterOption};

	fn items() -> Vec<Item> {
		vec![
			Item::new().with("type", "Sensor").with("tags", serde_json::json!(["a", "b"])),
			Item::new().with("type", "Cámara").with("tags", serde_json::json!(["b"])),
			Item::new().with("type", "Cámara"),
			Item::new().with("type", ""),
			Item::new().with("type", "Gateway"),
			Item::new(),
		]
	}

	#[test]
	fn counts_sort_descending_with_first_seen_ties() {
		let spec = FilterSpec::new("type", FilterKind::Select);
		let items = items();
		let facet = compute_facet(&spec, &items);

		let values: Vec<(&str, usize)> = facet
			.values()
			.iter()
			.map(|entry| (entry.value.as_str(), entry.count))
			.collect();
		assert_eq!(values, vec![("Cámara", 2), ("Sensor", 1), ("Gateway", 1)]);
		assert!(facet.total() <= items.len());
	}

	#[test]
	fn array_fields_count_each_element() {
		let spec = FilterSpec::new("tags", FilterKind::Multiselect);
		let items = items();
		let facet = compute_facet(&spec, &items);
		assert_eq!(facet.count_of("b"), 2);
		assert_eq!(facet.count_of("a"), 1);
		assert_eq!(facet.count_of("c"), 0);
	}

	#[test]
	fn labels_come_from_declared_options() {
		let spec = FilterSpec::new("type", FilterKind::Select)
			.with_options(vec![FilterOption::new("Sensor", "Motion sensor")]);
		let items = items();
		let facet = compute_facet(&spec, &items);
		let sensor = facet
			.values()
			.iter()
			.find(|entry| entry.value == "Sensor")
			.expect("sensor facet");
		assert_eq!(sensor.label, "Motion sensor");
		assert_eq!(facet.values()[0].label, "Cámara");
	}

	#[test]
	fn only_categorical_specs_get_facets() {
		let specs = FilterSpecs::new([
			FilterSpec::new("name", FilterKind::Text),
			FilterSpec::new("type", FilterKind::Select),
			FilterSpec::new("tags", FilterKind::Multiselect),
		])
		.expect("unique");
		let items = items();
		let facets = compute_facets(&specs, &items);
		assert_eq!(facets.keys().collect::<Vec<_>>(), vec!["type", "tags"]);
		assert!(facets.values().flat_map(Facet::values).all(|entry| entry.count >= 1));
	}
}
