use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::spec::parse_bool;
use super::{FilterKind, FilterSpec, FilterSpecs, FilterValue, FilterValueMap};
use crate::item::{Item, field_values};

/// One active filter, prepared for repeated evaluation.
#[derive(Debug)]
enum Clause<'a> {
	Text { field: &'a str, needle: String },
	Select { field: &'a str, value: &'a str },
	Multiselect { field: &'a str, values: &'a [String] },
	Boolean { field: &'a str, value: bool },
	Date { field: &'a str, date: Option<NaiveDate> },
	Range { field: &'a str, low: f64, high: f64 },
	/// The value does not fit its filter kind; nothing matches.
	Never,
}

impl<'a> Clause<'a> {
	fn new(spec: &'a FilterSpec, value: &'a FilterValue) -> Option<Self> {
		if !value.fits(spec.kind()) {
			return Some(Self::Never);
		}
		let field = spec.field();
		let clause = match value {
			FilterValue::List(values) if values.is_empty() => return None,
			FilterValue::List(values) => Self::Multiselect { field, values },
			FilterValue::Bool(flag) => Self::Boolean {
				field,
				value: *flag,
			},
			FilterValue::Range(low, high) => Self::Range {
				field,
				low: *low,
				high: *high,
			},
			FilterValue::Text(text) => match spec.kind() {
				FilterKind::Text => Self::Text {
					field,
					needle: text.to_lowercase(),
				},
				FilterKind::Date => Self::Date {
					field,
					date: parse_date_text(text),
				},
				_ => Self::Select { field, value: text },
			},
		};
		Some(clause)
	}

	fn matches(&self, item: &Item) -> bool {
		match self {
			Self::Never => false,
			Self::Text { field, needle } => any_value(item, field, |text| {
				text.to_lowercase().contains(needle.as_str())
			}),
			Self::Select { field, value } => any_value(item, field, |text| text == *value),
			Self::Multiselect { field, values } => {
				any_value(item, field, |text| values.iter().any(|value| value == text))
			}
			Self::Boolean { field, value } => item
				.field(field)
				.and_then(coerce_bool)
				.is_some_and(|flag| flag == *value),
			Self::Date { field, date } => match (date, item.field(field).and_then(coerce_date)) {
				(Some(expected), Some(actual)) => *expected == actual,
				_ => false,
			},
			Self::Range { field, low, high } => item
				.field(field)
				.and_then(coerce_number)
				.is_some_and(|number| *low <= number && number <= *high),
		}
	}
}

/// A compiled query plus filter set, evaluated against one item at a time.
///
/// Compiling once per pass keeps the per-item cost to field reads and
/// comparisons: the query and text filters are case-folded up front and date
/// filter values parsed once.
#[derive(Debug)]
pub struct Predicate<'a> {
	needle: Option<String>,
	searchable: &'a [String],
	clauses: Vec<Clause<'a>>,
}

impl<'a> Predicate<'a> {
	/// Compile a predicate. Filter ids without a matching spec are ignored.
	#[must_use]
	pub fn new(
		query: &str,
		filters: &'a FilterValueMap,
		specs: &'a FilterSpecs,
		searchable: &'a [String],
	) -> Self {
		let query = query.trim();
		let needle = (!query.is_empty()).then(|| query.to_lowercase());
		let clauses = filters
			.iter()
			.filter_map(|(id, value)| specs.get(id).and_then(|spec| Clause::new(spec, value)))
			.collect();

		Self {
			needle,
			searchable,
			clauses,
		}
	}

	/// Whether the predicate accepts everything.
	#[must_use]
	pub fn is_unconstrained(&self) -> bool {
		self.needle.is_none() && self.clauses.is_empty()
	}

	/// Query first, then filters in the order they were set; stops at the
	/// first failure.
	#[must_use]
	pub fn matches(&self, item: &Item) -> bool {
		if let Some(needle) = &self.needle
			&& !searchable_text(item, self.searchable).contains(needle.as_str())
		{
			return false;
		}
		self.clauses.iter().all(|clause| clause.matches(item))
	}
}

/// Evaluate a single item without keeping the compiled predicate around.
#[must_use]
pub fn matches(
	item: &Item,
	query: &str,
	filters: &FilterValueMap,
	specs: &FilterSpecs,
	searchable: &[String],
) -> bool {
	Predicate::new(query, filters, specs, searchable).matches(item)
}

/// Case-folded concatenation of the searchable fields, or of every field when
/// none are declared.
fn searchable_text(item: &Item, searchable: &[String]) -> String {
	let parts: Vec<String> = if searchable.is_empty() {
		item.fields()
			.flat_map(|(_, value)| field_values(value))
			.collect()
	} else {
		searchable
			.iter()
			.filter_map(|field| item.field(field))
			.flat_map(field_values)
			.collect()
	};
	parts.join(" ").to_lowercase()
}

fn any_value(item: &Item, field: &str, mut test: impl FnMut(&str) -> bool) -> bool {
	item.field(field)
		.is_some_and(|value| field_values(value).iter().any(|text| test(text.as_str())))
}

fn coerce_bool(value: &Value) -> Option<bool> {
	match value {
		Value::Bool(flag) => Some(*flag),
		Value::Number(number) => number.as_f64().map(|number| number != 0.0),
		Value::String(text) => parse_bool(text),
		_ => None,
	}
}

fn coerce_number(value: &Value) -> Option<f64> {
	let number = match value {
		Value::Number(number) => number.as_f64()?,
		Value::String(text) => text.trim().parse::<f64>().ok()?,
		_ => return None,
	};
	number.is_finite().then_some(number)
}

/// Calendar date of a field: date strings, RFC 3339 timestamps (in their own
/// offset), or epoch milliseconds (UTC).
fn coerce_date(value: &Value) -> Option<NaiveDate> {
	match value {
		Value::String(text) => parse_date_text(text),
		Value::Number(number) => number
			.as_i64()
			.and_then(DateTime::<Utc>::from_timestamp_millis)
			.map(|stamp| stamp.date_naive()),
		_ => None,
	}
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
	let text = text.trim();
	if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
		return Some(date);
	}
	if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
		return Some(stamp.date_naive());
	}
	["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
		.map(|stamp| stamp.date())
}
