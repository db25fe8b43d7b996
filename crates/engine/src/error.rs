use thiserror::Error;

/// Errors raised when the engine is configured with arguments it cannot honour.
///
/// Every variant belongs to the "invalid argument" class: the offending call is
/// rejected outright and retrying it with the same input will fail again.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
	/// A debounce delay or throttle interval was negative.
	#[error("delay must not be negative (got {millis}ms)")]
	NegativeDelay { millis: i64 },

	/// Two filter specs in one configuration share an identifier.
	#[error("filter id '{id}' is declared more than once")]
	DuplicateFilterId { id: String },

	/// An item or viewport extent was zero, negative, or not finite.
	#[error("{name} must be a positive, finite number (got {value})")]
	InvalidExtent { name: &'static str, value: f64 },
}

impl EngineError {
	/// Whether the error belongs to the invalid-argument class.
	#[must_use]
	pub fn is_invalid_argument(&self) -> bool {
		matches!(
			self,
			Self::NegativeDelay { .. } | Self::DuplicateFilterId { .. } | Self::InvalidExtent { .. }
		)
	}
}

/// Failures crossing the persistence boundary.
///
/// The engine never propagates these to callers; they are logged and the
/// in-memory state stays authoritative.
#[derive(Debug, Error)]
pub enum PersistenceError {
	#[error("failed to read key '{key}': {reason}")]
	Read { key: String, reason: String },

	#[error("failed to write key '{key}': {reason}")]
	Write { key: String, reason: String },

	#[error("stored state under '{key}' is malformed")]
	Decode {
		key: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to encode state for '{key}'")]
	Encode {
		key: String,
		#[source]
		source: serde_json::Error,
	},
}
