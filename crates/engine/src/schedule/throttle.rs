use std::time::{Duration, Instant};

use super::{Timer, delay_from_millis};
use crate::error::EngineError;

/// Leading-edge throttle with a single trailing emission.
///
/// The first value after a quiet interval passes straight through. Values
/// arriving inside the interval replace one another; the latest is released
/// by [`poll`](Self::poll) when the interval since the last emission runs
/// out, so continuous input updates at most once per `interval`.
#[derive(Debug, Clone)]
pub struct Throttler<T> {
	interval: Duration,
	last_emit: Option<Instant>,
	timer: Timer,
	pending: Option<T>,
}

impl<T> Throttler<T> {
	#[must_use]
	pub fn new(interval: Duration) -> Self {
		Self {
			interval,
			last_emit: None,
			timer: Timer::new(),
			pending: None,
		}
	}

	/// Build a throttle from signed milliseconds.
	///
	/// # Errors
	///
	/// Returns [`EngineError::NegativeDelay`] for negative input.
	pub fn from_millis(millis: i64) -> Result<Self, EngineError> {
		delay_from_millis(millis).map(Self::new)
	}

	#[must_use]
	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Offer a value. Returns it straight back when the leading edge is open,
	/// otherwise holds it as the pending trailing value.
	pub fn push(&mut self, value: T, now: Instant) -> Option<T> {
		match self.last_emit {
			Some(last) if now.saturating_duration_since(last) < self.interval => {
				self.pending = Some(value);
				if !self.timer.is_armed() {
					self.timer.arm(last, self.interval);
				}
				None
			}
			_ => {
				self.timer.cancel();
				self.pending = None;
				self.last_emit = Some(now);
				Some(value)
			}
		}
	}

	/// Release the trailing value once its interval has elapsed.
	pub fn poll(&mut self, now: Instant) -> Option<T> {
		if !self.timer.is_due(now) {
			return None;
		}
		self.timer.cancel();
		let value = self.pending.take()?;
		self.last_emit = Some(now);
		Some(value)
	}

	/// Drop any trailing value without emitting it.
	pub fn cancel(&mut self) {
		self.timer.cancel();
		self.pending = None;
	}

	#[must_use]
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	#[must_use]
	pub fn deadline(&self) -> Option<Instant> {
		self.timer.deadline()
	}
}
