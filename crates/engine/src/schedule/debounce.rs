use std::time::{Duration, Instant};

use super::{Timer, delay_from_millis};
use crate::error::EngineError;

/// Trailing-edge debouncer.
///
/// Each [`push`](Self::push) replaces the pending value and restarts the
/// delay; the value is released by [`poll`](Self::poll) once `delay` has
/// elapsed without further input.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
	delay: Duration,
	timer: Timer,
	pending: Option<T>,
}

impl<T> Debouncer<T> {
	#[must_use]
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			timer: Timer::new(),
			pending: None,
		}
	}

	/// Build a debouncer from signed milliseconds.
	///
	/// # Errors
	///
	/// Returns [`EngineError::NegativeDelay`] for negative input.
	pub fn from_millis(millis: i64) -> Result<Self, EngineError> {
		delay_from_millis(millis).map(Self::new)
	}

	#[must_use]
	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Supersede any pending value and restart the quiet period.
	pub fn push(&mut self, value: T, now: Instant) {
		self.pending = Some(value);
		self.timer.arm(now, self.delay);
	}

	/// Release the pending value if the quiet period has elapsed.
	pub fn poll(&mut self, now: Instant) -> Option<T> {
		if !self.timer.is_due(now) {
			return None;
		}
		self.timer.cancel();
		self.pending.take()
	}

	/// Release the pending value immediately, regardless of the deadline.
	pub fn flush(&mut self) -> Option<T> {
		self.timer.cancel();
		self.pending.take()
	}

	/// Drop the pending value without emitting it.
	pub fn cancel(&mut self) {
		self.timer.cancel();
		self.pending = None;
	}

	#[must_use]
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	#[must_use]
	pub fn pending(&self) -> Option<&T> {
		self.pending.as_ref()
	}

	#[must_use]
	pub fn deadline(&self) -> Option<Instant> {
		self.timer.deadline()
	}
}
