use std::time::{Duration, Instant};

/// A single cancellable deadline.
///
/// Re-arming replaces the previous deadline, so at most one emission is ever
/// outstanding per timer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
	deadline: Option<Instant>,
}

impl Timer {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Arm the timer to fire `delay` after `now`.
	pub fn arm(&mut self, now: Instant, delay: Duration) {
		// Delays too large for `Instant` fire on the next poll instead of panicking.
		self.deadline = Some(now.checked_add(delay).unwrap_or(now));
	}

	/// Disarm the timer. Safe to call when nothing is armed.
	pub fn cancel(&mut self) {
		self.deadline = None;
	}

	#[must_use]
	pub fn is_armed(&self) -> bool {
		self.deadline.is_some()
	}

	#[must_use]
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Whether the armed deadline has been reached at `now`.
	#[must_use]
	pub fn is_due(&self, now: Instant) -> bool {
		self.deadline.is_some_and(|deadline| now >= deadline)
	}

	/// Time left until the deadline, or `None` when disarmed.
	#[must_use]
	pub fn remaining(&self, now: Instant) -> Option<Duration> {
		self.deadline
			.map(|deadline| deadline.saturating_duration_since(now))
	}
}
