use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current time for scheduling decisions.
pub trait Clock {
	fn now(&self) -> Instant;
}

/// Wall-clock time from [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test (or a host that drives
/// its own frame clock) can keep one handle and give another to the engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
	now: Rc<Cell<Instant>>,
}

impl ManualClock {
	#[must_use]
	pub fn new() -> Self {
		Self {
			now: Rc::new(Cell::new(Instant::now())),
		}
	}

	/// Move the clock forward by `by`.
	pub fn advance(&self, by: Duration) {
		self.now.set(self.now.get() + by);
	}

	/// Move the clock forward by `millis` milliseconds.
	pub fn advance_millis(&self, millis: u64) {
		self.advance(Duration::from_millis(millis));
	}
}

impl Default for ManualClock {
	fn default() -> Self {
		Self::new()
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Instant {
		self.now.get()
	}
}
