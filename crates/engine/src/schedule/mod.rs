//! Rate-limiting primitives used to defer work triggered by rapid input.
//!
//! Nothing here spawns threads or registers OS timers. A [`Timer`] is a
//! deadline that the owner polls against a [`Clock`], which keeps every
//! scheduled emission on the same logical thread that delivered the input and
//! makes cancellation a plain state change.

mod clock;
mod debounce;
mod throttle;
mod timer;

use std::time::Duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::Debouncer;
pub use throttle::Throttler;
pub use timer::Timer;

use crate::error::EngineError;

/// Convert signed milliseconds from configuration into a [`Duration`].
///
/// # Errors
///
/// Returns [`EngineError::NegativeDelay`] when `millis` is below zero.
pub fn delay_from_millis(millis: i64) -> Result<Duration, EngineError> {
	u64::try_from(millis)
		.map(Duration::from_millis)
		.map_err(|_| EngineError::NegativeDelay { millis })
}
