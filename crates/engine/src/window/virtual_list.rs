use std::time::{Duration, Instant};

use super::{ViewportState, WindowDescriptor, compute_window};
use crate::error::EngineError;
use crate::schedule::Throttler;

/// Where [`VirtualList::scroll_to_index`] places the target row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Align {
	#[default]
	Start,
	Center,
	End,
}

/// Stateful wrapper around [`compute_window`] fed by raw scroll events.
///
/// Scroll offsets pass through a [`Throttler`] so a continuous gesture updates
/// the window at a bounded rate. The window itself is recomputed lazily, and
/// only after the offset, viewport extent, item count or overscan changed.
#[derive(Debug)]
pub struct VirtualList {
	state: ViewportState,
	scroll: Throttler<f64>,
	cached: Option<WindowDescriptor>,
	recomputations: u64,
}

impl VirtualList {
	#[must_use]
	pub fn new(state: ViewportState, scroll_interval: Duration) -> Self {
		Self {
			state,
			scroll: Throttler::new(scroll_interval),
			cached: None,
			recomputations: 0,
		}
	}

	#[must_use]
	pub fn state(&self) -> &ViewportState {
		&self.state
	}

	/// Feed a scroll event. Returns `true` when the offset was applied right
	/// away, `false` when it is being held back by the throttle.
	pub fn scroll(&mut self, offset: f64, now: Instant) -> bool {
		match self.scroll.push(offset, now) {
			Some(offset) => {
				self.apply_offset(offset);
				true
			}
			None => false,
		}
	}

	/// Apply a held-back scroll offset once the throttle interval has elapsed.
	pub fn poll(&mut self, now: Instant) -> bool {
		match self.scroll.poll(now) {
			Some(offset) => {
				self.apply_offset(offset);
				true
			}
			None => false,
		}
	}

	/// Deadline of the held-back scroll offset, if any.
	#[must_use]
	pub fn next_deadline(&self) -> Option<Instant> {
		self.scroll.deadline()
	}

	/// # Errors
	///
	/// Returns [`EngineError::InvalidExtent`] for a non-positive extent; the
	/// previous extent is kept.
	pub fn resize(&mut self, viewport_extent: f64) -> Result<(), EngineError> {
		if viewport_extent == self.state.viewport_extent() {
			return Ok(());
		}
		self.state.set_viewport_extent(viewport_extent)?;
		self.cached = None;
		Ok(())
	}

	pub fn set_item_count(&mut self, count: usize) {
		if count != self.state.item_count() {
			self.state.set_item_count(count);
			self.cached = None;
		}
	}

	pub fn set_overscan(&mut self, overscan: usize) {
		if overscan != self.state.overscan() {
			self.state.set_overscan(overscan);
			self.cached = None;
		}
	}

	/// The current window, recomputed only if its inputs changed.
	pub fn window(&mut self) -> WindowDescriptor {
		if let Some(window) = self.cached {
			return window;
		}
		let window = compute_window(&self.state);
		self.recomputations += 1;
		self.cached = Some(window);
		window
	}

	/// How many times the window has been recomputed.
	#[must_use]
	pub fn recomputations(&self) -> u64 {
		self.recomputations
	}

	/// Pixel offset of the top edge of `index`.
	#[must_use]
	pub fn item_offset(&self, index: usize) -> f64 {
		index as f64 * self.state.item_extent()
	}

	/// Largest offset that still fills the viewport.
	#[must_use]
	pub fn max_scroll_offset(&self) -> f64 {
		let total = self.state.item_count() as f64 * self.state.item_extent();
		(total - self.state.viewport_extent()).max(0.0)
	}

	/// Jump so `index` is aligned in the viewport, bypassing the throttle.
	/// Returns the offset that was applied.
	pub fn scroll_to_index(&mut self, index: usize, align: Align) -> f64 {
		let index = index.min(self.state.item_count().saturating_sub(1));
		let top = self.item_offset(index);
		let extent = self.state.item_extent();
		let viewport = self.state.viewport_extent();
		let offset = match align {
			Align::Start => top,
			Align::Center => top - (viewport - extent) / 2.0,
			Align::End => top + extent - viewport,
		};
		let offset = offset.clamp(0.0, self.max_scroll_offset());
		self.scroll.cancel();
		self.apply_offset(offset);
		offset
	}

	/// Drop any held-back scroll event, e.g. when the host tears the list down.
	pub fn cancel(&mut self) {
		self.scroll.cancel();
	}

	fn apply_offset(&mut self, offset: f64) {
		let before = self.state.scroll_offset();
		self.state.set_scroll_offset(offset);
		if self.state.scroll_offset() != before {
			self.cached = None;
		}
	}
}
