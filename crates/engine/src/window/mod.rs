//! Windowed rendering: which slice of a long list must actually exist.
//!
//! [`compute_window`] is the pure calculation; [`VirtualList`] layers cached
//! state and scroll throttling on top for hosts that feed it raw events.

mod virtual_list;

use std::ops::Range;

use serde::Serialize;

use crate::error::EngineError;

pub use virtual_list::{Align, VirtualList};

/// Scroll position and geometry of a fixed-extent list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
	scroll_offset: f64,
	viewport_extent: f64,
	item_extent: f64,
	item_count: usize,
	overscan: usize,
}

impl ViewportState {
	/// Create a viewport scrolled to the top of an empty list.
	///
	/// # Errors
	///
	/// Returns [`EngineError::InvalidExtent`] when either extent is not a
	/// positive, finite number.
	pub fn new(
		item_extent: f64,
		viewport_extent: f64,
		overscan: usize,
	) -> Result<Self, EngineError> {
		Ok(Self {
			scroll_offset: 0.0,
			viewport_extent: check_extent("viewport extent", viewport_extent)?,
			item_extent: check_extent("item extent", item_extent)?,
			item_count: 0,
			overscan,
		})
	}

	#[must_use]
	pub fn with_item_count(mut self, item_count: usize) -> Self {
		self.item_count = item_count;
		self
	}

	#[must_use]
	pub fn with_scroll_offset(mut self, scroll_offset: f64) -> Self {
		self.scroll_offset = sanitize_offset(scroll_offset);
		self
	}

	#[must_use]
	pub fn scroll_offset(&self) -> f64 {
		self.scroll_offset
	}

	#[must_use]
	pub fn viewport_extent(&self) -> f64 {
		self.viewport_extent
	}

	#[must_use]
	pub fn item_extent(&self) -> f64 {
		self.item_extent
	}

	#[must_use]
	pub fn item_count(&self) -> usize {
		self.item_count
	}

	#[must_use]
	pub fn overscan(&self) -> usize {
		self.overscan
	}

	/// Compute the window for the current state.
	#[must_use]
	pub fn window(&self) -> WindowDescriptor {
		compute_window(self)
	}

	pub(crate) fn set_scroll_offset(&mut self, offset: f64) {
		self.scroll_offset = sanitize_offset(offset);
	}

	pub(crate) fn set_viewport_extent(&mut self, extent: f64) -> Result<(), EngineError> {
		self.viewport_extent = check_extent("viewport extent", extent)?;
		Ok(())
	}

	pub(crate) fn set_item_count(&mut self, count: usize) {
		self.item_count = count;
	}

	pub(crate) fn set_overscan(&mut self, overscan: usize) {
		self.overscan = overscan;
	}
}

/// The slice of items to materialize and where to place it.
///
/// Items `[start_index, end_index)` are rendered starting at `render_offset`
/// inside a scroll container `total_extent` long.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDescriptor {
	pub start_index: usize,
	pub end_index: usize,
	pub total_extent: f64,
	pub render_offset: f64,
}

impl WindowDescriptor {
	#[must_use]
	pub fn range(&self) -> Range<usize> {
		self.start_index..self.end_index
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.end_index - self.start_index
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.start_index == self.end_index
	}
}

/// Compute the index range and pixel offset of the items that must exist.
///
/// The window spans the visible rows plus `overscan` rows on each side,
/// clamped to `[0, item_count]`. Scrolling past the end yields an empty
/// window pinned at `item_count` rather than an inverted range.
#[must_use]
pub fn compute_window(state: &ViewportState) -> WindowDescriptor {
	let count = state.item_count;
	if count == 0 {
		return WindowDescriptor::default();
	}

	let extent = state.item_extent;
	let visible = (state.viewport_extent / extent).ceil() as usize;
	let raw_start = (state.scroll_offset / extent).floor() as usize;
	let end = raw_start
		.saturating_add(visible)
		.saturating_add(state.overscan)
		.min(count);
	let start = raw_start.saturating_sub(state.overscan).min(end);

	WindowDescriptor {
		start_index: start,
		end_index: end,
		total_extent: count as f64 * extent,
		render_offset: start as f64 * extent,
	}
}

fn check_extent(name: &'static str, value: f64) -> Result<f64, EngineError> {
	if value.is_finite() && value > 0.0 {
		Ok(value)
	} else {
		Err(EngineError::InvalidExtent { name, value })
	}
}

fn sanitize_offset(offset: f64) -> f64 {
	if offset.is_finite() && offset > 0.0 {
		offset
	} else {
		0.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn viewport(count: usize, offset: f64, overscan: usize) -> ViewportState {
		ViewportState::new(80.0, 600.0, overscan)
			.expect("valid viewport")
			.with_item_count(count)
			.with_scroll_offset(offset)
	}

	#[test]
	fn empty_collection_has_empty_window() {
		let window = viewport(0, 500.0, 5).window();
		assert!(window.is_empty());
		assert_eq!(window.total_extent, 0.0);
		assert_eq!(window.render_offset, 0.0);
	}

	#[test]
	fn top_of_list_includes_trailing_overscan() {
		let window = viewport(1_000, 0.0, 5).window();
		assert_eq!(window.range(), 0..13);
		assert_eq!(window.total_extent, 80_000.0);
		assert_eq!(window.render_offset, 0.0);
	}

	#[test]
	fn middle_of_list_overscans_both_sides() {
		let window = viewport(1_000, 8_000.0, 5).window();
		assert_eq!(window.range(), 95..113);
		assert_eq!(window.render_offset, 95.0 * 80.0);
	}

	#[test]
	fn short_collection_is_clamped() {
		let window = viewport(2, 0.0, 5).window();
		assert_eq!(window.range(), 0..2);
	}

	#[test]
	fn scrolling_past_the_end_stays_in_bounds() {
		let window = viewport(10, 1_000_000.0, 3).window();
		assert!(window.start_index <= window.end_index);
		assert_eq!(window.end_index, 10);
		assert!(window.is_empty());
	}

	#[test]
	fn negative_and_nan_offsets_are_treated_as_top() {
		assert_eq!(viewport(50, -40.0, 0).scroll_offset(), 0.0);
		assert_eq!(viewport(50, f64::NAN, 0).scroll_offset(), 0.0);
	}

	#[test]
	fn invalid_extents_are_rejected() {
		let err = ViewportState::new(0.0, 600.0, 0).unwrap_err();
		assert_eq!(
			err,
			EngineError::InvalidExtent {
				name: "item extent",
				value: 0.0
			}
		);
		assert!(ViewportState::new(80.0, f64::INFINITY, 0).is_err());
	}

	#[test]
	fn window_covers_every_visible_row_and_stays_bounded() {
		let extents = [17.0, 40.0, 80.0];
		let viewports = [1.0, 100.0, 599.5, 600.0];
		for &item_extent in &extents {
			for &viewport_extent in &viewports {
				for count in [1usize, 3, 50] {
					for overscan in [1usize, 4] {
						for step in 0..200 {
							let offset = f64::from(step) * 13.7;
							let state = ViewportState::new(item_extent, viewport_extent, overscan)
								.expect("valid")
								.with_item_count(count)
								.with_scroll_offset(offset);
							let window = state.window();

							assert!(window.end_index <= count);
							assert!(window.start_index <= window.end_index);
							let visible = (viewport_extent / item_extent).ceil() as usize;
							assert!(window.len() <= visible + 2 * overscan);

							for index in 0..count {
								let top = index as f64 * item_extent;
								let bottom = top + item_extent;
								let overlaps = bottom > offset && top < offset + viewport_extent;
								if overlaps {
									assert!(
										window.range().contains(&index),
										"index {index} visible but outside {:?} (offset {offset})",
										window.range()
									);
								}
							}
						}
					}
				}
			}
		}
	}
}
