//! Fit-to-viewport zoom with a manual override.

pub const ZOOM_STEP: f64 = 0.2;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;

/// Largest scale (at most 1.0) at which the canvas fits inside the viewport.
pub fn auto_zoom(canvas_width: f64, canvas_height: f64, viewport_width: f64, viewport_height: f64) -> f64 {
	let factor = (viewport_width / canvas_width)
		.min(viewport_height / canvas_height)
		.min(1.0);
	if factor.is_finite() && factor > 0.0 {
		factor
	} else {
		1.0
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomEvent {
	In,
	Out,
	Reset,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomState {
	pub manual_override: bool,
	pub manual_factor: f64,
	pub auto_factor: f64,
}

impl ZoomState {
	/// A fresh, fitted view with no manual override.
	pub fn fitted(auto_factor: f64) -> Self {
		Self {
			manual_override: false,
			manual_factor: auto_factor,
			auto_factor,
		}
	}

	pub fn effective(&self) -> f64 {
		if self.manual_override {
			self.manual_factor
		} else {
			self.auto_factor
		}
	}

	pub fn apply(self, event: ZoomEvent) -> Self {
		match event {
			ZoomEvent::In => self.step(ZOOM_STEP),
			ZoomEvent::Out => self.step(-ZOOM_STEP),
			ZoomEvent::Reset => Self::fitted(self.auto_factor),
		}
	}

	/// Viewport changed: track the new fit but keep any manual factor.
	pub fn refit(self, auto_factor: f64) -> Self {
		Self {
			auto_factor,
			manual_factor: if self.manual_override {
				self.manual_factor
			} else {
				auto_factor
			},
			..self
		}
	}

	fn step(self, delta: f64) -> Self {
		Self {
			manual_override: true,
			manual_factor: (self.effective() + delta).clamp(MIN_ZOOM, MAX_ZOOM),
			..self
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn auto_zoom_shrinks_by_tightest_axis() {
		assert_eq!(auto_zoom(2000.0, 1000.0, 1000.0, 800.0), 0.5);
		assert_eq!(auto_zoom(1000.0, 1600.0, 1000.0, 800.0), 0.5);
	}

	#[test]
	fn auto_zoom_never_upscales() {
		assert_eq!(auto_zoom(300.0, 200.0, 1000.0, 800.0), 1.0);
	}

	#[test]
	fn auto_zoom_degenerate_inputs() {
		assert_eq!(auto_zoom(0.0, 0.0, 1000.0, 800.0), 1.0);
		assert_eq!(auto_zoom(400.0, 300.0, 0.0, 0.0), 1.0);
		assert_eq!(auto_zoom(f64::NAN, 300.0, 1000.0, 800.0), 1.0);
	}

	#[test]
	fn manual_steps_are_clamped() {
		let mut zoom = ZoomState::fitted(1.0);
		for _ in 0..10 {
			zoom = zoom.apply(ZoomEvent::In);
		}
		assert!(zoom.manual_override);
		assert_eq!(zoom.effective(), MAX_ZOOM);

		for _ in 0..10 {
			zoom = zoom.apply(ZoomEvent::Out);
		}
		assert_eq!(zoom.effective(), MIN_ZOOM);
	}

	#[test]
	fn step_starts_from_fitted_value() {
		let zoom = ZoomState::fitted(0.8).apply(ZoomEvent::In);
		assert!(close(zoom.effective(), 1.0));

		let zoom = ZoomState::fitted(0.3).apply(ZoomEvent::In);
		assert_eq!(zoom.effective(), MIN_ZOOM);
	}

	#[test]
	fn reset_returns_to_current_fit() {
		let zoom = ZoomState::fitted(0.7)
			.apply(ZoomEvent::In)
			.refit(0.6)
			.apply(ZoomEvent::Reset);
		assert!(!zoom.manual_override);
		assert_eq!(zoom.effective(), 0.6);
	}

	#[test]
	fn refit_keeps_manual_override() {
		let zoom = ZoomState::fitted(1.0).apply(ZoomEvent::Out).refit(0.4);
		assert!(zoom.manual_override);
		assert!(close(zoom.effective(), 0.8));
		assert_eq!(zoom.auto_factor, 0.4);

		let zoom = ZoomState::fitted(1.0).refit(0.4);
		assert_eq!(zoom.effective(), 0.4);
	}
}
