//! Pan/zoom transform and animated camera transitions.
//!
//! A camera command replaces whatever transition is in flight. The new
//! transition starts from the transform as it is at that instant, so the camera
//! always heads for the most recent target and never replays older ones.

/// Pan and zoom transform applied to the whole graph view.
///
/// `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal screen offset of the world origin.
	pub x: f64,
	/// Vertical screen offset of the world origin.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Transform that centers world point `(wx, wy)` in a `width` x `height` viewport at zoom `k`.
	pub fn centered_on(wx: f64, wy: f64, k: f64, width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0 - wx * k,
			y: height / 2.0 - wy * k,
			k,
		}
	}

	/// Canvas pixel to graph coordinates.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Graph coordinates to canvas pixel.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// World point currently at the center of the viewport.
	pub fn center(&self, width: f64, height: f64) -> (f64, f64) {
		self.screen_to_world(width / 2.0, height / 2.0)
	}

	fn lerp(&self, other: &ViewTransform, t: f64) -> Self {
		Self {
			x: self.x + (other.x - self.x) * t,
			y: self.y + (other.y - self.y) * t,
			k: self.k + (other.k - self.k) * t,
		}
	}
}

fn ease_in_out_quad(t: f64) -> f64 {
	if t < 0.5 {
		2.0 * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
	}
}

#[derive(Clone, Debug)]
struct Transition {
	from: ViewTransform,
	to: ViewTransform,
	start_ms: f64,
	duration_ms: f64,
}

impl Transition {
	fn sample(&self, now_ms: f64) -> (ViewTransform, bool) {
		if self.duration_ms <= 0.0 {
			return (self.to, true);
		}
		let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
		if t >= 1.0 {
			(self.to, true)
		} else {
			(self.from.lerp(&self.to, ease_in_out_quad(t)), false)
		}
	}
}

/// Camera state: the live transform plus at most one transition.
#[derive(Clone, Debug, Default)]
pub struct Camera {
	transform: ViewTransform,
	transition: Option<Transition>,
}

impl Camera {
	/// Camera resting at `transform`.
	pub fn new(transform: ViewTransform) -> Self {
		Self {
			transform,
			transition: None,
		}
	}

	/// Live transform, interpolated as of the last advance.
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Where the camera is heading: the transition target, or the live transform.
	pub fn target(&self) -> ViewTransform {
		self.transition
			.as_ref()
			.map(|t| t.to)
			.unwrap_or(self.transform)
	}

	/// True while a transition is in flight.
	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Start moving towards `to`, superseding any transition in flight.
	pub fn animate_to(&mut self, to: ViewTransform, duration_ms: f64, now_ms: f64) {
		self.advance(now_ms);
		self.transition = Some(Transition {
			from: self.transform,
			to,
			start_ms: now_ms,
			duration_ms,
		});
		self.advance(now_ms);
	}

	/// Jump to `to`, cancelling any transition. Used by direct pan/zoom input.
	pub fn set(&mut self, to: ViewTransform) {
		self.transition = None;
		self.transform = to;
	}

	/// Progress the transition to `now_ms`.
	pub fn advance(&mut self, now_ms: f64) {
		let Some(transition) = &self.transition else {
			return;
		};
		let (transform, done) = transition.sample(now_ms);
		self.transform = transform;
		if done {
			self.transition = None;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn centered_on_maps_point_to_viewport_center() {
		let t = ViewTransform::centered_on(10.0, -5.0, 2.0, 800.0, 600.0);
		assert_eq!(t.world_to_screen(10.0, -5.0), (400.0, 300.0));
		assert_eq!(t.center(800.0, 600.0), (10.0, -5.0));
	}

	#[test]
	fn transition_reaches_target_after_duration() {
		let mut cam = Camera::default();
		let to = ViewTransform {
			x: 100.0,
			y: 50.0,
			k: 2.0,
		};
		cam.animate_to(to, 500.0, 0.0);
		cam.advance(250.0);
		assert!(cam.is_animating());
		assert!(cam.transform().x > 0.0 && cam.transform().x < 100.0);
		cam.advance(500.0);
		assert!(!cam.is_animating());
		assert_eq!(cam.transform(), to);
	}

	#[test]
	fn new_command_supersedes_transition_in_flight() {
		let mut cam = Camera::default();
		let a = ViewTransform::centered_on(-300.0, 0.0, 1.0, 800.0, 600.0);
		let b = ViewTransform::centered_on(300.0, 0.0, 1.0, 800.0, 600.0);
		cam.animate_to(a, 1000.0, 0.0);
		cam.advance(100.0);
		cam.animate_to(b, 1000.0, 100.0);
		assert_eq!(cam.target(), b);

		cam.advance(1100.0);
		assert_eq!(cam.transform(), b);
		// stays put afterwards, nothing of `a` left queued
		cam.advance(5000.0);
		assert_eq!(cam.transform(), b);
	}

	#[test]
	fn set_cancels_transition() {
		let mut cam = Camera::default();
		cam.animate_to(
			ViewTransform {
				x: 10.0,
				y: 10.0,
				k: 3.0,
			},
			1000.0,
			0.0,
		);
		let manual = ViewTransform {
			x: -4.0,
			y: 2.0,
			k: 1.5,
		};
		cam.set(manual);
		cam.advance(2000.0);
		assert_eq!(cam.transform(), manual);
	}

	#[test]
	fn zero_duration_jumps_immediately() {
		let mut cam = Camera::default();
		let to = ViewTransform {
			x: 1.0,
			y: 2.0,
			k: 3.0,
		};
		cam.animate_to(to, 0.0, 42.0);
		assert_eq!(cam.transform(), to);
		assert!(!cam.is_animating());
	}
}
