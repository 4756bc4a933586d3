//! Zoom-dependent sizing for labels, links and arrows.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: graph coordinates. Node radii are world-space (`size`),
//!   so nodes grow when zoomed in.
//! - **Screen-space**: canvas pixels. Label text and link strokes keep a
//!   constant on-screen size by dividing by the zoom factor `k`.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`, ready for use after the
	/// canvas transform has been applied.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
		}
	}
}

/// Label sizing.
#[derive(Clone, Debug)]
pub struct LabelScaleConfig {
	/// Font size in screen pixels.
	pub font_size: f64,
	/// How the font follows zoom.
	pub font_behavior: ScaleBehavior,
	/// Gap between the node edge and the label center, world units.
	pub offset: f64,
	/// Plate padding as a fraction of the font size.
	pub padding: f64,
}

/// Link stroke and arrowhead sizing.
#[derive(Clone, Debug)]
pub struct LinkScaleConfig {
	/// How the payload stroke width follows zoom.
	pub width_behavior: ScaleBehavior,
	/// Arrow length, world units.
	pub arrow_length: f64,
	/// How the arrowhead follows zoom.
	pub arrow_behavior: ScaleBehavior,
	/// Tip position along the visible segment, 1.0 = touching the target.
	pub arrow_rel_pos: f64,
}

/// All zoom-dependent sizing rules.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Label rules.
	pub label: LabelScaleConfig,
	/// Link rules.
	pub link: LinkScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			label: LabelScaleConfig {
				font_size: 12.0,
				font_behavior: ScaleBehavior::Screen,
				offset: 5.0,
				padding: 0.2,
			},
			link: LinkScaleConfig {
				width_behavior: ScaleBehavior::Screen,
				arrow_length: 6.0,
				arrow_behavior: ScaleBehavior::World,
				arrow_rel_pos: 1.0,
			},
		}
	}
}

impl ScaleConfig {
	/// Defaults with the arrow settings taken from `config`.
	pub fn from_config(config: &crate::config::GraphConfig) -> Self {
		let mut scale = Self::default();
		scale.link.arrow_length = config.arrow_length;
		scale.link.arrow_rel_pos = config.arrow_rel_pos.clamp(0.0, 1.0);
		scale
	}
}

/// Scale values for one frame. All sizes are world-space.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Font size in world units.
	pub font_px: f64,
	/// CSS font shorthand for `font_px`.
	pub label_font: String,
	/// Gap between node edge and label center.
	pub label_offset: f64,
	/// Padding around the label plate.
	pub label_padding: f64,
	/// Arrowhead length.
	pub arrow_length: f64,
	/// Tip position along the link.
	pub arrow_rel_pos: f64,
	/// Multiply a payload link width by this to get a world-space stroke.
	pub link_width_factor: f64,
}

impl ScaledValues {
	/// Resolve `config` at zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let font_px = config
			.label
			.font_behavior
			.apply(config.label.font_size, k);
		Self {
			font_px,
			label_font: format!("{font_px}px Sans-Serif"),
			label_offset: config.label.offset,
			label_padding: font_px * config.label.padding,
			arrow_length: config
				.link
				.arrow_behavior
				.apply(config.link.arrow_length, k),
			arrow_rel_pos: config.link.arrow_rel_pos,
			link_width_factor: config.link.width_behavior.apply(1.0, k),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_sizes_shrink_in_world_space_when_zoomed_in() {
		let scale = ScaledValues::new(&ScaleConfig::default(), 2.0);
		assert_eq!(scale.font_px, 6.0);
		assert_eq!(scale.link_width_factor, 0.5);
		assert_eq!(scale.arrow_length, 6.0);
		assert_eq!(scale.label_font, "6px Sans-Serif");
	}

	#[test]
	fn world_behavior_ignores_zoom() {
		assert_eq!(ScaleBehavior::World.apply(5.0, 4.0), 5.0);
		assert_eq!(ScaleBehavior::Screen.apply(5.0, 4.0), 1.25);
	}
}
