//! Visual theming for the class graph.
//!
//! Node and link colors come from the payload (see [`super::types::ColorSpec`]);
//! the theme only supplies the categorical palettes those indices refer to,
//! plus the fixed colors the payload never overrides.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity `a`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// d3 `schemeCategory10`, used for node palette indices.
pub const CATEGORY10: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// d3 `schemeSet1`, used for link palette indices.
pub const SET1: &[&str] = &[
	"#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628", "#f781bf",
	"#999999",
];

/// Swatches shown in the dialog legend. These describe what the backend
/// sends, they do not drive rendering.
#[derive(Clone, Debug)]
pub struct LegendStyle {
	/// Classes with many subclasses.
	pub many_subclasses: Color,
	/// Classes with few subclasses.
	pub few_subclasses: Color,
	/// Arrow from a class to its superclass.
	pub superclass_of: Color,
	/// Arrow from a class to its subclass.
	pub subclass_of: Color,
}

/// Fixed colors and palettes for drawing and the legend.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill.
	pub background: Color,
	/// Plate drawn behind node labels.
	pub label_plate: Color,
	/// Fill for the node matching the highlighted entity id.
	pub highlight: Color,
	/// Palette for node color indices.
	pub node_palette: &'static [&'static str],
	/// Palette for link color indices.
	pub link_palette: &'static [&'static str],
	/// Legend swatches.
	pub legend: LegendStyle,
}

impl Theme {
	/// Light theme matching the entity pages.
	pub fn light() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			label_plate: Color::rgba(255, 255, 255, 0.85),
			highlight: Color::rgb(50, 205, 50),
			node_palette: CATEGORY10,
			link_palette: SET1,
			legend: LegendStyle {
				many_subclasses: Color::rgb(255, 127, 20),
				few_subclasses: Color::rgb(20, 119, 180),
				superclass_of: Color::rgb(190, 174, 212),
				subclass_of: Color::rgb(125, 201, 128),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_colors_render_as_hex() {
		assert_eq!(Color::rgb(50, 205, 50).to_css(), "#32cd32");
		assert_eq!(
			Color::rgba(255, 255, 255, 0.85).to_css(),
			"rgba(255, 255, 255, 0.85)"
		);
	}
}
