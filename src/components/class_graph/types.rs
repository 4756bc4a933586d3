//! Wire-format structures for the class-graph payload.
//!
//! These mirror the JSON served by `/kb/get_class_graph_data/<id>` and are never
//! mutated after decoding; derived data lives in [`super::adapter::Graph`].

use log::debug;
use serde::Deserialize;

/// A node color as sent by the backend.
///
/// Strings starting with `#` are literal CSS colors. Anything else (a JSON
/// integer, or a string holding one) is an index into a categorical palette.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
	/// Palette index given as a JSON number.
	Index(usize),
	/// Literal color, or a palette index encoded as a string.
	Text(String),
}

impl Default for ColorSpec {
	fn default() -> Self {
		ColorSpec::Index(0)
	}
}

impl ColorSpec {
	/// Resolve to a CSS color string against `palette`.
	pub fn resolve(&self, palette: &[&str]) -> String {
		match self {
			ColorSpec::Text(s) if s.starts_with('#') => s.clone(),
			ColorSpec::Text(s) => match s.trim().parse::<usize>() {
				Ok(i) => palette_entry(palette, i),
				Err(_) => {
					debug!("kg-class-graph: unrecognised color {s:?}, using palette[0]");
					palette_entry(palette, 0)
				}
			},
			ColorSpec::Index(i) => palette_entry(palette, *i),
		}
	}
}

fn palette_entry(palette: &[&str], index: usize) -> String {
	if palette.is_empty() {
		return "#808080".to_string();
	}
	palette[index % palette.len()].to_string()
}

fn default_size() -> f64 {
	1.0
}

/// A node as received from the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
	/// Entity or property id, e.g. `Q42`. Unique within one payload.
	pub id: String,
	/// Display label.
	#[serde(default)]
	pub label: String,
	/// Hover text.
	#[serde(default)]
	pub tooltip: String,
	/// Radius in world units; also drives simulated mass.
	#[serde(default = "default_size")]
	pub size: f64,
	/// Fill color or node palette index.
	#[serde(default)]
	pub color: ColorSpec,
}

/// A directed link between two node ids.
#[derive(Clone, Debug, Deserialize)]
pub struct RawLink {
	/// Id of the node the link starts at.
	pub source: String,
	/// Id of the node the arrow points to.
	pub target: String,
	/// Stroke width in screen pixels.
	#[serde(default = "default_size")]
	pub width: f64,
	/// Stroke color or link palette index.
	#[serde(default)]
	pub color: ColorSpec,
}

/// Complete payload. `{}` decodes to an empty graph.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawGraph {
	/// Nodes in payload order.
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	/// Links in payload order.
	#[serde(default)]
	pub links: Vec<RawLink>,
}

impl RawGraph {
	/// True when there is nothing to visualize.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const PALETTE: &[&str] = &["#000000", "#111111", "#222222", "#333333"];

	#[test]
	fn hash_prefixed_color_is_literal() {
		let c = ColorSpec::Text("#abc123".into());
		assert_eq!(c.resolve(PALETTE), "#abc123");
	}

	#[test]
	fn integer_color_indexes_palette() {
		assert_eq!(ColorSpec::Index(3).resolve(PALETTE), "#333333");
		assert_eq!(ColorSpec::Text("3".into()).resolve(PALETTE), "#333333");
	}

	#[test]
	fn index_wraps_and_garbage_falls_back() {
		assert_eq!(ColorSpec::Index(5).resolve(PALETTE), "#111111");
		assert_eq!(ColorSpec::Text("blue".into()).resolve(PALETTE), "#000000");
	}

	#[test]
	fn empty_object_decodes_to_empty_graph() {
		let g: RawGraph = serde_json::from_str("{}").unwrap();
		assert!(g.is_empty());
		assert!(g.links.is_empty());
	}

	#[test]
	fn decodes_mixed_color_kinds() {
		let json = r##"{
			"nodes": [
				{"id": "Q1", "label": "Animal", "tooltip": "Animal", "size": 10, "color": 0},
				{"id": "Q2", "label": "Dog", "tooltip": "Dog", "size": 5, "color": "#ff7f0e"}
			],
			"links": [{"source": "Q1", "target": "Q2", "width": 1, "color": 2}]
		}"##;
		let g: RawGraph = serde_json::from_str(json).unwrap();
		assert_eq!(g.nodes[0].color, ColorSpec::Index(0));
		assert_eq!(g.nodes[1].color, ColorSpec::Text("#ff7f0e".into()));
		assert_eq!(g.nodes[0].size, 10.0);
		assert_eq!(g.links[0].color, ColorSpec::Index(2));
	}
}
