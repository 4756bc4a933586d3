//! Per-frame drawing of the class graph.
//!
//! Rendering uses two passes for correct z-ordering:
//! 1. Links with their arrowheads
//! 2. Nodes, each as label plate, label text, then circle
//!
//! Drawing goes through [`Surface`] so the frame policy (colors, label
//! suppression, arrow placement) is independent of the browser canvas.

use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::adapter::{GraphLink, GraphNode};
use super::camera::ViewTransform;
use super::layout::LayoutEngine;
use super::scale::{ScaleConfig, ScaledValues};
use super::theme::Theme;
use crate::config::GraphConfig;

/// Immediate-mode 2D drawing primitives used by [`GraphRenderer`].
pub trait Surface {
	/// Fill the whole canvas in screen space.
	fn clear(&mut self, width: f64, height: f64, color: &str);
	/// Enter world space: subsequent coordinates are graph coordinates.
	fn begin_world(&mut self, transform: &ViewTransform);
	/// Leave world space.
	fn end_world(&mut self);
	/// CSS font for later text calls.
	fn set_font(&mut self, font: &str);
	/// Width of `text` in the current font.
	fn measure_text(&mut self, text: &str) -> f64;
	/// Axis-aligned filled rectangle.
	fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
	/// Text centered on `(x, y)`.
	fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str);
	/// Filled circle of radius `r`.
	fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: &str);
	/// Straight line segment.
	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str);
	/// Filled triangle, used for arrowheads.
	fn fill_triangle(&mut self, a: (f64, f64), b: (f64, f64), c: (f64, f64), color: &str);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64, color: &str) {
		self.set_fill_style_str(color);
		CanvasRenderingContext2d::fill_rect(self, 0.0, 0.0, width, height);
	}

	fn begin_world(&mut self, transform: &ViewTransform) {
		self.save();
		let _ = self.translate(transform.x, transform.y);
		let _ = self.scale(transform.k, transform.k);
	}

	fn end_world(&mut self) {
		self.restore();
	}

	fn set_font(&mut self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn measure_text(&mut self, text: &str) -> f64 {
		CanvasRenderingContext2d::measure_text(self, text)
			.map(|m| m.width())
			.unwrap_or(0.0)
	}

	fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
		self.set_fill_style_str(color);
		CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
	}

	fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str) {
		self.set_fill_style_str(color);
		self.set_text_align("center");
		self.set_text_baseline("middle");
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}

	fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: &str) {
		self.set_fill_style_str(color);
		self.begin_path();
		let _ = self.arc(x, y, r, 0.0, 2.0 * PI);
		self.fill();
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str) {
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn fill_triangle(&mut self, a: (f64, f64), b: (f64, f64), c: (f64, f64), color: &str) {
		self.set_fill_style_str(color);
		self.begin_path();
		self.move_to(a.0, a.1);
		self.line_to(b.0, b.1);
		self.line_to(c.0, c.1);
		self.close_path();
		self.fill();
	}
}

/// Cached label plate size for one node at one font size.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LabelPlate {
	font_px: f64,
	width: f64,
	height: f64,
}

/// Arrowhead geometry: tip plus the two base corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
	/// Point touching the target.
	pub tip: (f64, f64),
	/// Base corner on the left of the direction of travel.
	pub left: (f64, f64),
	/// Base corner on the right.
	pub right: (f64, f64),
}

/// Place an arrowhead on the segment between two node circles.
///
/// `rel_pos` runs from just outside the source circle (0.0) to touching the
/// target circle (1.0). Returns `None` for overlapping nodes.
pub fn arrow_geometry(
	from: (f64, f64),
	to: (f64, f64),
	source_r: f64,
	target_r: f64,
	length: f64,
	rel_pos: f64,
) -> Option<Arrow> {
	let (dx, dy) = (to.0 - from.0, to.1 - from.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist <= source_r + target_r || dist < 1e-9 {
		return None;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let span = (dist - source_r - target_r - length).max(0.0);
	let along = source_r + length + span * rel_pos;
	let tip = (from.0 + ux * along, from.1 + uy * along);
	let back = (tip.0 - ux * length, tip.1 - uy * length);
	let half = length / 1.6 / 2.0;
	let (px, py) = (-uy * half, ux * half);
	Some(Arrow {
		tip,
		left: (back.0 + px, back.1 + py),
		right: (back.0 - px, back.1 - py),
	})
}

/// Draws frames of a [`LayoutEngine`] and caches label sizes between them.
pub struct GraphRenderer {
	scale: ScaleConfig,
	theme: Theme,
	label_threshold: usize,
	label_cache: HashMap<usize, LabelPlate>,
}

impl GraphRenderer {
	/// Renderer using `config`'s label threshold and arrow settings.
	pub fn new(config: &GraphConfig, theme: Theme) -> Self {
		Self {
			scale: ScaleConfig::from_config(config),
			theme,
			label_threshold: config.label_threshold,
			label_cache: HashMap::new(),
		}
	}

	/// Labels are drawn for every node up to the threshold, for none above it.
	pub fn labels_visible(&self, node_count: usize) -> bool {
		node_count <= self.label_threshold
	}

	/// Fill color for `node`, with the highlighted entity overriding its palette color.
	pub fn node_color(&self, node: &GraphNode, highlighted: Option<&str>) -> String {
		if highlighted == Some(node.id.as_str()) {
			return self.theme.highlight.to_css();
		}
		node.color.resolve(self.theme.node_palette)
	}

	/// Stroke color for `link`.
	pub fn link_color(&self, link: &GraphLink) -> String {
		link.color.resolve(self.theme.link_palette)
	}

	/// Draw one frame of `engine`'s graph.
	pub fn render(
		&mut self,
		engine: &LayoutEngine,
		highlighted: Option<&str>,
		surface: &mut impl Surface,
	) {
		let (width, height) = engine.viewport();
		let transform = engine.transform();
		let scale = ScaledValues::new(&self.scale, transform.k);

		surface.clear(width, height, &self.theme.background.to_css());
		surface.begin_world(&transform);
		self.draw_links(engine, &scale, surface);
		self.draw_nodes(engine, highlighted, &scale, surface);
		surface.end_world();
	}

	fn draw_links(&self, engine: &LayoutEngine, scale: &ScaledValues, surface: &mut impl Surface) {
		let graph = engine.graph();
		for link in graph.links() {
			let (Some(from), Some(to)) = (engine.position(link.source), engine.position(link.target))
			else {
				continue;
			};
			let color = self.link_color(link);
			surface.stroke_line(from, to, link.width * scale.link_width_factor, &color);

			let (source_r, target_r) = (graph.nodes()[link.source].size, graph.nodes()[link.target].size);
			if let Some(arrow) = arrow_geometry(
				from,
				to,
				source_r,
				target_r,
				scale.arrow_length,
				scale.arrow_rel_pos,
			) {
				surface.fill_triangle(arrow.tip, arrow.left, arrow.right, &color);
			}
		}
	}

	fn draw_nodes(
		&mut self,
		engine: &LayoutEngine,
		highlighted: Option<&str>,
		scale: &ScaledValues,
		surface: &mut impl Surface,
	) {
		let graph = engine.graph();
		let show_labels = self.labels_visible(graph.len());
		if show_labels {
			surface.set_font(&scale.label_font);
		}

		for (slot, node) in graph.nodes().iter().enumerate() {
			let Some((x, y)) = engine.position(slot) else {
				continue;
			};
			let color = self.node_color(node, highlighted);

			if show_labels {
				let plate = self.label_plate(slot, node, scale, surface);
				let label_y = y - (node.size + scale.label_offset);
				surface.fill_rect(
					x - plate.width / 2.0,
					label_y - plate.height / 2.0,
					plate.width,
					plate.height,
					&self.theme.label_plate.to_css(),
				);
				surface.fill_text(&node.label, x, label_y, &color);
			}

			surface.fill_circle(x, y, node.size, &color);
		}
	}

	fn label_plate(
		&mut self,
		slot: usize,
		node: &GraphNode,
		scale: &ScaledValues,
		surface: &mut impl Surface,
	) -> LabelPlate {
		if let Some(plate) = self.label_cache.get(&slot) {
			if plate.font_px == scale.font_px {
				return *plate;
			}
		}
		let text_width = surface.measure_text(&node.label);
		let plate = LabelPlate {
			font_px: scale.font_px,
			width: text_width + scale.label_padding,
			height: scale.font_px + scale.label_padding,
		};
		self.label_cache.insert(slot, plate);
		plate
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::class_graph::adapter::adapt;
	use crate::components::class_graph::types::{ColorSpec, RawGraph, RawLink, RawNode};

	#[derive(Clone, Debug, PartialEq)]
	enum Op {
		Text { text: String, color: String },
		Circle { color: String },
		Line { width: f64, color: String },
		Triangle { color: String },
		Rect,
		Measure,
	}

	#[derive(Default)]
	struct Recording {
		ops: Vec<Op>,
	}

	impl Recording {
		fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
			self.ops.iter().filter(|op| pred(op)).count()
		}
	}

	impl Surface for Recording {
		fn clear(&mut self, _: f64, _: f64, _: &str) {}
		fn begin_world(&mut self, _: &ViewTransform) {}
		fn end_world(&mut self) {}
		fn set_font(&mut self, _: &str) {}
		fn measure_text(&mut self, text: &str) -> f64 {
			self.ops.push(Op::Measure);
			text.len() as f64 * 6.0
		}
		fn fill_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: &str) {
			self.ops.push(Op::Rect);
		}
		fn fill_text(&mut self, text: &str, _: f64, _: f64, color: &str) {
			self.ops.push(Op::Text {
				text: text.into(),
				color: color.into(),
			});
		}
		fn fill_circle(&mut self, _: f64, _: f64, _: f64, color: &str) {
			self.ops.push(Op::Circle {
				color: color.into(),
			});
		}
		fn stroke_line(&mut self, _: (f64, f64), _: (f64, f64), width: f64, color: &str) {
			self.ops.push(Op::Line {
				width,
				color: color.into(),
			});
		}
		fn fill_triangle(&mut self, _: (f64, f64), _: (f64, f64), _: (f64, f64), color: &str) {
			self.ops.push(Op::Triangle {
				color: color.into(),
			});
		}
	}

	fn node(id: &str, color: ColorSpec) -> RawNode {
		RawNode {
			id: id.into(),
			label: format!("label {id}"),
			tooltip: String::new(),
			size: 4.0,
			color,
		}
	}

	fn engine_for(raw: &RawGraph) -> LayoutEngine {
		let mut engine = LayoutEngine::new(GraphConfig::default(), 800.0, 600.0);
		engine.load(adapt(raw).graph);
		engine
	}

	fn chain(count: usize) -> RawGraph {
		RawGraph {
			nodes: (0..count)
				.map(|i| node(&format!("Q{i}"), ColorSpec::Index(i)))
				.collect(),
			links: Vec::new(),
		}
	}

	#[test]
	fn labels_drawn_up_to_threshold_and_suppressed_above() {
		let config = GraphConfig::default();
		let threshold = config.label_threshold;

		let mut renderer = GraphRenderer::new(&config, Theme::default());
		let mut at = Recording::default();
		renderer.render(&engine_for(&chain(threshold)), None, &mut at);
		assert_eq!(at.count(|op| matches!(op, Op::Text { .. })), threshold);
		assert_eq!(at.count(|op| matches!(op, Op::Rect)), threshold);

		let mut renderer = GraphRenderer::new(&config, Theme::default());
		let mut above = Recording::default();
		renderer.render(&engine_for(&chain(threshold + 1)), None, &mut above);
		assert_eq!(above.count(|op| matches!(op, Op::Text { .. })), 0);
		assert_eq!(above.count(|op| matches!(op, Op::Circle { .. })), threshold + 1);
	}

	#[test]
	fn threshold_follows_configuration() {
		let config = GraphConfig {
			label_threshold: 3,
			..GraphConfig::default()
		};
		let renderer = GraphRenderer::new(&config, Theme::default());
		assert!(renderer.labels_visible(3));
		assert!(!renderer.labels_visible(4));
	}

	#[test]
	fn highlighted_node_uses_highlight_color() {
		let raw = RawGraph {
			nodes: vec![
				node("Q1", ColorSpec::Text("#abc123".into())),
				node("Q2", ColorSpec::Index(3)),
			],
			links: vec![],
		};
		let theme = Theme::default();
		let highlight = theme.highlight.to_css();
		let mut renderer = GraphRenderer::new(&GraphConfig::default(), theme);
		let mut rec = Recording::default();
		renderer.render(&engine_for(&raw), Some("Q1"), &mut rec);

		let fills: Vec<String> = rec
			.ops
			.iter()
			.filter_map(|op| match op {
				Op::Circle { color, .. } => Some(color.clone()),
				_ => None,
			})
			.collect();
		assert_eq!(fills, vec![highlight.clone(), CATEGORY10_3.to_string()]);
		assert!(rec.ops.contains(&Op::Text {
			text: "label Q1".into(),
			color: highlight,
		}));
	}

	const CATEGORY10_3: &str = "#d62728";

	#[test]
	fn links_resolve_against_link_palette() {
		let raw = RawGraph {
			nodes: vec![node("A", ColorSpec::Index(0)), node("B", ColorSpec::Index(0))],
			links: vec![
				RawLink {
					source: "A".into(),
					target: "B".into(),
					width: 2.0,
					color: ColorSpec::Index(1),
				},
				RawLink {
					source: "B".into(),
					target: "A".into(),
					width: 1.0,
					color: ColorSpec::Text("#123456".into()),
				},
			],
		};
		let mut renderer = GraphRenderer::new(&GraphConfig::default(), Theme::default());
		let mut rec = Recording::default();
		renderer.render(&engine_for(&raw), None, &mut rec);

		assert!(rec.ops.contains(&Op::Line {
			width: 2.0,
			color: "#377eb8".into(),
		}));
		assert!(rec.ops.contains(&Op::Line {
			width: 1.0,
			color: "#123456".into(),
		}));
	}

	#[test]
	fn arrow_tip_touches_target_at_rel_pos_one() {
		let arrow = arrow_geometry((0.0, 0.0), (100.0, 0.0), 5.0, 10.0, 6.0, 1.0).unwrap();
		assert!((arrow.tip.0 - 90.0).abs() < 1e-9);
		assert_eq!(arrow.tip.1, 0.0);
		assert!((arrow.left.0 - 84.0).abs() < 1e-9);
		assert!(arrow.left.1 > 0.0 && arrow.right.1 < 0.0);

		assert!(arrow_geometry((0.0, 0.0), (3.0, 0.0), 5.0, 5.0, 6.0, 1.0).is_none());
	}

	#[test]
	fn label_sizes_are_measured_once_per_zoom_level() {
		let mut renderer = GraphRenderer::new(&GraphConfig::default(), Theme::default());
		let mut engine = engine_for(&chain(2));
		let mut rec = Recording::default();
		renderer.render(&engine, None, &mut rec);
		renderer.render(&engine, None, &mut rec);
		assert_eq!(rec.count(|op| matches!(op, Op::Measure)), 2);

		engine.zoom_at(0.0, 0.0, 2.0);
		renderer.render(&engine, None, &mut rec);
		assert_eq!(rec.count(|op| matches!(op, Op::Measure)), 4);
	}

	#[test]
	fn rendering_leaves_positions_untouched() {
		let engine = engine_for(&chain(5));
		let before = engine.positions().to_vec();
		let mut renderer = GraphRenderer::new(&GraphConfig::default(), Theme::default());
		renderer.render(&engine, Some("Q2"), &mut Recording::default());
		assert_eq!(engine.positions(), &before[..]);
	}
}
