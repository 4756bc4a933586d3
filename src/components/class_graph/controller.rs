//! Maps user input onto layout/camera commands and tracks the highlighted node.
//!
//! Camera commands never queue: each one supersedes the transition in flight,
//! so the mode only records which kind of command is currently animating.

use log::debug;

use super::layout::LayoutEngine;
use super::search::SearchHit;
use crate::config::GraphConfig;
use crate::error::Result;

/// Which camera command, if any, is currently animating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	/// No command in flight.
	Idle,
	/// Fit-then-focus after a click or search selection.
	Focusing,
	/// Fit after the reset button.
	Resetting,
}

/// Turns clicks, searches and toolbar buttons into engine commands.
pub struct InteractionController {
	highlighted: Option<String>,
	mode: Mode,
	closed: bool,
	fit_padding_px: f64,
	fit_duration_ms: f64,
	focus_duration_ms: f64,
}

impl InteractionController {
	/// `current_entity` is the page's entity id, highlighted until another node is selected.
	pub fn new(config: &GraphConfig, current_entity: Option<String>) -> Self {
		Self {
			highlighted: current_entity,
			mode: Mode::Idle,
			closed: false,
			fit_padding_px: config.fit_padding_px,
			fit_duration_ms: config.fit_duration_ms,
			focus_duration_ms: config.focus_duration_ms,
		}
	}

	/// Id of the node drawn in the highlight color.
	pub fn highlighted(&self) -> Option<&str> {
		self.highlighted.as_deref()
	}

	/// Current command mode.
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// True once [`on_close`](Self::on_close) has run.
	pub fn is_closed(&self) -> bool {
		self.closed
	}

	/// Canvas click on the node in `slot`.
	pub fn on_node_click(&mut self, engine: &mut LayoutEngine, slot: usize, now_ms: f64) -> Result<()> {
		let Some(id) = engine.graph().node(slot).map(|n| n.id.clone()) else {
			return Ok(());
		};
		self.select(engine, &id, now_ms)
	}

	/// A node picked from the search dropdown.
	pub fn on_search_select(&mut self, engine: &mut LayoutEngine, hit: &SearchHit, now_ms: f64) -> Result<()> {
		self.select(engine, &hit.id, now_ms)
	}

	/// Highlight `id`, fit the whole graph, then center on the node.
	pub fn select(&mut self, engine: &mut LayoutEngine, id: &str, now_ms: f64) -> Result<()> {
		if engine.graph().slot_of(id).is_none() {
			// reports InvalidFocusTarget without touching camera or highlight
			return engine.focus_on(id, 0.0, now_ms);
		}
		debug!("kg-class-graph: select {id}");
		self.highlighted = Some(id.to_string());
		engine.fit_to_viewport(self.fit_padding_px, self.fit_duration_ms, now_ms);
		engine.focus_on(id, self.focus_duration_ms, now_ms)?;
		engine.reheat(now_ms);
		self.mode = Mode::Focusing;
		Ok(())
	}

	/// Fit the whole graph and let it resettle. Highlight is kept.
	pub fn on_reset_click(&mut self, engine: &mut LayoutEngine, now_ms: f64) {
		engine.fit_to_viewport(self.fit_padding_px, self.fit_duration_ms, now_ms);
		engine.reheat(now_ms);
		self.mode = Mode::Resetting;
	}

	/// The canvas changed size.
	pub fn on_viewport_resize(&mut self, engine: &mut LayoutEngine, width: f64, height: f64) {
		engine.resize(width, height);
	}

	/// Stop the layout and mark the session done; the host dismisses the view.
	pub fn on_close(&mut self, engine: &mut LayoutEngine) {
		engine.stop();
		self.closed = true;
		self.mode = Mode::Idle;
	}

	/// Return to idle once the camera has arrived.
	pub fn update(&mut self, engine: &LayoutEngine) {
		if self.mode != Mode::Idle && !engine.camera().is_animating() {
			self.mode = Mode::Idle;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::class_graph::adapter::adapt;
	use crate::components::class_graph::types::RawGraph;

	const SCENARIO: &str = r#"{
		"nodes": [
			{"id": "Q1", "label": "Animal", "tooltip": "Animal", "size": 10, "color": 0},
			{"id": "Q2", "label": "Dog", "tooltip": "Dog", "size": 5, "color": 1},
			{"id": "Q3", "label": "Cat", "tooltip": "Cat", "size": 5, "color": 1}
		],
		"links": [
			{"source": "Q1", "target": "Q2", "width": 1, "color": 0},
			{"source": "Q1", "target": "Q3", "width": 1, "color": 0}
		]
	}"#;

	fn setup() -> (LayoutEngine, InteractionController) {
		let raw: RawGraph = serde_json::from_str(SCENARIO).unwrap();
		let config = GraphConfig::default();
		let mut engine = LayoutEngine::new(config.clone(), 1600.0, 1200.0);
		engine.load(adapt(&raw).graph);
		let controller = InteractionController::new(&config, Some("Q1".into()));
		(engine, controller)
	}

	fn assert_target_centered_on(engine: &LayoutEngine, pos: (f64, f64)) {
		let (w, h) = engine.viewport();
		let (cx, cy) = engine.camera().target().center(w, h);
		assert!((cx - pos.0).abs() < 1e-6, "x {cx} vs {}", pos.0);
		assert!((cy - pos.1).abs() < 1e-6, "y {cy} vs {}", pos.1);
	}

	#[test]
	fn starts_highlighting_the_page_entity() {
		let (_, controller) = setup();
		assert_eq!(controller.highlighted(), Some("Q1"));
		assert_eq!(controller.mode(), Mode::Idle);
	}

	#[test]
	fn click_highlights_focuses_and_reheats() {
		let (mut engine, mut controller) = setup();
		engine.advance(0.0);
		engine.advance(10_000.0);
		assert!(!engine.is_running());

		let q2 = engine.graph().slot_of("Q2").unwrap();
		let pos = engine.position(q2).unwrap();
		controller.on_node_click(&mut engine, q2, 10_000.0).unwrap();

		assert_eq!(controller.highlighted(), Some("Q2"));
		assert_eq!(controller.mode(), Mode::Focusing);
		assert!(engine.is_running());
		assert!(engine.camera().is_animating());
		assert_target_centered_on(&engine, pos);
	}

	#[test]
	fn second_selection_supersedes_first() {
		let (mut engine, mut controller) = setup();
		controller.select(&mut engine, "Q2", 0.0).unwrap();
		engine.advance(100.0);
		engine.stop();

		let p3 = engine.position(engine.graph().slot_of("Q3").unwrap()).unwrap();
		let hit = SearchHit {
			slot: 2,
			id: "Q3".into(),
			label: "Cat".into(),
		};
		controller.on_search_select(&mut engine, &hit, 100.0).unwrap();
		engine.stop();

		assert_eq!(controller.highlighted(), Some("Q3"));
		engine.advance(5_000.0);
		let (w, h) = engine.viewport();
		let (cx, cy) = engine.transform().center(w, h);
		assert!((cx - p3.0).abs() < 1e-6);
		assert!((cy - p3.1).abs() < 1e-6);

		controller.update(&engine);
		assert_eq!(controller.mode(), Mode::Idle);
	}

	#[test]
	fn reset_keeps_highlight_and_returns_to_idle() {
		let (mut engine, mut controller) = setup();
		controller.on_reset_click(&mut engine, 0.0);
		assert_eq!(controller.mode(), Mode::Resetting);
		assert_eq!(controller.highlighted(), Some("Q1"));
		assert!(engine.is_running());

		controller.update(&engine);
		assert_eq!(controller.mode(), Mode::Resetting);
		engine.advance(GraphConfig::default().fit_duration_ms);
		controller.update(&engine);
		assert_eq!(controller.mode(), Mode::Idle);
	}

	#[test]
	fn resize_does_not_move_camera() {
		let (mut engine, mut controller) = setup();
		let before = engine.transform();
		controller.on_viewport_resize(&mut engine, 640.0, 480.0);
		assert_eq!(engine.transform(), before);
		assert_eq!(engine.viewport(), (640.0, 480.0));
	}

	#[test]
	fn close_stops_layout() {
		let (mut engine, mut controller) = setup();
		controller.on_close(&mut engine);
		assert!(controller.is_closed());
		assert!(!engine.is_running());
	}
}
