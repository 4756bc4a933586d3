//! Force-directed layout and camera for one loaded [`Graph`].
//!
//! Wraps the `force_graph` simulation with a fixed-timestep tick loop, an
//! alpha cooling schedule, convergence detection and animated camera commands.
//! Node positions are owned here; the renderer and controller only read them.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info, warn};

use super::adapter::Graph;
use super::camera::{Camera, ViewTransform};
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};

/// Physics step length.
pub const STEP_MS: f64 = 16.0;
/// Steps beyond this per frame are dropped rather than caught up.
const MAX_STEPS_PER_FRAME: u32 = 8;
/// Minimum hit radius in screen pixels, so tiny nodes stay clickable.
const MIN_HIT_PX: f64 = 4.0;

/// Per-node payload carried through the simulation.
#[derive(Clone, Debug, Default)]
pub struct SimNode {
	slot: usize,
}

type ConvergeCallback = Box<dyn FnOnce(&mut LayoutEngine)>;

/// Owns the simulation, node positions and camera for one session.
pub struct LayoutEngine {
	config: GraphConfig,
	sim: ForceGraph<SimNode, ()>,
	graph: Graph,
	handles: Vec<DefaultNodeIdx>,
	positions: Vec<(f64, f64)>,
	camera: Camera,
	width: f64,
	height: f64,
	alpha: f64,
	energy: f64,
	running: bool,
	heated_at_ms: Option<f64>,
	last_ms: Option<f64>,
	accumulator_ms: f64,
	on_converge: Vec<ConvergeCallback>,
}

fn simulation() -> ForceGraph<SimNode, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl LayoutEngine {
	/// Empty engine for a `width` x `height` viewport, camera centered on the origin.
	pub fn new(config: GraphConfig, width: f64, height: f64) -> Self {
		Self {
			config,
			sim: simulation(),
			graph: Graph::default(),
			handles: Vec::new(),
			positions: Vec::new(),
			camera: Camera::new(ViewTransform::centered_on(0.0, 0.0, 1.0, width, height)),
			width,
			height,
			alpha: 0.0,
			energy: 0.0,
			running: false,
			heated_at_ms: None,
			last_ms: None,
			accumulator_ms: 0.0,
			on_converge: Vec::new(),
		}
	}

	/// Bind `graph` as the simulation input and start ticking.
	///
	/// Any previously loaded graph is discarded along with its simulation.
	pub fn load(&mut self, graph: Graph) {
		let mut sim = simulation();
		let mut handles = Vec::with_capacity(graph.len());
		let mut positions = Vec::with_capacity(graph.len());

		// Phyllotaxis seed: deterministic, non-overlapping, roughly circular.
		let golden = PI * (3.0 - 5.0_f64.sqrt());
		for (slot, node) in graph.nodes().iter().enumerate() {
			let radius = 10.0 * (slot as f64 + 0.5).sqrt();
			let angle = slot as f64 * golden;
			let (x, y) = (radius * angle.cos(), radius * angle.sin());
			let idx = sim.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: node.size.max(1.0) as f32,
				is_anchor: false,
				user_data: SimNode { slot },
			});
			handles.push(idx);
			positions.push((x, y));
		}
		for link in graph.links() {
			if link.source != link.target {
				sim.add_edge(handles[link.source], handles[link.target], EdgeData::default());
			}
		}

		info!(
			"kg-class-graph: layout loaded {} nodes, {} links",
			graph.len(),
			graph.links().len()
		);

		self.sim = sim;
		self.graph = graph;
		self.handles = handles;
		self.positions = positions;
		self.energy = 0.0;
		self.alpha = 1.0;
		self.running = true;
		self.heated_at_ms = None;
		self.last_ms = None;
		self.accumulator_ms = 0.0;
	}

	/// The loaded graph.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Current simulated position of `slot`.
	pub fn position(&self, slot: usize) -> Option<(f64, f64)> {
		self.positions.get(slot).copied()
	}

	/// Positions of every node, indexed by slot.
	pub fn positions(&self) -> &[(f64, f64)] {
		&self.positions
	}

	/// Camera transform as of the last [`advance`](Self::advance).
	pub fn transform(&self) -> ViewTransform {
		self.camera.transform()
	}

	/// The camera, including any transition in flight.
	pub fn camera(&self) -> &Camera {
		&self.camera
	}

	/// Logical canvas size.
	pub fn viewport(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// True while physics steps are still being taken.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Mean squared node displacement over the last step.
	pub fn energy(&self) -> f64 {
		self.energy
	}

	/// Register a one-shot callback fired on the next convergence.
	pub fn on_converge(&mut self, callback: impl FnOnce(&mut LayoutEngine) + 'static) {
		self.on_converge.push(Box::new(callback));
	}

	/// Re-inject energy without discarding current positions.
	pub fn reheat(&mut self, now_ms: f64) {
		if self.graph.is_empty() {
			return;
		}
		debug!("kg-class-graph: reheat");
		self.alpha = 1.0;
		self.running = true;
		self.heated_at_ms = Some(now_ms);
		self.last_ms = Some(now_ms);
		self.accumulator_ms = 0.0;
	}

	/// Advance camera and physics to `now_ms`. Returns true if the layout
	/// converged during this call.
	pub fn advance(&mut self, now_ms: f64) -> bool {
		self.camera.advance(now_ms);
		if !self.running {
			return false;
		}

		let heated_at = *self.heated_at_ms.get_or_insert(now_ms);
		let last = self.last_ms.replace(now_ms).unwrap_or(now_ms);
		self.accumulator_ms += (now_ms - last).max(0.0);

		let mut steps = 0;
		while self.accumulator_ms >= STEP_MS && steps < MAX_STEPS_PER_FRAME {
			self.step();
			self.accumulator_ms -= STEP_MS;
			steps += 1;
		}
		if steps == MAX_STEPS_PER_FRAME {
			self.accumulator_ms = 0.0;
		}

		let settled = steps > 0 && self.energy < self.config.energy_threshold;
		let expired = now_ms - heated_at >= self.config.cooldown_ms;
		if settled || expired {
			self.running = false;
			debug!(
				"kg-class-graph: layout converged (energy {:.4}, {:.0} ms)",
				self.energy,
				now_ms - heated_at
			);
			for callback in std::mem::take(&mut self.on_converge) {
				callback(self);
			}
			return true;
		}
		false
	}

	fn step(&mut self) {
		let dt = (STEP_MS / 1000.0) * self.alpha;
		self.sim.update(dt as f32);
		self.alpha *= 1.0 - self.config.alpha_decay;

		let previous = std::mem::take(&mut self.positions);
		let mut positions = previous.clone();
		self.sim.visit_nodes(|node| {
			positions[node.data.user_data.slot] = (node.x() as f64, node.y() as f64);
		});

		let n = positions.len().max(1) as f64;
		self.energy = positions
			.iter()
			.zip(&previous)
			.map(|((x1, y1), (x0, y0))| (x1 - x0).powi(2) + (y1 - y0).powi(2))
			.sum::<f64>()
			/ n;
		self.positions = positions;
	}

	/// Animate zoom and pan so every node is inside the viewport, `padding_px` from each edge.
	pub fn fit_to_viewport(&mut self, padding_px: f64, duration_ms: f64, now_ms: f64) {
		let Some((min_x, min_y, max_x, max_y)) = self.bounds() else {
			return;
		};
		let avail_w = (self.width - 2.0 * padding_px).max(self.width * 0.1).max(1.0);
		let avail_h = (self.height - 2.0 * padding_px).max(self.height * 0.1).max(1.0);
		let (bw, bh) = ((max_x - min_x).max(1e-6), (max_y - min_y).max(1e-6));
		let k = (avail_w / bw)
			.min(avail_h / bh)
			.clamp(self.config.min_zoom, self.config.max_zoom);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		let target = ViewTransform::centered_on(cx, cy, k, self.width, self.height);
		self.camera.animate_to(target, duration_ms, now_ms);
	}

	/// Animate pan so the node `id` is centered, keeping the zoom level the
	/// camera is currently heading for.
	///
	/// Focusing a node that is not in the graph is a programming error: it
	/// panics in debug builds and is a logged no-op otherwise.
	pub fn focus_on(&mut self, id: &str, duration_ms: f64, now_ms: f64) -> Result<()> {
		let Some((x, y)) = self.graph.slot_of(id).and_then(|slot| self.position(slot)) else {
			debug_assert!(false, "focus_on: {id:?} is not in the loaded graph");
			warn!("kg-class-graph: focus_on ignored, {id:?} not in graph");
			return Err(GraphError::InvalidFocusTarget { id: id.to_string() });
		};
		let k = self.camera.target().k;
		let target = ViewTransform::centered_on(x, y, k, self.width, self.height);
		self.camera.animate_to(target, duration_ms, now_ms);
		Ok(())
	}

	/// World-space bounding box of all nodes including their radii.
	fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		self.graph
			.nodes()
			.iter()
			.zip(&self.positions)
			.map(|(node, &(x, y))| (x - node.size, y - node.size, x + node.size, y + node.size))
			.reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
	}

	/// Update the logical canvas size. Zoom, pan and simulation are untouched.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Replace the transform directly (wheel zoom, background pan).
	pub fn set_transform(&mut self, transform: ViewTransform) {
		let k = transform.k.clamp(self.config.min_zoom, self.config.max_zoom);
		self.camera.set(ViewTransform { k, ..transform });
	}

	/// Zoom by `factor` keeping screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let t = self.camera.transform();
		let k = (t.k * factor).clamp(self.config.min_zoom, self.config.max_zoom);
		let ratio = k / t.k;
		self.camera.set(ViewTransform {
			x: sx - (sx - t.x) * ratio,
			y: sy - (sy - t.y) * ratio,
			k,
		});
	}

	/// Topmost node under screen point `(sx, sy)`.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let t = self.camera.transform();
		let (wx, wy) = t.screen_to_world(sx, sy);
		let min_r = MIN_HIT_PX / t.k;
		self.graph
			.nodes()
			.iter()
			.zip(&self.positions)
			.enumerate()
			.rev()
			.find(|(_, (node, (x, y)))| {
				let r = node.size.max(min_r);
				(x - wx).powi(2) + (y - wy).powi(2) <= r * r
			})
			.map(|(slot, _)| slot)
	}

	/// Move `slot` to world point `(x, y)` and hold it there.
	pub fn pin(&mut self, slot: usize, x: f64, y: f64) {
		let Some(&handle) = self.handles.get(slot) else {
			return;
		};
		self.sim.visit_nodes_mut(|node| {
			if node.index() == handle {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.is_anchor = true;
			}
		});
		self.positions[slot] = (x, y);
	}

	/// Stop ticking and drop pending callbacks.
	pub fn stop(&mut self) {
		self.running = false;
		self.on_converge.clear();
		info!("kg-class-graph: layout stopped");
	}
}
