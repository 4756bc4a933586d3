//! Normalizes a decoded payload into an interaction-ready [`Graph`].
//!
//! Link endpoints are resolved to node slots once, right after the fetch, and
//! per-node adjacency is kept in a side table so the wire structs stay
//! untouched. Links whose endpoints do not resolve are skipped and reported.

use std::collections::HashMap;

use log::warn;

use super::types::{ColorSpec, RawGraph};
use crate::error::{Endpoint, GraphError};

/// A node with its payload fields. Positions live in the layout engine.
#[derive(Clone, Debug)]
pub struct GraphNode {
	/// Entity id, unique within the graph.
	pub id: String,
	/// Text drawn next to the node.
	pub label: String,
	/// Hover text.
	pub tooltip: String,
	/// Radius in world units; also drives simulated mass.
	pub size: f64,
	/// Fill color, resolved against the node palette.
	pub color: ColorSpec,
}

/// A link whose endpoints have been resolved to node slots.
#[derive(Clone, Debug)]
pub struct GraphLink {
	/// Slot of the source node.
	pub source: usize,
	/// Slot of the target node; the arrowhead points here.
	pub target: usize,
	/// Stroke width in screen pixels.
	pub width: f64,
	/// Stroke color, resolved against the link palette.
	pub color: ColorSpec,
}

/// Derived adjacency for one node. `neighbors[i]` is the far end of `links[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Adjacency {
	/// Slots of adjacent nodes.
	pub neighbors: Vec<usize>,
	/// Indices into [`Graph::links`].
	pub links: Vec<usize>,
}

/// One visualization session's graph. Built once per fetch, never merged.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<GraphNode>,
	links: Vec<GraphLink>,
	adjacency: Vec<Adjacency>,
	by_id: HashMap<String, usize>,
}

impl Graph {
	/// All nodes, indexed by slot.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// All resolved links, in payload order.
	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	/// Node at `slot`.
	pub fn node(&self, slot: usize) -> Option<&GraphNode> {
		self.nodes.get(slot)
	}

	/// Slot of the node with `id`, if present.
	pub fn slot_of(&self, id: &str) -> Option<usize> {
		self.by_id.get(id).copied()
	}

	/// Adjacency of `slot`. Panics if the slot is out of range.
	pub fn adjacency(&self, slot: usize) -> &Adjacency {
		&self.adjacency[slot]
	}

	/// Neighbor slots of `slot`, in link order.
	pub fn neighbors(&self, slot: usize) -> &[usize] {
		&self.adjacency[slot].neighbors
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True if the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Result of adapting a payload: the graph plus whatever was dropped on the way.
#[derive(Debug, Default)]
pub struct Adapted {
	/// The renderable graph.
	pub graph: Graph,
	/// Skipped nodes and links, in payload order.
	pub diagnostics: Vec<GraphError>,
}

/// Builds a [`Graph`] from a decoded payload.
pub fn adapt(raw: &RawGraph) -> Adapted {
	let mut diagnostics = Vec::new();
	let mut nodes = Vec::with_capacity(raw.nodes.len());
	let mut by_id = HashMap::with_capacity(raw.nodes.len());

	for node in &raw.nodes {
		if by_id.contains_key(&node.id) {
			diagnostics.push(GraphError::DuplicateNode {
				id: node.id.clone(),
			});
			continue;
		}
		by_id.insert(node.id.clone(), nodes.len());
		nodes.push(GraphNode {
			id: node.id.clone(),
			label: node.label.clone(),
			tooltip: node.tooltip.clone(),
			size: node.size,
			color: node.color.clone(),
		});
	}

	let mut adjacency = vec![Adjacency::default(); nodes.len()];
	let mut links = Vec::with_capacity(raw.links.len());

	for (index, link) in raw.links.iter().enumerate() {
		let source = by_id.get(&link.source).copied();
		let target = by_id.get(&link.target).copied();
		let (Some(source), Some(target)) = (source, target) else {
			let (endpoint, id) = if source.is_none() {
				(Endpoint::Source, &link.source)
			} else {
				(Endpoint::Target, &link.target)
			};
			diagnostics.push(GraphError::DanglingLink {
				index,
				endpoint,
				id: id.clone(),
			});
			continue;
		};

		let slot = links.len();
		links.push(GraphLink {
			source,
			target,
			width: link.width,
			color: link.color.clone(),
		});
		adjacency[source].neighbors.push(target);
		adjacency[source].links.push(slot);
		adjacency[target].neighbors.push(source);
		adjacency[target].links.push(slot);
	}

	for d in &diagnostics {
		warn!("kg-class-graph: {d}");
	}

	Adapted {
		graph: Graph {
			nodes,
			links,
			adjacency,
			by_id,
		},
		diagnostics,
	}
}
