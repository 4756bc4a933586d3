//! Client-side search over the loaded graph's nodes.

use super::adapter::Graph;

/// One search result: enough to render the option and to focus the node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
	/// Slot of the matching node.
	pub slot: usize,
	/// Node id, shown in bold.
	pub id: String,
	/// Node label.
	pub label: String,
}

/// Node list snapshot that answers search-box queries.
#[derive(Clone, Debug, Default)]
pub struct GraphSearchIndex {
	entries: Vec<SearchHit>,
	min_chars: usize,
}

impl GraphSearchIndex {
	/// Index every node of `graph`; queries need at least `min_chars` characters.
	pub fn new(graph: &Graph, min_chars: usize) -> Self {
		let entries = graph
			.nodes()
			.iter()
			.enumerate()
			.map(|(slot, node)| SearchHit {
				slot,
				id: node.id.clone(),
				label: node.label.clone(),
			})
			.collect();
		Self { entries, min_chars }
	}

	/// Nodes whose id starts with `query` or whose label contains it, in graph order.
	///
	/// Returns `None` for queries shorter than the minimum length; callers keep
	/// whatever options they were showing.
	pub fn query(&self, query: &str) -> Option<Vec<SearchHit>> {
		if query.chars().count() < self.min_chars {
			return None;
		}
		Some(
			self.entries
				.iter()
				.filter(|e| e.id.starts_with(query) || e.label.contains(query))
				.cloned()
				.collect(),
		)
	}

	/// Every node, used as the initial option list.
	pub fn all(&self) -> &[SearchHit] {
		&self.entries
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::class_graph::adapter::adapt;
	use crate::components::class_graph::types::{ColorSpec, RawGraph, RawNode};

	fn index() -> GraphSearchIndex {
		let nodes = [("Q42", "Douglas"), ("P31", "IQ42 protein"), ("X9", "none"), ("q4", "lower")]
			.into_iter()
			.map(|(id, label)| RawNode {
				id: id.into(),
				label: label.into(),
				tooltip: String::new(),
				size: 1.0,
				color: ColorSpec::Index(0),
			})
			.collect();
		let graph = adapt(&RawGraph {
			nodes,
			links: vec![],
		})
		.graph;
		GraphSearchIndex::new(&graph, 2)
	}

	#[test]
	fn matches_id_prefix_or_label_substring() {
		let hits = index().query("Q4").unwrap();
		let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
		assert_eq!(ids, vec!["Q42", "P31"]);
	}

	#[test]
	fn id_must_match_as_prefix() {
		let hits = index().query("42").unwrap();
		// "42" is inside "Q42" but not a prefix; only the label match counts
		let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
		assert_eq!(ids, vec!["P31"]);
	}

	#[test]
	fn short_query_leaves_options_alone() {
		assert_eq!(index().query("Q"), None);
		assert_eq!(index().query(""), None);
	}

	#[test]
	fn no_match_is_an_empty_list() {
		assert_eq!(index().query("zz"), Some(vec![]));
	}
}
