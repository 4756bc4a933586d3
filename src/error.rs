//! Error taxonomy for the class-graph subsystem.
//!
//! None of these surface to the user: data-integrity problems are logged and
//! skipped, fetch failures hide the visualization affordance.

use thiserror::Error;

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	/// The link's `source` id.
	Source,
	/// The link's `target` id.
	Target,
}

impl std::fmt::Display for Endpoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Endpoint::Source => f.write_str("source"),
			Endpoint::Target => f.write_str("target"),
		}
	}
}

/// Everything that can go wrong between the fetch and the canvas.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GraphError {
	/// A link names a node id that is not in the payload.
	#[error("link #{index}: {endpoint} {id:?} is not a node in this graph")]
	DanglingLink {
		/// Position of the link in the payload.
		index: usize,
		/// Which end failed to resolve.
		endpoint: Endpoint,
		/// The unresolved id.
		id: String,
	},

	/// A second node reused an id; the first one is kept.
	#[error("duplicate node id {id:?}")]
	DuplicateNode {
		/// The repeated id.
		id: String,
	},

	/// Network failure or non-2xx status.
	#[error("request failed: {0}")]
	Fetch(String),

	/// Response body was not the expected JSON.
	#[error("malformed response: {0}")]
	Decode(String),

	/// Focus or selection named a node outside the loaded graph.
	#[error("node {id:?} is not in the loaded graph")]
	InvalidFocusTarget {
		/// The requested id.
		id: String,
	},
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, GraphError>;
