//! Backend requests for the class graph and project info.
//!
//! Navigation can change the entity id before a fetch completes, so every
//! graph fetch is issued under a [`Ticket`] from a [`RequestTracker`] and its
//! result is applied only while that ticket is still current.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gloo_net::http::Request;
use log::{debug, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::components::class_graph::RawGraph;
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};

/// Subset of `/kb/info` this crate cares about.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectInfo {
	/// Whether the class-graph endpoint is worth calling.
	#[serde(rename = "hasClassGraphVisualization", default)]
	pub has_class_graph_visualization: bool,
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T> {
	debug!("kg-class-graph: GET {url}");
	let response = Request::get(url)
		.send()
		.await
		.map_err(|e| GraphError::Fetch(e.to_string()))?;
	if !response.ok() {
		return Err(GraphError::Fetch(format!(
			"{url} returned {} {}",
			response.status(),
			response.status_text()
		)));
	}
	response
		.json::<T>()
		.await
		.map_err(|e| GraphError::Decode(e.to_string()))
}

/// `GET <backend>/kb/info`.
pub async fn fetch_info(config: &GraphConfig) -> Result<ProjectInfo> {
	get_json(&config.endpoint("/kb/info")).await
}

/// `GET <backend>/kb/get_class_graph_data/<id>`.
pub async fn fetch_class_graph_data(config: &GraphConfig, id: &str) -> Result<RawGraph> {
	get_json(&config.endpoint(&format!("/kb/get_class_graph_data/{id}"))).await
}

/// Fetch the class graph for `id`, or `None` when there is nothing to show.
///
/// Fetch and decode failures are logged and treated as "no visualization".
pub async fn load_class_graph(config: &GraphConfig, id: &str) -> Option<RawGraph> {
	match fetch_class_graph_data(config, id).await {
		Ok(raw) if raw.is_empty() => None,
		Ok(raw) => Some(raw),
		Err(e) => {
			warn!("kg-class-graph: class graph for {id} unavailable: {e}");
			None
		}
	}
}

/// Whether the backend advertises class-graph support. Failures count as no.
pub async fn class_graph_enabled(config: &GraphConfig) -> bool {
	match fetch_info(config).await {
		Ok(info) => info.has_class_graph_visualization,
		Err(e) => {
			warn!("kg-class-graph: project info unavailable: {e}");
			false
		}
	}
}

/// Proof that a request was the latest one issued when it started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
	generation: u64,
	/// Entity the request was issued for.
	pub entity_id: String,
}

/// Last-requested-id-wins bookkeeping for in-flight fetches.
///
/// Cloning shares the underlying counter.
#[derive(Clone, Debug, Default)]
pub struct RequestTracker {
	generation: Arc<AtomicU64>,
}

impl RequestTracker {
	/// Tracker with no request issued yet.
	pub fn new() -> Self {
		Self::default()
	}

	/// Start a request for `entity_id`, invalidating every earlier ticket.
	pub fn begin(&self, entity_id: &str) -> Ticket {
		let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
		Ticket {
			generation,
			entity_id: entity_id.to_string(),
		}
	}

	/// True if no newer request or cancellation happened since `ticket` was issued.
	pub fn is_current(&self, ticket: &Ticket) -> bool {
		self.generation.load(Ordering::SeqCst) == ticket.generation
	}

	/// Hand `result` to `apply` if `ticket` is still current, otherwise drop it.
	///
	/// Returns whether `apply` ran.
	pub fn apply_if_current<T>(&self, ticket: &Ticket, result: T, apply: impl FnOnce(T)) -> bool {
		if !self.is_current(ticket) {
			debug!("kg-class-graph: discarding stale result for {}", ticket.entity_id);
			return false;
		}
		apply(result);
		true
	}

	/// Invalidate all outstanding tickets, e.g. when the view unmounts.
	pub fn cancel(&self) {
		self.generation.fetch_add(1, Ordering::SeqCst);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn later_request_wins_regardless_of_completion_order() {
		let tracker = RequestTracker::new();
		let mut displayed: Option<String> = None;

		let a = tracker.begin("A");
		let b = tracker.begin("B");

		// B resolves first, then A
		for ticket in [&b, &a] {
			if tracker.is_current(ticket) {
				displayed = Some(ticket.entity_id.clone());
			}
		}
		assert_eq!(displayed.as_deref(), Some("B"));
	}

	#[test]
	fn only_the_latest_fetch_reaches_the_view() {
		let tracker = RequestTracker::new();
		let mut shown: Vec<String> = Vec::new();

		let a = tracker.begin("A");
		let b = tracker.begin("B");
		assert!(tracker.apply_if_current(&b, "graph B".to_string(), |g| shown.push(g)));
		// A resolves late, after B is already on screen
		assert!(!tracker.apply_if_current(&a, "graph A".to_string(), |g| shown.push(g)));

		assert_eq!(shown, vec!["graph B".to_string()]);
	}

	#[test]
	fn nothing_applies_after_unmount() {
		let tracker = RequestTracker::new();
		let ticket = tracker.begin("A");
		tracker.cancel();
		let mut applied = false;
		assert!(!tracker.apply_if_current(&ticket, (), |_| applied = true));
		assert!(!applied);
	}

	#[test]
	fn cancel_drops_in_flight_results() {
		let tracker = RequestTracker::new();
		let ticket = tracker.begin("A");
		tracker.clone().cancel();
		assert!(!tracker.is_current(&ticket));
	}

	#[test]
	fn project_info_flag_defaults_to_false() {
		let info: ProjectInfo = serde_json::from_str(r#"{"graph_id": "wikidata"}"#).unwrap();
		assert!(!info.has_class_graph_visualization);
		let info: ProjectInfo =
			serde_json::from_str(r#"{"hasClassGraphVisualization": true}"#).unwrap();
		assert!(info.has_class_graph_visualization);
	}
}
