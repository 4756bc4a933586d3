//! Tunables for the class-graph view.
//!
//! Defaults are compiled in. The backend base URL can be fixed at build time
//! through `KG_BACKEND_URL`, and any field can be overridden by a JSON document
//! embedded in the host page:
//!
//! ```html
//! <script id="class-graph-config" type="application/json">
//!   { "label_threshold": 100, "backend_url": "https://kg.example.org" }
//! </script>
//! ```

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

/// Element id of the embedded config document.
pub const CONFIG_ELEMENT_ID: &str = "class-graph-config";

/// Layout, camera, search and backend settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Labels are drawn for every node while `node_count <= label_threshold`.
	pub label_threshold: usize,
	/// Hard upper bound on ticking after a load or reheat.
	pub cooldown_ms: f64,
	/// Mean squared per-node displacement per tick below which the layout has settled.
	pub energy_threshold: f64,
	/// Fraction of `alpha` removed per physics step.
	pub alpha_decay: f64,
	/// Screen margin kept around the graph by a fit.
	pub fit_padding_px: f64,
	/// Length of a fit animation.
	pub fit_duration_ms: f64,
	/// Length of a focus animation.
	pub focus_duration_ms: f64,
	/// Arrow length in world units.
	pub arrow_length: f64,
	/// Arrow tip position along the link, 1.0 = at the target.
	pub arrow_rel_pos: f64,
	/// Quiet time after the last keystroke before a search runs.
	pub search_debounce_ms: u32,
	/// Shorter queries leave the options unchanged.
	pub search_min_chars: usize,
	/// Lower zoom bound.
	pub min_zoom: f64,
	/// Upper zoom bound.
	pub max_zoom: f64,
	/// Prefix for backend requests; empty means same origin.
	pub backend_url: String,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			label_threshold: 150,
			cooldown_ms: 5000.0,
			energy_threshold: 0.01,
			alpha_decay: 0.0228,
			fit_padding_px: 250.0,
			fit_duration_ms: 500.0,
			focus_duration_ms: 1000.0,
			arrow_length: 6.0,
			arrow_rel_pos: 1.0,
			search_debounce_ms: 500,
			search_min_chars: 2,
			min_zoom: 0.01,
			max_zoom: 1000.0,
			backend_url: option_env!("KG_BACKEND_URL").unwrap_or_default().to_string(),
		}
	}
}

impl GraphConfig {
	/// Parse an embedded config document, keeping defaults for absent fields.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Load config from the host page, falling back to defaults.
	pub fn load() -> Self {
		let Some(text) = embedded_config_text() else {
			return Self::default();
		};
		match Self::from_json(&text) {
			Ok(config) => {
				info!("kg-class-graph: loaded embedded config");
				config
			}
			Err(e) => {
				warn!("kg-class-graph: ignoring malformed embedded config: {e}");
				Self::default()
			}
		}
	}

	/// Join `path` onto the configured backend base.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}{}", self.backend_url.trim_end_matches('/'), path)
	}
}

fn embedded_config_text() -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_document_keeps_defaults() {
		let config = GraphConfig::from_json(r#"{"label_threshold": 100}"#).unwrap();
		assert_eq!(config.label_threshold, 100);
		assert_eq!(config.search_min_chars, 2);
		assert_eq!(config.fit_padding_px, 250.0);
	}

	#[test]
	fn endpoint_joins_without_double_slash() {
		let config = GraphConfig {
			backend_url: "https://kg.example.org/".into(),
			..GraphConfig::default()
		};
		assert_eq!(
			config.endpoint("/kb/info"),
			"https://kg.example.org/kb/info"
		);
	}

	#[test]
	fn malformed_document_is_an_error() {
		assert!(GraphConfig::from_json("{label_threshold: }").is_err());
	}
}
