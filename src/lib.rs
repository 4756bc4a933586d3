//! kg-class-graph: class-graph visualization for knowledge-graph entity pages.
//!
//! This crate provides a WASM client that shows an entity's subclass and
//! superclass neighbourhood as a force-directed graph, with search, focus
//! transitions, pan/zoom and node dragging.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod api;
pub mod components;
pub mod config;
pub mod error;
mod pages;

pub use components::class_graph::{ClassGraphCanvas, ClassGraphViz, GraphCommand, RawGraph};
pub use config::GraphConfig;
pub use error::{GraphError, Result};

use crate::pages::entity::EntityPage;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("kg-class-graph: logging initialized");
}

/// Main application component.
/// Loads the embedded config and routes entity ids to their pages.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	provide_context(GraphConfig::load());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Knowledge Graph Browser" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/:id") view=EntityPage />
			</Routes>
		</Router>
	}
}
