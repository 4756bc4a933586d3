//! Dialog hosting the class graph: title, legend, toolbar and canvas.

use leptos::prelude::*;
use web_sys::MouseEvent;

use super::adapter::adapt;
use super::component::{ClassGraphCanvas, GraphCommand};
use super::search::GraphSearchIndex;
use super::search_box::GraphSearch;
use super::theme::{Color, Theme};
use super::types::RawGraph;
use crate::config::GraphConfig;

#[component]
fn LegendEntry(color: Color, #[prop(into)] label: String, #[prop(optional)] arrow: bool) -> impl IntoView {
	let style = if arrow {
		format!("color: {};", color.to_css())
	} else {
		format!("background: {};", color.to_css())
	};
	let class = if arrow { "legend-arrow" } else { "legend-swatch" };
	view! {
		<p>
			<span class=class style=style>{arrow.then_some("\u{2192}")}</span>
			" "
			{label}
		</p>
	}
}

#[component]
fn Legend(theme: Theme) -> impl IntoView {
	let legend = theme.legend;
	view! {
		<div class="class-graph-legend">
			<h3>"Legend"</h3>
			<LegendEntry color=theme.highlight label="Root Node" />
			<LegendEntry color=legend.many_subclasses label="Many Subclasses" />
			<LegendEntry color=legend.few_subclasses label="Few Subclasses" />
			<LegendEntry color=legend.superclass_of label="Superclass Of" arrow=true />
			<LegendEntry color=legend.subclass_of label="Subclass Of" arrow=true />
		</div>
	}
}

/// Modal class-graph view for one entity.
///
/// The toolbar and canvas appear once `graph` holds data; each new graph
/// value mounts a fresh canvas. `loading` shows a progress indicator.
/// Clicking the backdrop or the close button runs `on_close`.
#[component]
pub fn ClassGraphViz(
	#[prop(into)] entity_id: String,
	config: GraphConfig,
	#[prop(into)] graph: Signal<Option<RawGraph>>,
	#[prop(into)] loading: Signal<bool>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	let command = RwSignal::new(None::<GraphCommand>);

	let content = move || {
		graph.get().map(|raw| {
			let graph = adapt(&raw).graph;
			let index = GraphSearchIndex::new(&graph, config.search_min_chars);
			view! {
				<div class="class-graph-toolbar">
					<GraphSearch
						index=index
						debounce_ms=config.search_debounce_ms
						on_select=move |hit| command.set(Some(GraphCommand::Focus(hit)))
					/>
					<button
						title="Reset Graph"
						on:click=move |_| command.set(Some(GraphCommand::Reset))
					>
						"Reset"
					</button>
					<button title="Close Graph" on:click=move |_| on_close.run(())>
						"Close"
					</button>
				</div>
				<div class="class-graph-stage" style="position: relative;">
					<ClassGraphCanvas
						graph=graph
						entity_id=entity_id.clone()
						config=config.clone()
						command=command
					/>
				</div>
			}
		})
	};

	view! {
		<div class="class-graph-backdrop" on:click=move |_| on_close.run(())>
			<div
				class="class-graph-dialog"
				role="dialog"
				on:click=|ev: MouseEvent| ev.stop_propagation()
			>
				<h2 class="class-graph-title">"Class Graph Visualization"</h2>
				<Legend theme=Theme::default() />
				<Show when=move || loading.get()>
					<div class="class-graph-loading">"Loading class graph\u{2026}"</div>
				</Show>
				{content}
			</div>
		</div>
	}
}
