use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use log::info;

use crate::api::{RequestTracker, class_graph_enabled, load_class_graph};
use crate::components::class_graph::{ClassGraphViz, RawGraph};
use crate::config::GraphConfig;

/// Entity page with the class-graph affordance.
///
/// Each id change starts a new fetch and drops the previous graph. Results
/// for an id the page has since moved away from are discarded.
#[component]
pub fn EntityPage() -> impl IntoView {
	let config = use_context::<GraphConfig>().unwrap_or_default();
	let params = use_params_map();
	let entity_id = Memo::new(move |_| params.read().get("id").unwrap_or_default());

	let enabled = RwSignal::new(false);
	let loading = RwSignal::new(false);
	let graph = RwSignal::new(None::<RawGraph>);
	let open = RwSignal::new(false);
	let tracker = RequestTracker::new();

	let fetch_config = config.clone();
	let fetch_tracker = tracker.clone();
	Effect::new(move |_| {
		let id = entity_id.get();
		graph.set(None);
		open.set(false);
		if id.is_empty() {
			fetch_tracker.cancel();
			return;
		}

		let ticket = fetch_tracker.begin(&id);
		let (config, tracker) = (fetch_config.clone(), fetch_tracker.clone());
		loading.set(true);
		spawn_local(async move {
			let available = class_graph_enabled(&config).await;
			if !tracker.apply_if_current(&ticket, available, |a| enabled.set(a)) {
				return;
			}
			if !available {
				loading.set(false);
				return;
			}

			let data = load_class_graph(&config, &ticket.entity_id).await;
			tracker.apply_if_current(&ticket, data, |data| {
				if let Some(raw) = &data {
					info!(
						"kg-class-graph: loaded {} nodes, {} links for {}",
						raw.nodes.len(),
						raw.links.len(),
						ticket.entity_id
					);
				}
				loading.set(false);
				graph.set(data);
			});
		});
	});

	on_cleanup(move || tracker.cancel());

	let show_button = move || enabled.get() && (loading.get() || graph.with(Option::is_some));

	view! {
		<h1 class="entity-title">{move || entity_id.get()}</h1>
		<Show when=show_button>
			<button class="class-graph-open" title="Show class graph" on:click=move |_| open.set(true)>
				"Class graph"
			</button>
		</Show>
		<Show when=move || open.get()>
			<ClassGraphViz
				entity_id=entity_id.get_untracked()
				config=config.clone()
				graph=graph
				loading=loading
				on_close=move |_| open.set(false)
			/>
		</Show>
	}
}
