//! Debounced node search for the dialog toolbar.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use log::debug;
use web_sys::Event;

use super::search::{GraphSearchIndex, SearchHit};

/// Text shown in the input once an option has been picked.
fn option_label(hit: &SearchHit) -> String {
	format!("{} {}", hit.label, hit.id)
}

/// Deferred query for `value` that hands its hits to `apply`.
///
/// Holds a handle to the shared index, never a copy of it. Queries below the
/// minimum length never call `apply`.
fn deferred_query(
	index: &Rc<GraphSearchIndex>,
	value: String,
	apply: impl FnOnce(Vec<SearchHit>) + 'static,
) -> impl FnOnce() + 'static {
	let index = Rc::clone(index);
	move || {
		if let Some(hits) = index.query(&value) {
			debug!("kg-class-graph: search {value:?} -> {} hits", hits.len());
			apply(hits);
		}
	}
}

/// Search box over the loaded graph's nodes.
///
/// Typing schedules a query after `debounce_ms`; a newer keystroke replaces
/// the pending one, so only the last query of a burst runs. Queries shorter
/// than the index minimum leave the current options alone.
#[component]
pub fn GraphSearch(
	index: GraphSearchIndex,
	debounce_ms: u32,
	#[prop(into)] on_select: Callback<SearchHit>,
) -> impl IntoView {
	let index = Rc::new(index);
	let text = RwSignal::new(String::new());
	let options = RwSignal::new(index.all().to_vec());
	let open = RwSignal::new(false);
	let pending = StoredValue::new_local(None::<Timeout>);

	on_cleanup(move || pending.set_value(None));

	let on_input = move |ev: Event| {
		let value = event_target_value(&ev);
		text.set(value.clone());
		let query = deferred_query(&index, value, move |hits| {
			options.set(hits);
			open.set(true);
		});
		pending.set_value(Some(Timeout::new(debounce_ms, query)));
	};

	let pick = move |hit: SearchHit| {
		text.set(option_label(&hit));
		open.set(false);
		on_select.run(hit);
	};

	view! {
		<div class="class-graph-search">
			<input
				type="search"
				placeholder="Search for a node"
				prop:value=move || text.get()
				on:input=on_input
				on:focus=move |_| open.set(true)
				on:blur=move |_| open.set(false)
			/>
			<Show when=move || open.get() && !options.with(Vec::is_empty)>
				<ul class="class-graph-search-options">
					{move || {
						options
							.get()
							.into_iter()
							.map(|hit| {
								let chosen = hit.clone();
								view! {
									<li on:mousedown=move |_| pick(chosen.clone())>
										<b>{hit.id}</b>
										" "
										{hit.label}
									</li>
								}
							})
							.collect_view()
					}}
				</ul>
			</Show>
		</div>
	}
}
