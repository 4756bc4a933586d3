use leptos::prelude::*;

/// Landing page: entities are reached by id.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<h1>"Knowledge graph browser"</h1>
		<p>"Open " <code>"/<entity id>"</code> " to browse an entity and its class graph."</p>
	}
}
