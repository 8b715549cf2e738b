use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use crate::components::force_graph::{ForceGraphCanvas, GraphData, LoadError, load_graph};

/// Served next to the app by Trunk (see `public/`).
const GRAPH_URL: &str = "graph.json";

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// Loaded once; `None` until the fetch settles.
	let graph = RwSignal::new(None::<Result<GraphData, LoadError>>);

	spawn_local(async move {
		let result = load_graph(GRAPH_URL).await;
		if let Err(e) = &result {
			error!("Could not load {GRAPH_URL}: {e}");
		}
		graph.set(Some(result));
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<div class="error-banner">
					<h1>"Uh oh! Something went wrong!"</h1>

					<p>"Errors: "</p>
					<ul>
						{move || {
							errors
								.get()
								.into_iter()
								.map(|(_, e)| view! { <li>{e.to_string()}</li> })
								.collect_view()
						}}
					</ul>
				</div>
			}
		}>

			<div class="fullscreen-graph">
				<Show when=move || graph.with(Option::is_none)>
					<p class="loading">"Loading graph..."</p>
				</Show>
				{move || {
					graph
						.get()
						.map(|loaded| {
							loaded.map(|data| view! { <ForceGraphCanvas data=data fullscreen=true /> })
						})
				}}
				<div class="graph-overlay">
					<h1>"Publication Graph"</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Scroll to zoom. Drag background to pan. Click a node for details."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
