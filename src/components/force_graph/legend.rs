use leptos::prelude::*;

use super::scale::LegendEntry;

/// Country color key, one row per country.
#[component]
pub fn Legend(entries: Vec<LegendEntry>) -> impl IntoView {
	view! {
		<ul class="legend">
			{entries
				.into_iter()
				.map(|entry| {
					view! {
						<li class="legend-row">
							<span
								class="legend-swatch"
								style=format!("background-color: {}", entry.color)
							></span>
							<span class="legend-label">{entry.country}</span>
						</li>
					}
				})
				.collect_view()}
		</ul>
	}
}
