use leptos::html::Input;
use leptos::prelude::*;
use log::warn;

use super::error::SettingsError;
use super::simulation::ForceSettings;

fn parse_field(field: &'static str, raw: &str) -> Result<f64, SettingsError> {
	raw.trim()
		.parse::<f64>()
		.ok()
		.filter(|v| v.is_finite())
		.ok_or_else(|| SettingsError::NotANumber {
			field,
			value: raw.into(),
		})
}

/// Read the three form fields into force settings.
pub fn parse_settings(link: &str, collide: &str, charge: &str) -> Result<ForceSettings, SettingsError> {
	Ok(ForceSettings {
		link_strength: parse_field("linkStrength", link)?,
		collide_strength: parse_field("collideForce", collide)?,
		charge_strength: parse_field("chargeForce", charge)?,
	})
}

/// Force parameter form. Invalid input is logged and not applied.
#[component]
pub fn SettingsPanel<F, S>(defaults: ForceSettings, on_apply: F, on_stop: S) -> impl IntoView
where
	F: Fn(ForceSettings) + 'static,
	S: Fn() + 'static,
{
	let link_ref = NodeRef::<Input>::new();
	let collide_ref = NodeRef::<Input>::new();
	let charge_ref = NodeRef::<Input>::new();

	let apply = move |_| {
		let read = |r: NodeRef<Input>| r.get().map(|el| el.value()).unwrap_or_default();
		match parse_settings(&read(link_ref), &read(collide_ref), &read(charge_ref)) {
			Ok(settings) => on_apply(settings),
			Err(e) => warn!("Ignoring force settings: {e}"),
		}
	};

	view! {
		<form class="graph-settings" on:submit=|ev| ev.prevent_default()>
			<label>
				"Link strength"
				<input id="linkStrength" type="number" step="0.1"
					value=defaults.link_strength.to_string() node_ref=link_ref />
			</label>
			<label>
				"Collide force"
				<input id="collideForce" type="number" step="0.1" min="0" max="1"
					value=defaults.collide_strength.to_string() node_ref=collide_ref />
			</label>
			<label>
				"Charge force"
				<input id="chargeForce" type="number" step="1"
					value=defaults.charge_strength.to_string() node_ref=charge_ref />
			</label>
			<button id="applyChanges" type="button" on:click=apply>"Apply"</button>
			<button id="stopLayout" type="button" on:click=move |_| on_stop()>"Freeze layout"</button>
		</form>
	}
}
