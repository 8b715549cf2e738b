use log::{debug, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::LoadError;
use super::types::GraphData;

/// Fetch a graph description relative to the page and parse it.
pub async fn load_graph(url: &str) -> Result<GraphData, LoadError> {
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	debug!("Fetching graph from {url}");

	let fetch_error = |e: JsValue| LoadError::Fetch {
		url: url.into(),
		reason: describe(&e),
	};
	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(fetch_error)?
		.dyn_into()
		.map_err(fetch_error)?;
	if !response.ok() {
		return Err(LoadError::Status {
			url: url.into(),
			status: response.status(),
		});
	}

	let body_error = |e: JsValue| LoadError::Body {
		url: url.into(),
		reason: describe(&e),
	};
	let text = JsFuture::from(response.text().map_err(body_error)?)
		.await
		.map_err(body_error)?
		.as_string()
		.ok_or_else(|| LoadError::Body {
			url: url.into(),
			reason: "response body is not text".into(),
		})?;

	let data = parse_graph(&text)?;
	info!(
		"Loaded graph with {} nodes and {} links",
		data.nodes.len(),
		data.links.len()
	);
	Ok(data)
}

pub fn parse_graph(text: &str) -> Result<GraphData, LoadError> {
	let data: GraphData = serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))?;
	data.validate()?;
	Ok(data)
}

fn describe(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn malformed_json_is_a_parse_error() {
		assert!(matches!(parse_graph("{\"nodes\": ["), Err(LoadError::Parse(_))));
		assert!(matches!(parse_graph("{\"links\": []}"), Err(LoadError::Parse(_))));
	}

	#[test]
	fn parse_runs_validation() {
		let text = r#"{"nodes": [{"id": "a", "publications": [{"p": {}}]}],
			"links": [{"source": "a", "target": "b"}]}"#;
		assert!(matches!(parse_graph(text), Err(LoadError::DanglingLink { .. })));
	}
}
