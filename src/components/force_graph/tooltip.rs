use super::types::{GraphNode, Scalar};

const MISSING: &str = "n/a";

/// Labeled publication metadata for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
	pub title: String,
	pub year: String,
	pub citations: String,
	pub publisher: String,
	pub country: String,
	pub id: String,
}

impl TooltipContent {
	/// Read the node's first publication; `None` if it has none.
	pub fn for_node(node: &GraphNode) -> Option<Self> {
		let publication = node.first_publication()?;
		let show = |field: &Option<Scalar>| {
			field
				.as_ref()
				.map(ToString::to_string)
				.unwrap_or_else(|| MISSING.into())
		};
		Some(Self {
			title: show(&publication.title),
			year: show(&publication.year),
			citations: show(&publication.citations),
			publisher: show(&publication.publisher),
			country: show(&publication.country),
			id: node.id.clone(),
		})
	}

	pub fn rows(&self) -> [(&'static str, String); 6] {
		[
			("Title:", self.title.clone()),
			("Year:", self.year.clone()),
			("Citations:", self.citations.clone()),
			("Publisher:", self.publisher.clone()),
			("Country:", self.country.clone()),
			("Id:", self.id.clone()),
		]
	}
}

/// A visible tooltip anchored near the pointer, in page CSS pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub content: TooltipContent,
	pub right: f64,
	pub top: f64,
}

impl Tooltip {
	pub fn at_pointer(content: TooltipContent, page_x: f64, page_y: f64, viewport_width: f64) -> Self {
		Self {
			content,
			right: viewport_width - page_x + 10.0,
			top: page_y - 10.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_first_entry_of_first_publication() {
		let node: GraphNode = serde_json::from_str(
			r#"{"id": "n1", "publications": [
				{"first": {"Title": "On Graphs", "Year": 1999, "Citations": 40, "Publisher": "Springer", "Country": "Japan"}},
				{"second": {"Title": "Ignored"}}
			]}"#,
		)
		.unwrap();
		let content = TooltipContent::for_node(&node).unwrap();
		assert_eq!(content.title, "On Graphs");
		assert_eq!(content.year, "1999");
		assert_eq!(content.citations, "40");
		assert_eq!(content.publisher, "Springer");
		assert_eq!(content.country, "Japan");
		assert_eq!(content.rows()[5], ("Id:", "n1".to_string()));
	}

	#[test]
	fn missing_fields_show_placeholder() {
		let node: GraphNode =
			serde_json::from_str(r#"{"id": "n2", "publications": [{"p": {"Title": "Only"}}]}"#).unwrap();
		let content = TooltipContent::for_node(&node).unwrap();
		assert_eq!(content.year, MISSING);
		assert_eq!(content.country, MISSING);
	}

	#[test]
	fn positions_left_of_pointer() {
		let node: GraphNode =
			serde_json::from_str(r#"{"id": "n3", "publications": [{"p": {}}]}"#).unwrap();
		let tip = Tooltip::at_pointer(TooltipContent::for_node(&node).unwrap(), 300.0, 120.0, 1000.0);
		assert_eq!((tip.right, tip.top), (710.0, 110.0));
	}
}
