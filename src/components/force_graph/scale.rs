//! Visual encodings derived once from the loaded graph: node degree, radius and
//! country color.

use std::collections::HashMap;

use super::types::{GraphData, GraphLink, GraphNode};

/// d3's `schemeCategory10`.
pub const CATEGORY10: [&str; 10] = [
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub const UNMAPPED_COLOR: &str = "#999999";

pub type DegreeMap = HashMap<String, usize>;

/// Count link endpoints per node id.
pub fn degree_map(links: &[GraphLink]) -> DegreeMap {
	let mut degrees = DegreeMap::new();
	for link in links {
		*degrees.entry(link.source.clone()).or_default() += 1;
		*degrees.entry(link.target.clone()).or_default() += 1;
	}
	degrees
}

/// Linear map from a degree domain onto a pixel range, clamped to the range.
#[derive(Clone, Debug, PartialEq)]
pub struct RadiusScale {
	domain: (f64, f64),
	range: (f64, f64),
}

impl RadiusScale {
	pub fn new(degrees: &DegreeMap, range: (f64, f64)) -> Self {
		let domain = degrees
			.values()
			.fold(None, |acc: Option<(usize, usize)>, &d| match acc {
				None => Some((d, d)),
				Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
			})
			.map(|(lo, hi)| (lo as f64, hi as f64))
			.unwrap_or((0.0, 0.0));
		Self { domain, range }
	}

	pub fn radius(&self, degree: usize) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		// A collapsed domain maps everything to the middle of the range.
		let t = if d1 > d0 {
			((degree as f64 - d0) / (d1 - d0)).clamp(0.0, 1.0)
		} else {
			0.5
		};
		r0 + (r1 - r0) * t
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
	pub country: String,
	pub color: &'static str,
}

/// Ordinal scale from country to a Category10 color, in first-appearance order.
#[derive(Clone, Debug, Default)]
pub struct ColorScale {
	domain: Vec<String>,
	lookup: HashMap<String, usize>,
}

impl ColorScale {
	pub fn from_nodes(nodes: &[GraphNode]) -> Self {
		let mut scale = Self::default();
		for node in nodes {
			let country = node.country();
			if !scale.lookup.contains_key(&country) {
				scale.lookup.insert(country.clone(), scale.domain.len());
				scale.domain.push(country);
			}
		}
		scale
	}

	pub fn color(&self, country: &str) -> &'static str {
		self.lookup
			.get(country)
			.map(|&i| CATEGORY10[i % CATEGORY10.len()])
			.unwrap_or(UNMAPPED_COLOR)
	}

	pub fn entries(&self) -> Vec<LegendEntry> {
		self.domain
			.iter()
			.map(|country| LegendEntry {
				country: country.clone(),
				color: self.color(country),
			})
			.collect()
	}
}

/// Snapshot of every encoding taken at load time. Nothing here changes for the
/// rest of the session.
#[derive(Clone, Debug)]
pub struct Encodings {
	original_degree: DegreeMap,
	radius: RadiusScale,
	color: ColorScale,
}

impl Encodings {
	pub fn new(data: &GraphData, radius_range: (f64, f64)) -> Self {
		let original_degree = degree_map(&data.links);
		let radius = RadiusScale::new(&original_degree, radius_range);
		Self {
			radius,
			original_degree,
			color: ColorScale::from_nodes(&data.nodes),
		}
	}

	pub fn degree(&self, id: &str) -> usize {
		self.original_degree.get(id).copied().unwrap_or(0)
	}

	pub fn node_radius(&self, id: &str) -> f64 {
		self.radius.radius(self.degree(id))
	}

	pub fn node_color(&self, node: &GraphNode) -> &'static str {
		self.color.color(&node.country())
	}

	pub fn legend(&self) -> Vec<LegendEntry> {
		self.color.entries()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::loader::parse_graph;

	fn link(s: &str, t: &str) -> GraphLink {
		GraphLink {
			source: s.into(),
			target: t.into(),
		}
	}

	fn graph(countries: &[&str], links: &[(&str, &str)]) -> GraphData {
		let nodes = countries
			.iter()
			.enumerate()
			.map(|(i, c)| format!(r#"{{"id": "n{i}", "publications": [{{"p": {{"Country": "{c}"}}}}]}}"#))
			.collect::<Vec<_>>()
			.join(",");
		let links = links
			.iter()
			.map(|(s, t)| format!(r#"{{"source": "{s}", "target": "{t}"}}"#))
			.collect::<Vec<_>>()
			.join(",");
		parse_graph(&format!(r#"{{"nodes": [{nodes}], "links": [{links}]}}"#)).unwrap()
	}

	#[test]
	fn degree_counts_both_endpoints() {
		let degrees = degree_map(&[link("A", "B"), link("A", "C")]);
		assert_eq!(degrees["A"], 2);
		assert_eq!(degrees["B"], 1);
		assert_eq!(degrees["C"], 1);
	}

	#[test]
	fn radius_spans_range_and_is_monotonic() {
		let degrees = degree_map(&[link("A", "B"), link("A", "C"), link("A", "D"), link("B", "C")]);
		let scale = RadiusScale::new(&degrees, (5.0, 20.0));
		assert_eq!(scale.radius(1), 5.0);
		assert_eq!(scale.radius(3), 20.0);
		let mut last = 0.0;
		for d in 0..6 {
			let r = scale.radius(d);
			assert!(r >= last);
			last = r;
		}
	}

	#[test]
	fn radius_clamps_isolated_nodes_and_collapsed_domain() {
		let degrees = degree_map(&[link("A", "B"), link("A", "C")]);
		let scale = RadiusScale::new(&degrees, (5.0, 20.0));
		assert_eq!(scale.radius(0), 5.0);

		let flat = RadiusScale::new(&degree_map(&[link("A", "B")]), (5.0, 20.0));
		assert_eq!(flat.radius(1), 12.5);
		assert_eq!(RadiusScale::new(&DegreeMap::new(), (5.0, 20.0)).radius(0), 12.5);
	}

	#[test]
	fn colors_follow_first_appearance_and_wrap() {
		let countries: Vec<String> = (0..12).map(|i| format!("C{i}")).collect();
		let refs: Vec<&str> = countries.iter().map(String::as_str).collect();
		let data = graph(&refs, &[]);
		let scale = ColorScale::from_nodes(&data.nodes);
		assert_eq!(scale.color("C0"), CATEGORY10[0]);
		assert_eq!(scale.color("C9"), CATEGORY10[9]);
		assert_eq!(scale.color("C10"), CATEGORY10[0]);
		assert_eq!(scale.color("nowhere"), UNMAPPED_COLOR);
	}

	#[test]
	fn same_country_same_color() {
		let data = graph(&["Chile", "Peru", "Chile"], &[("n0", "n1")]);
		let enc = Encodings::new(&data, (5.0, 20.0));
		assert_eq!(enc.node_color(&data.nodes[0]), enc.node_color(&data.nodes[2]));
		assert_ne!(enc.node_color(&data.nodes[0]), enc.node_color(&data.nodes[1]));
		let legend = enc.legend();
		assert_eq!(legend.len(), 2);
		assert_eq!(legend[0].country, "Chile");
	}
}
