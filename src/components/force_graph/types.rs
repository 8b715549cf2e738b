use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::LoadError;

/// Country used for nodes whose first publication does not name one.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A JSON scalar shown verbatim in the tooltip (titles, years, citation counts).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
	Number(serde_json::Number),
	Text(String),
	Flag(bool),
}

impl fmt::Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Scalar::Number(n) => write!(f, "{n}"),
			Scalar::Text(s) => f.write_str(s),
			Scalar::Flag(b) => write!(f, "{b}"),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Publication {
	#[serde(rename = "Title", default)]
	pub title: Option<Scalar>,
	#[serde(rename = "Year", default)]
	pub year: Option<Scalar>,
	#[serde(rename = "Citations", default)]
	pub citations: Option<Scalar>,
	#[serde(rename = "Publisher", default)]
	pub publisher: Option<Scalar>,
	#[serde(rename = "Country", default)]
	pub country: Option<Scalar>,
}

/// One entry of a node's `publications` list: labels mapped to records, in
/// document order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct PublicationRecord {
	pub entries: Vec<(String, Publication)>,
}

impl TryFrom<Map<String, Value>> for PublicationRecord {
	type Error = serde_json::Error;

	fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
		let entries = map
			.into_iter()
			.map(|(label, value)| serde_json::from_value::<Publication>(value).map(|p| (label, p)))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self { entries })
	}
}

impl PublicationRecord {
	pub fn first(&self) -> Option<&Publication> {
		self.entries.first().map(|(_, publication)| publication)
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	#[serde(deserialize_with = "node_id")]
	pub id: String,
	#[serde(default)]
	pub publications: Vec<PublicationRecord>,
}

impl GraphNode {
	/// The record every per-node encoding reads: first entry of the first
	/// publication.
	pub fn first_publication(&self) -> Option<&Publication> {
		self.publications.first().and_then(PublicationRecord::first)
	}

	pub fn country(&self) -> String {
		self.first_publication()
			.and_then(|p| p.country.as_ref())
			.map(ToString::to_string)
			.unwrap_or_else(|| UNKNOWN_COUNTRY.into())
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	#[serde(deserialize_with = "node_id")]
	pub source: String,
	#[serde(deserialize_with = "node_id")]
	pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Check the invariants the JSON shape cannot express.
	pub fn validate(&self) -> Result<(), LoadError> {
		let mut ids = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !ids.insert(node.id.as_str()) {
				return Err(LoadError::DuplicateNode(node.id.clone()));
			}
			if node.first_publication().is_none() {
				return Err(LoadError::NoPublications(node.id.clone()));
			}
		}
		for link in &self.links {
			for end in [&link.source, &link.target] {
				if !ids.contains(end.as_str()) {
					return Err(LoadError::DanglingLink {
						from: link.source.clone(),
						to: link.target.clone(),
						missing: end.clone(),
					});
				}
			}
		}
		Ok(())
	}
}

/// Node ids show up both as strings and as bare numbers in exported graphs.
fn node_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	match Scalar::deserialize(deserializer)? {
		Scalar::Text(s) => Ok(s),
		other => Ok(other.to_string()),
	}
}
