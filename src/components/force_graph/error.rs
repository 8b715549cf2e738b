use thiserror::Error;

/// Why the graph description could not be turned into a drawable graph.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LoadError {
	#[error("no browser window is available")]
	NoWindow,
	#[error("failed to fetch {url}: {reason}")]
	Fetch { url: String, reason: String },
	#[error("{url} responded with HTTP {status}")]
	Status { url: String, status: u16 },
	#[error("failed to read the body of {url}: {reason}")]
	Body { url: String, reason: String },
	#[error("graph description is malformed: {0}")]
	Parse(String),
	#[error("node id {0:?} appears more than once")]
	DuplicateNode(String),
	#[error("node {0:?} has no publication entries")]
	NoPublications(String),
	#[error("link {from:?} -> {to:?} references unknown node {missing:?}")]
	DanglingLink {
		from: String,
		to: String,
		missing: String,
	},
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SettingsError {
	#[error("{field} must be a number, got {value:?}")]
	NotANumber { field: &'static str, value: String },
}
