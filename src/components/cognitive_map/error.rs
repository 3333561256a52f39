use thiserror::Error;

/// The decomposition payload could not be decoded at all.
#[derive(Error, Debug)]
pub enum PayloadError {
	#[error("Malformed graph payload: {0}")]
	Json(#[from] serde_json::Error),
}

/// Recoverable problems found while normalizing a payload. The offending
/// element is dropped (or kept with a fallback) and the rest still renders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
	#[error("Duplicate node id {0}, keeping the first occurrence")]
	DuplicateNode(String),

	#[error("Duplicate edge id {0}, keeping the first occurrence")]
	DuplicateEdge(String),

	#[error("Edge {edge} has no source/target ids")]
	MissingEndpoint { edge: String },

	#[error("Edge {edge} references unknown node {node}")]
	UnknownEndpoint { edge: String, node: String },

	#[error("Edge {edge} connects node {node} to itself")]
	SelfLoop { edge: String, node: String },

	#[error("Edge {0} has no relationship type, treating it as related")]
	MissingRelationshipType(String),

	#[error("Node {0} has a blank name")]
	BlankName(String),

	#[error("Related edge {0} has no custom name")]
	UnnamedRelated(String),
}

impl GraphIssue {
	/// Whether the element the issue refers to was left out of the graph.
	pub fn is_dropped(&self) -> bool {
		matches!(
			self,
			Self::DuplicateNode(_)
				| Self::DuplicateEdge(_)
				| Self::MissingEndpoint { .. }
				| Self::UnknownEndpoint { .. }
				| Self::SelfLoop { .. }
		)
	}
}
