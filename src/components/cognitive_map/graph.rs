use std::collections::{HashMap, HashSet};

use log::{info, warn};

use super::error::{GraphIssue, PayloadError};
use super::types::{GraphPayload, Point, RelationshipType};

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub name: String,
	pub description: Option<String>,
	/// Starting coordinates supplied with the payload, if finite.
	pub seed: Option<Point>,
}

/// A directed relationship; endpoints are indices into [`Graph::nodes`].
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: String,
	pub source: usize,
	pub target: usize,
	pub relationship_type: RelationshipType,
	pub custom_name: Option<String>,
}

impl Edge {
	pub fn label(&self) -> &str {
		match self.custom_name.as_deref() {
			Some(name) if !name.trim().is_empty() => name,
			_ => self.relationship_type.label(),
		}
	}
}

/// A validated cognitive map: unique ids, every edge endpoint resolved.
/// Edge order is paint order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	index: HashMap<String, usize>,
}

impl Graph {
	/// Normalize a payload, logging and discarding whatever cannot be rendered.
	pub fn from_payload(payload: &GraphPayload) -> Self {
		let (graph, issues) = Self::validate(payload);
		for issue in &issues {
			warn!("cognitive map: {}", issue);
		}
		let dropped = issues.iter().filter(|i| i.is_dropped()).count();
		if dropped > 0 {
			info!("cognitive map: {} invalid elements left out", dropped);
		}
		graph
	}

	pub fn from_json(json: &str) -> Result<Self, PayloadError> {
		Ok(Self::from_payload(&GraphPayload::from_json(json)?))
	}

	/// Like [`Graph::from_payload`], returning the issues instead of logging them.
	pub fn validate(payload: &GraphPayload) -> (Self, Vec<GraphIssue>) {
		let mut graph = Graph::default();
		let mut issues = Vec::new();

		for (i, raw) in payload.nodes.iter().enumerate() {
			let id = raw
				.id
				.clone()
				.filter(|id| !id.is_empty())
				.unwrap_or_else(|| format!("node_{}", i));
			if graph.index.contains_key(&id) {
				issues.push(GraphIssue::DuplicateNode(id));
				continue;
			}
			if raw.name.trim().is_empty() {
				issues.push(GraphIssue::BlankName(id.clone()));
			}
			let seed = match (raw.x, raw.y) {
				(Some(x), Some(y)) => Some(Point::new(x, y)).filter(Point::is_finite),
				_ => None,
			};
			graph.index.insert(id.clone(), graph.nodes.len());
			graph.nodes.push(Node {
				id,
				name: raw.name.clone(),
				description: raw.description.clone().filter(|d| !d.trim().is_empty()),
				seed,
			});
		}

		let mut edge_ids = HashSet::new();
		for (i, raw) in payload.edges.iter().enumerate() {
			let id = raw
				.id
				.clone()
				.filter(|id| !id.is_empty())
				.unwrap_or_else(|| format!("edge_{}", i));
			if edge_ids.contains(&id) {
				issues.push(GraphIssue::DuplicateEdge(id));
				continue;
			}
			let (Some(source_id), Some(target_id)) = (raw.source.as_ref(), raw.target.as_ref())
			else {
				issues.push(GraphIssue::MissingEndpoint { edge: id });
				continue;
			};
			let Some(source) = graph.node_index(source_id) else {
				issues.push(GraphIssue::UnknownEndpoint {
					edge: id,
					node: source_id.clone(),
				});
				continue;
			};
			let Some(target) = graph.node_index(target_id) else {
				issues.push(GraphIssue::UnknownEndpoint {
					edge: id,
					node: target_id.clone(),
				});
				continue;
			};
			if source == target {
				issues.push(GraphIssue::SelfLoop {
					edge: id,
					node: source_id.clone(),
				});
				continue;
			}
			let custom_name = raw.custom_name.clone().filter(|n| !n.trim().is_empty());
			let relationship_type = match &raw.relationship_type {
				Some(kind) => {
					if *kind == RelationshipType::Related && custom_name.is_none() {
						issues.push(GraphIssue::UnnamedRelated(id.clone()));
					}
					kind.clone()
				}
				None => {
					issues.push(GraphIssue::MissingRelationshipType(id.clone()));
					RelationshipType::Related
				}
			};
			edge_ids.insert(id.clone());
			graph.edges.push(Edge {
				id,
				source,
				target,
				relationship_type,
				custom_name,
			});
		}

		(graph, issues)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn edge_index(&self, id: &str) -> Option<usize> {
		self.edges.iter().position(|e| e.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::cognitive_map::types::{EdgePayload, NodePayload};

	fn node(id: Option<&str>, name: &str) -> NodePayload {
		NodePayload {
			id: id.map(str::to_string),
			name: name.to_string(),
			description: None,
			x: None,
			y: None,
		}
	}

	fn edge(id: Option<&str>, source: Option<&str>, target: Option<&str>, kind: &str) -> EdgePayload {
		EdgePayload {
			id: id.map(str::to_string),
			source: source.map(str::to_string),
			target: target.map(str::to_string),
			relationship_type: Some(kind.into()),
			custom_name: None,
		}
	}

	#[test]
	fn resolves_endpoints_and_keeps_paint_order() {
		let payload = GraphPayload {
			nodes: vec![node(Some("n0"), "Algebra"), node(Some("n1"), "Geometry")],
			edges: vec![
				edge(Some("e0"), Some("n0"), Some("n1"), "superordinate"),
				edge(Some("e1"), Some("n1"), Some("n0"), "subordinate"),
			],
		};
		let (graph, issues) = Graph::validate(&payload);
		assert!(issues.is_empty());
		assert_eq!(graph.node_count(), 2);
		assert_eq!(graph.edges[0].id, "e0");
		assert_eq!((graph.edges[0].source, graph.edges[0].target), (0, 1));
		assert_eq!((graph.edges[1].source, graph.edges[1].target), (1, 0));
		assert_eq!(graph.edge_index("e1"), Some(1));
	}

	#[test]
	fn edge_with_unknown_endpoint_is_dropped() {
		let payload = GraphPayload {
			nodes: vec![node(Some("n0"), "Algebra"), node(Some("n1"), "Geometry")],
			edges: vec![
				edge(Some("e0"), Some("n0"), Some("missing"), "related"),
				edge(Some("e1"), Some("n0"), Some("n1"), "coordinate"),
			],
		};
		let (graph, issues) = Graph::validate(&payload);
		assert_eq!(graph.node_count(), 2);
		assert_eq!(graph.edge_count(), 1);
		assert_eq!(graph.edges[0].id, "e1");
		assert_eq!(
			issues,
			vec![GraphIssue::UnknownEndpoint {
				edge: "e0".into(),
				node: "missing".into()
			}]
		);
		assert!(issues[0].is_dropped());
	}

	#[test]
	fn edge_without_endpoints_is_dropped() {
		let payload = GraphPayload {
			nodes: vec![node(None, "Algebra")],
			edges: vec![edge(None, None, None, "related")],
		};
		let (graph, issues) = Graph::validate(&payload);
		assert_eq!(graph.edge_count(), 0);
		assert_eq!(
			issues,
			vec![GraphIssue::MissingEndpoint {
				edge: "edge_0".into()
			}]
		);
	}

	#[test]
	fn self_loops_are_dropped() {
		let payload = GraphPayload {
			nodes: vec![node(Some("a"), "A"), node(Some("b"), "B")],
			edges: vec![
				edge(Some("loop"), Some("a"), Some("a"), "coordinate"),
				edge(Some("e"), Some("a"), Some("b"), "coordinate"),
			],
		};
		let (graph, issues) = Graph::validate(&payload);
		assert_eq!(graph.edge_count(), 1);
		assert_eq!(graph.edges[0].id, "e");
		assert_eq!(
			issues,
			vec![GraphIssue::SelfLoop {
				edge: "loop".into(),
				node: "a".into()
			}]
		);
		assert!(issues[0].is_dropped());
	}

	#[test]
	fn edge_without_relationship_type_is_kept_as_related() {
		let mut payload = GraphPayload {
			nodes: vec![node(Some("a"), "A"), node(Some("b"), "B")],
			edges: vec![edge(Some("e"), Some("a"), Some("b"), "coordinate")],
		};
		payload.edges[0].relationship_type = None;
		let (graph, issues) = Graph::validate(&payload);
		assert_eq!(graph.edge_count(), 1);
		assert_eq!(graph.edges[0].relationship_type, RelationshipType::Related);
		assert_eq!(graph.edges[0].label(), "related");
		assert_eq!(issues, vec![GraphIssue::MissingRelationshipType("e".into())]);
		assert!(!issues[0].is_dropped());
	}

	#[test]
	fn one_untyped_edge_does_not_reject_the_payload() {
		let graph = Graph::from_json(
			r#"{"nodes": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}],
			"edges": [{"id": "e", "source": "a", "target": "b"}]}"#,
		)
		.unwrap();
		assert_eq!(graph.edge_count(), 1);
	}

	#[test]
	fn duplicate_node_ids_keep_first() {
		let payload = GraphPayload {
			nodes: vec![
				node(Some("n0"), "Algebra"),
				node(Some("n0"), "Impostor"),
				node(Some("n1"), "Geometry"),
			],
			edges: vec![edge(Some("e0"), Some("n0"), Some("n1"), "related")],
		};
		let (graph, issues) = Graph::validate(&payload);
		assert_eq!(graph.node_count(), 2);
		assert_eq!(graph.nodes[0].name, "Algebra");
		assert_eq!(graph.node_index("n1"), Some(1));
		assert_eq!(graph.edges[0].target, 1);
		assert!(issues.contains(&GraphIssue::DuplicateNode("n0".into())));
	}

	#[test]
	fn missing_ids_are_assigned_by_position() {
		let payload = GraphPayload {
			nodes: vec![node(None, "Algebra"), node(None, "Geometry")],
			edges: vec![edge(None, Some("node_0"), Some("node_1"), "parent")],
		};
		let graph = Graph::from_payload(&payload);
		assert_eq!(graph.nodes[1].id, "node_1");
		assert_eq!(graph.edges[0].id, "edge_0");
		assert_eq!(graph.edges[0].label(), "superordinate");
	}

	#[test]
	fn edge_label_prefers_custom_name() {
		let mut payload = GraphPayload {
			nodes: vec![node(Some("a"), "A"), node(Some("b"), "B")],
			edges: vec![edge(Some("e"), Some("a"), Some("b"), "related")],
		};
		let (graph, issues) = Graph::validate(&payload);
		assert_eq!(graph.edges[0].label(), "related");
		assert_eq!(issues, vec![GraphIssue::UnnamedRelated("e".into())]);
		assert!(!issues[0].is_dropped());

		payload.edges[0].custom_name = Some("builds on".into());
		let (graph, issues) = Graph::validate(&payload);
		assert_eq!(graph.edges[0].label(), "builds on");
		assert!(issues.is_empty());
	}

	#[test]
	fn seed_coordinates_must_be_finite() {
		let mut a = node(Some("a"), "A");
		a.x = Some(10.0);
		a.y = Some(f64::NAN);
		let mut b = node(Some("b"), "B");
		b.x = Some(1.0);
		b.y = Some(2.0);
		let graph = Graph::from_payload(&GraphPayload {
			nodes: vec![a, b],
			edges: vec![],
		});
		assert_eq!(graph.nodes[0].seed, None);
		assert_eq!(graph.nodes[1].seed, Some(Point::new(1.0, 2.0)));
	}
}
