//! Top-level state shared by the map panel and the wizard panel.

use leptos::prelude::*;
use log::info;

use crate::components::cognitive_map::{Graph, PayloadError};

/// Owns the current cognitive map and the learner's selected edge.
///
/// Handed down explicitly as a prop. The only graph mutation is
/// [`MapStore::replace_graph`], which also clears the selection.
#[derive(Clone, Copy)]
pub struct MapStore {
	graph: RwSignal<Option<Graph>>,
	selected_edge: RwSignal<Option<String>>,
}

impl MapStore {
	/// An empty store: no graph, nothing selected.
	pub fn new() -> Self {
		Self {
			graph: RwSignal::new(None),
			selected_edge: RwSignal::new(None),
		}
	}

	/// Read access to the current graph.
	pub fn graph(&self) -> Signal<Option<Graph>> {
		self.graph.into()
	}

	/// Currently selected edge id, if any.
	pub fn selected_edge(&self) -> Signal<Option<String>> {
		self.selected_edge.into()
	}

	/// Handle the canvas uses to toggle the selection.
	pub(crate) fn selection(&self) -> RwSignal<Option<String>> {
		self.selected_edge
	}

	/// Nodes in the current graph after validation.
	pub fn node_count(&self) -> Signal<usize> {
		let graph = self.graph;
		Signal::derive(move || graph.with(|g| g.as_ref().map_or(0, Graph::node_count)))
	}

	/// Edges in the current graph after validation.
	pub fn edge_count(&self) -> Signal<usize> {
		let graph = self.graph;
		Signal::derive(move || graph.with(|g| g.as_ref().map_or(0, Graph::edge_count)))
	}

	/// Swap in a new graph wholesale (or none), dropping any selection.
	pub fn replace_graph(&self, graph: Option<Graph>) {
		if let Some(g) = &graph {
			info!(
				"cognitive map replaced: {} nodes, {} edges",
				g.node_count(),
				g.edge_count()
			);
		}
		self.selected_edge.set(None);
		self.graph.set(graph);
	}

	/// Parse and validate a JSON decomposition payload and make it the
	/// current graph. A payload that fails to parse leaves the store untouched.
	pub fn load_json(&self, json: &str) -> Result<(), PayloadError> {
		self.replace_graph(Some(Graph::from_json(json)?));
		Ok(())
	}
}

impl Default for MapStore {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const PAIR: &str = r#"{
		"nodes": [{"id": "n0", "name": "Algebra"}, {"id": "n1", "name": "Geometry"}],
		"edges": [{"id": "e0", "source": "n0", "target": "n1", "relationship_type": "related"}]
	}"#;

	#[test]
	fn starts_empty() {
		let store = MapStore::new();
		assert_eq!(store.graph().get_untracked(), None);
		assert_eq!(store.selected_edge().get_untracked(), None);
		assert_eq!(store.node_count().get_untracked(), 0);
		assert_eq!(store.edge_count().get_untracked(), 0);
	}

	#[test]
	fn load_json_replaces_graph_and_clears_selection() {
		let store = MapStore::new();
		store.load_json(PAIR).unwrap();
		assert_eq!(store.node_count().get_untracked(), 2);
		assert_eq!(store.edge_count().get_untracked(), 1);

		store.selection().set(Some("e0".into()));
		assert_eq!(store.selected_edge().get_untracked().as_deref(), Some("e0"));

		// Same payload again is still a replacement.
		store.load_json(PAIR).unwrap();
		assert_eq!(store.selected_edge().get_untracked(), None);
		assert_eq!(store.edge_count().get_untracked(), 1);
	}

	#[test]
	fn clearing_the_graph_clears_selection() {
		let store = MapStore::new();
		store.load_json(PAIR).unwrap();
		store.selection().set(Some("e0".into()));
		store.replace_graph(None);
		assert_eq!(store.graph().get_untracked(), None);
		assert_eq!(store.selected_edge().get_untracked(), None);
		assert_eq!(store.node_count().get_untracked(), 0);
	}

	#[test]
	fn malformed_payload_leaves_store_untouched() {
		let store = MapStore::new();
		store.load_json(PAIR).unwrap();
		store.selection().set(Some("e0".into()));
		assert!(store.load_json("{\"nodes\": 3}").is_err());
		assert_eq!(store.node_count().get_untracked(), 2);
		assert_eq!(store.edge_count().get_untracked(), 1);
		assert_eq!(store.selected_edge().get_untracked().as_deref(), Some("e0"));
	}
}
