use log::{debug, info};

use super::graph::Graph;
use super::interaction::{self, Command, Hit, InteractionState, PointerEvent};
use super::layout::LayoutEngine;
use super::scene::{self, Scene};
use super::types::{CanvasConfig, LayoutVariant, Point, SimulationConfig};

/// Outward-facing result of a pointer event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionChange {
	Selected(String),
	Cleared,
}

impl SelectionChange {
	pub fn into_id(self) -> Option<String> {
		match self {
			Self::Selected(id) => Some(id),
			Self::Cleared => None,
		}
	}
}

/// Everything one mounted graph needs: the graph, its layout and the pointer
/// state. Built fresh for every graph, so nothing survives a replacement.
pub struct MapState {
	pub graph: Graph,
	pub layout: LayoutEngine,
	pub interaction: InteractionState,
	pub canvas: CanvasConfig,
	dirty: bool,
}

impl MapState {
	pub fn new(
		graph: Graph,
		variant: LayoutVariant,
		simulation: &SimulationConfig,
		canvas: CanvasConfig,
	) -> Self {
		info!(
			"cognitive map: mounting {} nodes, {} edges",
			graph.node_count(),
			graph.edge_count()
		);
		let layout = LayoutEngine::new(variant, &graph, simulation, canvas);
		Self {
			graph,
			layout,
			interaction: InteractionState::default(),
			canvas,
			dirty: true,
		}
	}

	/// Re-select an edge by id, e.g. after the layout variant changed.
	pub fn restore_selection(&mut self, edge_id: Option<&str>) {
		let selected = edge_id.and_then(|id| self.graph.edge_index(id));
		if selected != self.interaction.selected_edge {
			self.interaction.selected_edge = selected;
			self.dirty = true;
		}
	}

	pub fn selected_edge_id(&self) -> Option<&str> {
		self.interaction
			.selected_edge
			.and_then(|i| self.graph.edges.get(i))
			.map(|e| e.id.as_str())
	}

	pub fn positions(&self) -> Vec<Point> {
		self.layout.positions(self.canvas.center())
	}

	/// One animation frame. Returns whether the canvas needs repainting.
	pub fn tick(&mut self) -> bool {
		let moved = self.layout.step();
		if moved && self.layout.is_idle() {
			debug!("cognitive map: layout settled");
		}
		std::mem::take(&mut self.dirty) || moved
	}

	pub fn scene(&self) -> Scene {
		let mut scene = scene::build(&self.graph, &self.positions(), &self.interaction, self.canvas);
		for (i, node) in scene.nodes.iter_mut().enumerate() {
			node.pinned |= self.layout.is_pinned(i);
		}
		scene
	}

	pub fn hit(&self, at: Point) -> Hit {
		interaction::hit_test(&self.graph, &self.positions(), &self.interaction, at)
	}

	pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<SelectionChange> {
		let hit = match event.point() {
			Some(at) => self.hit(at),
			None => Hit::Background,
		};
		let transition = self.interaction.handle(event, hit);
		if !transition.changed(&self.interaction) {
			return None;
		}
		self.interaction = transition.state;
		self.dirty = true;

		let mut change = None;
		for command in transition.commands {
			match command {
				Command::Grab { node, at } => {
					debug!("cognitive map: grab node {}", node);
					self.layout.begin_drag(node, at);
				}
				Command::Drag { node, at } => self.layout.drag_to(node, at),
				Command::Release { node } => {
					debug!("cognitive map: release node {}", node);
					self.layout.end_drag(node);
				}
				Command::SelectionChanged(edge) => {
					change = Some(match edge.and_then(|i| self.graph.edges.get(i)) {
						Some(e) => SelectionChange::Selected(e.id.clone()),
						None => SelectionChange::Cleared,
					});
				}
			}
		}
		change
	}

	/// Cursor hint for the current pointer state.
	pub fn cursor(&self) -> &'static str {
		if self.interaction.dragging.is_some() {
			"grabbing"
		} else if self.interaction.hovered_node.is_some() || self.interaction.hovered_edge.is_some()
		{
			"pointer"
		} else {
			"default"
		}
	}

	pub fn stop(&mut self) {
		self.layout.stop();
	}
}
