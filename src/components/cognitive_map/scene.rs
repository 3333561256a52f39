use log::warn;

use super::encoding::{self, EdgeStyle, NodeState};
use super::graph::Graph;
use super::interaction::InteractionState;
use super::types::{CanvasConfig, Point};

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeVisual {
	pub from: Point,
	pub to: Point,
	pub style: EdgeStyle,
	pub label: String,
	pub label_at: Point,
	/// Radius of the target node, so the arrow tip lands on its rim.
	pub target_radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub center: Point,
	pub radius: f64,
	pub fill: &'static str,
	pub label: String,
	pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub lines: Vec<String>,
	pub anchor: Point,
}

/// Everything one frame paints, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub edges: Vec<EdgeVisual>,
	pub nodes: Vec<NodeVisual>,
	pub tooltip: Option<Tooltip>,
}

impl Scene {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

pub fn build(
	graph: &Graph,
	positions: &[Point],
	interaction: &InteractionState,
	canvas: CanvasConfig,
) -> Scene {
	let fallback = canvas.center();
	let position = |i: usize| match positions.get(i) {
		Some(p) if p.is_finite() => *p,
		_ => {
			warn!("cognitive map: node {} has no position, drawing at center", i);
			fallback
		}
	};

	let nodes: Vec<NodeVisual> = graph
		.nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let state = interaction.node_state(i);
			NodeVisual {
				center: position(i),
				radius: encoding::node_radius(state),
				fill: encoding::node_color(&node.name),
				label: encoding::node_label(&node.name),
				pinned: state == NodeState::Dragging,
			}
		})
		.collect();

	let edges = graph
		.edges
		.iter()
		.enumerate()
		.map(|(i, edge)| {
			let (from, to) = (nodes[edge.source].center, nodes[edge.target].center);
			let mid = from.midpoint(to);
			EdgeVisual {
				from,
				to,
				style: encoding::edge_style(interaction.edge_state(i)),
				label: edge.label().to_string(),
				label_at: Point::new(mid.x, mid.y - encoding::EDGE_LABEL_OFFSET),
				target_radius: nodes[edge.target].radius,
			}
		})
		.collect();

	let tooltip = interaction
		.hovered_node
		.filter(|_| interaction.dragging.is_none())
		.and_then(|i| Some((graph.nodes.get(i)?, nodes.get(i)?)))
		.map(|(node, visual)| Tooltip {
			lines: encoding::tooltip_lines(node),
			anchor: Point::new(visual.center.x + visual.radius, visual.center.y + visual.radius),
		});

	Scene {
		width: canvas.width,
		height: canvas.height,
		edges,
		nodes,
		tooltip,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::cognitive_map::encoding::EdgeState;

	fn scenario() -> Graph {
		Graph::from_json(
			r#"{"nodes": [
				{"id": "n0", "name": "Algebra"},
				{"id": "n1", "name": "Geometry", "description": "Shapes and space"}
			], "edges": [
				{"id": "e0", "source": "n0", "target": "n1", "relationship_type": "related"},
				{"id": "e1", "source": "n0", "target": "missing", "relationship_type": "related"}
			]}"#,
		)
		.unwrap()
	}

	#[test]
	fn one_visual_per_valid_element() {
		let g = scenario();
		let positions = [Point::new(100.0, 100.0), Point::new(300.0, 100.0)];
		let scene = build(&g, &positions, &InteractionState::default(), CanvasConfig::default());
		assert_eq!(scene.nodes.len(), 2);
		assert_eq!(scene.edges.len(), 1);
		assert_eq!(scene.edges[0].label, "related");
		assert_eq!(scene.edges[0].label_at, Point::new(200.0, 95.0));
		assert_eq!(scene.edges[0].style, encoding::edge_style(EdgeState::Idle));
		assert_eq!(scene.nodes[0].fill, encoding::node_color("Algebra"));
		assert_eq!(scene.nodes[1].label, "Geometry");
		assert_eq!(scene.tooltip, None);
	}

	#[test]
	fn visual_counts_follow_valid_elements() {
		for n in 0..8usize {
			let nodes = (0..n)
				.map(|i| format!(r#"{{"id": "n{}", "name": "Task {}"}}"#, i, i))
				.collect::<Vec<_>>();
			// A chain of valid edges plus one dangling edge per node.
			let mut edges = Vec::new();
			for i in 1..n {
				edges.push(format!(
					r#"{{"source": "n{}", "target": "n{}", "relationship_type": "subordinate"}}"#,
					i - 1,
					i
				));
			}
			for i in 0..n {
				edges.push(format!(
					r#"{{"source": "n{}", "target": "gone{}", "relationship_type": "related"}}"#,
					i, i
				));
			}
			let json = format!(
				r#"{{"nodes": [{}], "edges": [{}]}}"#,
				nodes.join(","),
				edges.join(",")
			);
			let g = Graph::from_json(&json).unwrap();
			let positions = (0..n)
				.map(|i| Point::new(20.0 * i as f64, 10.0))
				.collect::<Vec<_>>();
			let scene = build(&g, &positions, &InteractionState::default(), CanvasConfig::default());
			assert_eq!(scene.nodes.len(), n);
			assert_eq!(scene.edges.len(), n.saturating_sub(1));
			assert_eq!(scene.is_empty(), n == 0);
		}
	}

	#[test]
	fn missing_positions_fall_back_to_center() {
		let g = scenario();
		let positions = [Point::new(f64::NAN, 1.0)];
		let scene = build(&g, &positions, &InteractionState::default(), CanvasConfig::default());
		assert_eq!(scene.nodes.len(), 2);
		assert_eq!(scene.nodes[0].center, Point::new(240.0, 200.0));
		assert_eq!(scene.nodes[1].center, Point::new(240.0, 200.0));
	}

	#[test]
	fn hovered_node_grows_and_shows_tooltip() {
		let g = scenario();
		let positions = [Point::new(100.0, 100.0), Point::new(300.0, 100.0)];
		let mut state = InteractionState::default();
		state.hovered_node = Some(1);
		let scene = build(&g, &positions, &state, CanvasConfig::default());
		assert_eq!(scene.nodes[1].radius, encoding::NODE_HOVER_RADIUS);
		assert_eq!(scene.edges[0].target_radius, encoding::NODE_HOVER_RADIUS);
		let tooltip = scene.tooltip.unwrap();
		assert_eq!(tooltip.lines, vec!["Geometry", "Shapes and space"]);
	}

	#[test]
	fn empty_graph_builds_empty_scene() {
		let scene = build(
			&Graph::default(),
			&[],
			&InteractionState::default(),
			CanvasConfig::default(),
		);
		assert!(scene.is_empty());
		assert!(scene.edges.is_empty());
	}
}
