use std::f64::consts::PI;

use log::{debug, warn};

use super::graph::Graph;
use super::simulation::Simulation;
use super::types::{CanvasConfig, LayoutVariant, Point, SimulationConfig};

/// Evenly spaced positions on a circle, computed once per graph.
#[derive(Clone, Debug, PartialEq)]
pub struct CircularLayout {
	positions: Vec<Point>,
}

impl CircularLayout {
	pub fn new(count: usize, canvas: CanvasConfig) -> Self {
		let center = canvas.center();
		let radius = canvas.width.min(canvas.height) / 3.0;
		let positions = (0..count)
			.map(|i| {
				let angle = 2.0 * PI * i as f64 / count as f64;
				Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
			})
			.collect();
		Self { positions }
	}

	fn move_node(&mut self, node: usize, at: Point) {
		if let Some(p) = self.positions.get_mut(node) {
			*p = at;
		}
	}
}

/// Owns node positions for one graph, using either strategy.
#[derive(Clone, Debug)]
pub enum LayoutEngine {
	Force {
		simulation: Simulation,
		drag_alpha_target: f64,
	},
	Circular(CircularLayout),
}

impl LayoutEngine {
	pub fn new(
		variant: LayoutVariant,
		graph: &Graph,
		config: &SimulationConfig,
		canvas: CanvasConfig,
	) -> Self {
		debug!(
			"cognitive map: {:?} layout for {} nodes",
			variant,
			graph.node_count()
		);
		match variant {
			LayoutVariant::Force => Self::Force {
				simulation: Simulation::new(graph, config.clone(), canvas.center()),
				drag_alpha_target: config.drag_alpha_target,
			},
			LayoutVariant::Circular => {
				Self::Circular(CircularLayout::new(graph.node_count(), canvas))
			}
		}
	}

	/// Advance continuous layouts by one frame. Returns whether anything moved.
	pub fn step(&mut self) -> bool {
		match self {
			Self::Force { simulation, .. } => simulation.step(),
			Self::Circular(_) => false,
		}
	}

	pub fn is_idle(&self) -> bool {
		match self {
			Self::Force { simulation, .. } => !simulation.is_running(),
			Self::Circular(_) => true,
		}
	}

	/// Halt any continuous motion for good.
	pub fn stop(&mut self) {
		if let Self::Force { simulation, .. } = self {
			simulation.stop();
		}
	}

	/// One finite position per node; anything undefined falls back to `fallback`.
	pub fn positions(&self, fallback: Point) -> Vec<Point> {
		let raw = match self {
			Self::Force { simulation, .. } => simulation.positions(),
			Self::Circular(layout) => layout.positions.clone(),
		};
		raw.into_iter()
			.enumerate()
			.map(|(i, p)| {
				if p.is_finite() {
					p
				} else {
					warn!("cognitive map: node {} has no position, using {:?}", i, fallback);
					fallback
				}
			})
			.collect()
	}

	pub fn begin_drag(&mut self, node: usize, at: Point) {
		match self {
			Self::Force {
				simulation,
				drag_alpha_target,
			} => {
				simulation.pin(node, at);
				simulation.reheat(*drag_alpha_target);
			}
			Self::Circular(layout) => layout.move_node(node, at),
		}
	}

	pub fn drag_to(&mut self, node: usize, at: Point) {
		match self {
			Self::Force { simulation, .. } => simulation.pin(node, at),
			Self::Circular(layout) => layout.move_node(node, at),
		}
	}

	pub fn end_drag(&mut self, node: usize) {
		if let Self::Force { simulation, .. } = self {
			simulation.unpin(node);
			simulation.cool();
		}
	}

	pub fn is_pinned(&self, node: usize) -> bool {
		match self {
			Self::Force { simulation, .. } => simulation
				.nodes()
				.get(node)
				.is_some_and(|n| n.is_pinned()),
			Self::Circular(_) => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn graph(n: usize) -> Graph {
		let nodes = (0..n)
			.map(|i| format!(r#"{{"name": "Task {}"}}"#, i))
			.collect::<Vec<_>>()
			.join(",");
		Graph::from_json(&format!(r#"{{"nodes": [{}]}}"#, nodes)).unwrap()
	}

	#[test]
	fn circular_layout_spaces_nodes_evenly() {
		let canvas = CanvasConfig::default();
		let layout = CircularLayout::new(4, canvas);
		let radius = 400.0 / 3.0;
		let expected = [
			Point::new(240.0 + radius, 200.0),
			Point::new(240.0, 200.0 + radius),
			Point::new(240.0 - radius, 200.0),
			Point::new(240.0, 200.0 - radius),
		];
		for (p, e) in layout.positions.iter().zip(expected) {
			assert!(p.distance(e) < 1e-9, "{:?} != {:?}", p, e);
		}
	}

	#[test]
	fn circular_layout_never_moves_on_its_own() {
		let g = graph(3);
		let mut engine = LayoutEngine::new(
			LayoutVariant::Circular,
			&g,
			&SimulationConfig::default(),
			CanvasConfig::default(),
		);
		let before = engine.positions(Point::default());
		assert!(!engine.step());
		assert!(engine.is_idle());
		assert_eq!(engine.positions(Point::default()), before);
	}

	#[test]
	fn circular_drag_moves_node_and_leaves_it() {
		let g = graph(3);
		let mut engine = LayoutEngine::new(
			LayoutVariant::Circular,
			&g,
			&SimulationConfig::default(),
			CanvasConfig::default(),
		);
		let at = Point::new(12.0, 34.0);
		engine.begin_drag(1, at);
		engine.end_drag(1);
		assert_eq!(engine.positions(Point::default())[1], at);
	}

	#[test]
	fn force_drag_pins_and_reheats() {
		let g = graph(5);
		let mut engine = LayoutEngine::new(
			LayoutVariant::Force,
			&g,
			&SimulationConfig::default(),
			CanvasConfig::default(),
		);
		while engine.step() {}
		assert!(engine.is_idle());

		let at = Point::new(100.0, 100.0);
		engine.begin_drag(2, at);
		assert!(engine.is_pinned(2));
		assert!(!engine.is_idle());
		assert!(engine.step());
		engine.drag_to(2, Point::new(120.0, 90.0));
		engine.end_drag(2);
		assert!(!engine.is_pinned(2));
		assert_eq!(engine.positions(Point::default())[2], Point::new(120.0, 90.0));
	}

	#[test]
	fn stopped_engine_stays_still() {
		let g = graph(3);
		let mut engine = LayoutEngine::new(
			LayoutVariant::Force,
			&g,
			&SimulationConfig::default(),
			CanvasConfig::default(),
		);
		engine.stop();
		assert!(!engine.step());
	}

	#[test]
	fn every_position_is_finite() {
		for variant in [LayoutVariant::Force, LayoutVariant::Circular] {
			let g = graph(7);
			let mut engine =
				LayoutEngine::new(variant, &g, &SimulationConfig::default(), CanvasConfig::default());
			for _ in 0..50 {
				engine.step();
			}
			let positions = engine.positions(Point::default());
			assert_eq!(positions.len(), 7);
			assert!(positions.iter().all(Point::is_finite));
		}
	}
}
