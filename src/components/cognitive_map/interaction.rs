//! Pointer state machine. Every update returns a fresh state plus the layout
//! commands it implies; nothing here touches the layout or the canvas.

use super::encoding::{self, EdgeState, NodeState};
use super::graph::Graph;
use super::types::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
	Node(usize),
	Edge(usize),
	Background,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
	Down(Point),
	Move(Point),
	Up(Point),
	Click(Point),
	Leave,
}

impl PointerEvent {
	pub fn point(&self) -> Option<Point> {
		match *self {
			Self::Down(p) | Self::Move(p) | Self::Up(p) | Self::Click(p) => Some(p),
			Self::Leave => None,
		}
	}
}

/// Layout side effects of a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
	/// Pin a node under the pointer and reheat.
	Grab { node: usize, at: Point },
	/// Move a pinned node.
	Drag { node: usize, at: Point },
	/// Unpin and let the layout cool.
	Release { node: usize },
	SelectionChanged(Option<usize>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
	pub state: InteractionState,
	pub commands: Vec<Command>,
}

impl Transition {
	/// Whether the view has to be repainted.
	pub fn changed(&self, before: &InteractionState) -> bool {
		!self.commands.is_empty() || self.state != *before
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
	pub hovered_node: Option<usize>,
	pub hovered_edge: Option<usize>,
	pub dragging: Option<usize>,
	pub selected_edge: Option<usize>,
	/// The click that ends a drag must not select anything.
	swallow_click: bool,
}

impl InteractionState {
	pub fn node_state(&self, idx: usize) -> NodeState {
		if self.dragging == Some(idx) {
			NodeState::Dragging
		} else if self.hovered_node == Some(idx) {
			NodeState::Hovered
		} else {
			NodeState::Idle
		}
	}

	pub fn edge_state(&self, idx: usize) -> EdgeState {
		if self.selected_edge == Some(idx) {
			EdgeState::Selected
		} else if self.hovered_edge == Some(idx) {
			EdgeState::Hovered
		} else {
			EdgeState::Idle
		}
	}

	pub fn handle(&self, event: PointerEvent, hit: Hit) -> Transition {
		let mut next = self.clone();
		let mut commands = Vec::new();

		match event {
			PointerEvent::Down(at) => {
				// A new press means the click that should have ended the last drag never came.
				next.swallow_click = false;
				if self.dragging.is_none() {
					if let Hit::Node(node) = hit {
						next.dragging = Some(node);
						next.hovered_node = Some(node);
						next.hovered_edge = None;
						commands.push(Command::Grab { node, at });
					}
				}
			}
			PointerEvent::Move(at) => match self.dragging {
				Some(node) => commands.push(Command::Drag { node, at }),
				None => next.hover(hit),
			},
			PointerEvent::Up(_) => {
				if let Some(node) = self.dragging {
					next.dragging = None;
					next.swallow_click = true;
					next.hover(hit);
					commands.push(Command::Release { node });
				}
			}
			PointerEvent::Click(_) => {
				next.swallow_click = false;
				if let (false, Hit::Edge(edge)) = (self.swallow_click, hit) {
					next.selected_edge = if self.selected_edge == Some(edge) {
						None
					} else {
						Some(edge)
					};
					commands.push(Command::SelectionChanged(next.selected_edge));
				}
			}
			PointerEvent::Leave => {
				if let Some(node) = self.dragging {
					next.dragging = None;
					commands.push(Command::Release { node });
				}
				next.swallow_click = false;
				next.hover(Hit::Background);
			}
		}

		Transition {
			state: next,
			commands,
		}
	}

	fn hover(&mut self, hit: Hit) {
		(self.hovered_node, self.hovered_edge) = match hit {
			Hit::Node(node) => (Some(node), None),
			Hit::Edge(edge) => (None, Some(edge)),
			Hit::Background => (None, None),
		};
	}
}

/// Topmost element under `at`. Nodes paint over edges and later elements
/// paint over earlier ones, so both are searched back to front.
pub fn hit_test(graph: &Graph, positions: &[Point], state: &InteractionState, at: Point) -> Hit {
	let node_hit = positions
		.iter()
		.enumerate()
		.take(graph.node_count())
		.rev()
		.find(|(i, p)| p.distance(at) <= encoding::node_radius(state.node_state(*i)));
	if let Some((i, _)) = node_hit {
		return Hit::Node(i);
	}

	for (i, edge) in graph.edges.iter().enumerate().rev() {
		let (Some(&a), Some(&b)) = (positions.get(edge.source), positions.get(edge.target)) else {
			continue;
		};
		let tolerance = encoding::edge_style(state.edge_state(i)).width / 2.0 + encoding::EDGE_HIT_SLOP;
		if segment_distance(at, a, b) <= tolerance {
			return Hit::Edge(i);
		}
	}
	Hit::Background
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	if len2 < 1e-9 {
		return f64::INFINITY;
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
