//! Deterministic visual encoding shared by the scene builder and hit testing.

use super::graph::Node;

pub const PALETTE: [&str; 8] = [
	"#4CAF50", "#2196F3", "#FF9800", "#9C27B0", "#F44336", "#00BCD4", "#795548", "#607D8B",
];

pub const NODE_RADIUS: f64 = 25.0;
pub const NODE_HOVER_RADIUS: f64 = 30.0;
pub const NODE_STROKE: &str = "#333";
pub const LABEL_MAX_CHARS: usize = 8;
pub const ELLIPSIS: &str = "...";

/// Edge labels sit this far above the midpoint of the line.
pub const EDGE_LABEL_OFFSET: f64 = 5.0;
/// Extra slack around an edge stroke that still counts as a hit.
pub const EDGE_HIT_SLOP: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
	Idle,
	Hovered,
	Dragging,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeState {
	Idle,
	Hovered,
	Selected,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub width: f64,
	pub color: &'static str,
}

/// Palette entry for a display name.
///
/// Runs `h = unit + ((h << 5) - h)` over the UTF-16 code units with the
/// shift applied to the 32-bit truncation of `h`, then takes `|h| mod 8`.
pub fn node_color(name: &str) -> &'static str {
	let mut hash: i64 = 0;
	for unit in name.encode_utf16() {
		let shifted = (hash as i32).wrapping_shl(5) as i64;
		hash = (unit as i64).wrapping_add(shifted.wrapping_sub(hash));
	}
	PALETTE[(hash.unsigned_abs() % PALETTE.len() as u64) as usize]
}

/// First eight characters of the name, with an ellipsis if anything was cut.
pub fn node_label(name: &str) -> String {
	match name.char_indices().nth(LABEL_MAX_CHARS) {
		Some((cut, _)) => format!("{}{}", &name[..cut], ELLIPSIS),
		None => name.to_string(),
	}
}

pub fn tooltip_lines(node: &Node) -> Vec<String> {
	let mut lines = vec![node.name.clone()];
	if let Some(description) = &node.description {
		lines.extend(description.lines().map(str::to_string));
	}
	lines
}

pub fn node_radius(state: NodeState) -> f64 {
	match state {
		NodeState::Idle => NODE_RADIUS,
		NodeState::Hovered | NodeState::Dragging => NODE_HOVER_RADIUS,
	}
}

pub fn edge_style(state: EdgeState) -> EdgeStyle {
	match state {
		EdgeState::Idle => EdgeStyle {
			width: 2.0,
			color: "#999",
		},
		EdgeState::Hovered | EdgeState::Selected => EdgeStyle {
			width: 3.0,
			color: "#ff4444",
		},
	}
}
