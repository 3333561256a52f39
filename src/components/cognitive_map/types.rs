use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::PayloadError;

/// A point in logical canvas units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	pub fn distance(&self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}

	pub fn midpoint(&self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}
}

/// Semantic category of a relationship between two tasks.
///
/// Accepts the English names, the decomposition service's native wire values
/// and a few structural aliases. Unknown categories are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipType {
	Superordinate,
	Subordinate,
	Coordinate,
	Related,
	Other(String),
}

impl RelationshipType {
	pub fn label(&self) -> &str {
		match self {
			Self::Superordinate => "superordinate",
			Self::Subordinate => "subordinate",
			Self::Coordinate => "coordinate",
			Self::Related => "related",
			Self::Other(raw) => raw,
		}
	}
}

impl From<String> for RelationshipType {
	fn from(raw: String) -> Self {
		match raw.trim().to_lowercase().as_str() {
			"superordinate" | "parent" | "上级" => Self::Superordinate,
			"subordinate" | "child" | "下级" => Self::Subordinate,
			"coordinate" | "sibling" | "并列" => Self::Coordinate,
			"related" | "相关" => Self::Related,
			_ => Self::Other(raw),
		}
	}
}

impl From<&str> for RelationshipType {
	fn from(raw: &str) -> Self {
		Self::from(raw.to_string())
	}
}

impl From<RelationshipType> for String {
	fn from(kind: RelationshipType) -> Self {
		match kind {
			RelationshipType::Other(raw) => raw,
			known => known.label().to_string(),
		}
	}
}

impl fmt::Display for RelationshipType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
	#[serde(default)]
	pub id: Option<String>,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub x: Option<f64>,
	#[serde(default)]
	pub y: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgePayload {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default, alias = "source_id")]
	pub source: Option<String>,
	#[serde(default, alias = "target_id")]
	pub target: Option<String>,
	#[serde(default)]
	pub relationship_type: Option<RelationshipType>,
	#[serde(default)]
	pub custom_name: Option<String>,
}

/// Raw `{nodes, edges}` result of a task decomposition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
	#[serde(default)]
	pub nodes: Vec<NodePayload>,
	#[serde(default)]
	pub edges: Vec<EdgePayload>,
}

impl GraphPayload {
	pub fn from_json(json: &str) -> Result<Self, PayloadError> {
		Ok(serde_json::from_str(json)?)
	}
}

/// Which layout strategy positions the nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
	#[default]
	Force,
	Circular,
}

/// Tuning for the force simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Rest length of the link springs.
	pub link_distance: f64,
	/// Many-body charge; negative repels.
	pub charge: f64,
	pub collision_radius: f64,
	pub center_strength: f64,
	pub alpha: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 100.0,
			charge: -300.0,
			collision_radius: 30.0,
			center_strength: 1.0,
			alpha: 1.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

/// Logical size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
	pub width: f64,
	pub height: f64,
}

impl CanvasConfig {
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			width: 480.0,
			height: 400.0,
		}
	}
}
