use std::f64::consts::PI;

use log::warn;

use super::graph::Graph;
use super::types::{Point, SimulationConfig};

const INITIAL_RADIUS: f64 = 10.0;
const DISTANCE_MIN2: f64 = 1.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned coordinates; override the integrated position while set.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl SimNode {
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

#[derive(Clone, Debug)]
struct Link {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Linear congruential generator; keeps the coincident-node jiggle reproducible.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	fn next(&mut self) -> f64 {
		self.0 = (Self::A * self.0 + Self::C) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// Iterative force relaxation: link springs, many-body charge, centering and
/// collision, cooled by a decaying alpha.
#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<Link>,
	config: SimulationConfig,
	center: Point,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	rng: Lcg,
}

impl Simulation {
	pub fn new(graph: &Graph, config: SimulationConfig, center: Point) -> Self {
		let initial_angle = PI * (3.0 - 5f64.sqrt());
		let nodes = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let (x, y) = match node.seed {
					Some(seed) => (seed.x, seed.y),
					None => {
						let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
						let angle = i as f64 * initial_angle;
						(center.x + radius * angle.cos(), center.y + radius * angle.sin())
					}
				};
				SimNode {
					x,
					y,
					..SimNode::default()
				}
			})
			.collect::<Vec<_>>();

		let mut degree = vec![0usize; nodes.len()];
		for edge in &graph.edges {
			if edge.source != edge.target {
				degree[edge.source] += 1;
				degree[edge.target] += 1;
			}
		}
		let links = graph
			.edges
			.iter()
			.filter(|e| e.source != e.target)
			.map(|e| {
				let (ds, dt) = (degree[e.source] as f64, degree[e.target] as f64);
				Link {
					source: e.source,
					target: e.target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			nodes,
			links,
			alpha: config.alpha,
			alpha_target: 0.0,
			config,
			center,
			running: true,
			rng: Lcg(1),
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn positions(&self) -> Vec<Point> {
		self.nodes.iter().map(SimNode::position).collect()
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Advance one animation frame. Returns whether positions changed.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		if self.nodes.is_empty() {
			self.running = false;
			return false;
		}
		self.tick();
		if self.alpha < self.config.alpha_min {
			self.running = false;
		}
		true
	}

	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collision();

		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
			if !node.x.is_finite() || !node.y.is_finite() {
				warn!("cognitive map: non-finite node position, resetting to center");
				*node = SimNode {
					x: self.center.x,
					y: self.center.y,
					fx: node.fx.filter(|v| v.is_finite()),
					fy: node.fy.filter(|v| v.is_finite()),
					..SimNode::default()
				};
			}
		}
	}

	/// Resume with a new alpha target, e.g. while a node is being dragged.
	pub fn reheat(&mut self, alpha_target: f64) {
		self.alpha_target = alpha_target;
		self.running = true;
	}

	/// Let alpha decay towards zero; the simulation idles once below `alpha_min`.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Fix a node at `at`, moving it there immediately.
	pub fn pin(&mut self, idx: usize, at: Point) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(at.x);
			node.fy = Some(at.y);
			node.x = at.x;
			node.y = at.y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	fn apply_links(&mut self) {
		let distance = self.config.link_distance;
		for link in &self.links {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let mut l = (x * x + y * y).sqrt();
			l = (l - distance) / l * self.alpha * link.strength;
			x *= l;
			y *= l;

			let target = &mut self.nodes[link.target];
			target.vx -= x * link.bias;
			target.vy -= y * link.bias;
			let source = &mut self.nodes[link.source];
			source.vx += x * (1.0 - link.bias);
			source.vy += y * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let weight = self.config.charge * self.alpha;
		let n = self.nodes.len();
		for i in 0..n {
			let (xi, yi) = (self.nodes[i].x, self.nodes[i].y);
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut x = self.nodes[j].x - xi;
				let mut y = self.nodes[j].y - yi;
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				if l < DISTANCE_MIN2 {
					l = (DISTANCE_MIN2 * l).sqrt();
				}
				dvx += x * weight / l;
				dvy += y * weight / l;
			}
			self.nodes[i].vx += dvx;
			self.nodes[i].vy += dvy;
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let strength = self.config.center_strength;
		let (dx, dy) = (
			(sx / n - self.center.x) * strength,
			(sy / n - self.center.y) * strength,
		);
		for node in &mut self.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}

	fn apply_collision(&mut self) {
		let radius = self.config.collision_radius;
		let r = radius * 2.0;
		// Equal radii split every correction evenly.
		let share = 0.5;
		let n = self.nodes.len();
		for i in 0..n {
			let (xi, yi) = (
				self.nodes[i].x + self.nodes[i].vx,
				self.nodes[i].y + self.nodes[i].vy,
			);
			for j in (i + 1)..n {
				let other = &self.nodes[j];
				let mut x = xi - other.x - other.vx;
				let mut y = yi - other.y - other.vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				l = l.sqrt();
				l = (r - l) / l;
				x *= l;
				y *= l;
				self.nodes[i].vx += x * share;
				self.nodes[i].vy += y * share;
				self.nodes[j].vx -= x * share;
				self.nodes[j].vy -= y * share;
			}
		}
	}
}
