//! Force layout driven by an energy value (`alpha`) that cools towards a
//! target, on top of the `force_graph` integrator.
//!
//! `force_graph` supplies the spring and repulsion integration; this module adds
//! the energy schedule, node pinning, centering, and optional collision.

use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info};

pub const ALPHA_MIN: f64 = 0.001;
/// Ticks it takes `alpha` to cool from 1 to `ALPHA_MIN` with a zero target.
const COOLING_TICKS: f64 = 300.0;

// One unit of link/charge strength in the integrator's own units.
const SPRING_PER_STRENGTH: f64 = 0.05;
const CHARGE_PER_STRENGTH: f64 = 150.0;

/// User-tunable force strengths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceSettings {
	/// Link attraction multiplier.
	pub link_strength: f64,
	/// Collision strength in `[0, 1]`; zero disables collision.
	pub collide_strength: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
}

impl Default for ForceSettings {
	fn default() -> Self {
		Self {
			link_strength: 1.0,
			collide_strength: 0.0,
			charge_strength: -1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub radius: f64,
	pub color: String,
	pub pinned: Option<(f32, f32)>,
}

pub struct Simulation {
	graph: ForceGraph<NodeInfo, ()>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	settings: ForceSettings,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	running: bool,
	ticks: u64,
}

impl Simulation {
	pub fn new(settings: ForceSettings, center: (f64, f64)) -> Self {
		let mut sim = Self {
			graph: ForceGraph::new(SimulationParameters {
				force_charge: 0.0,
				force_spring: 0.0,
				force_max: 100.0,
				node_speed: 3000.0,
				damping_factor: 0.9,
			}),
			id_to_idx: HashMap::new(),
			settings,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / COOLING_TICKS),
			running: true,
			ticks: 0,
		};
		sim.apply_strengths();
		sim
	}

	pub fn add_node(&mut self, info: NodeInfo, x: f32, y: f32) -> DefaultNodeIdx {
		let id = info.id.clone();
		let idx = self.graph.add_node(NodeData {
			x,
			y,
			mass: 10.0,
			is_anchor: false,
			user_data: info,
		});
		self.id_to_idx.insert(id, idx);
		idx
	}

	/// Connect two nodes by id. Returns false if either id is unknown.
	pub fn add_link(&mut self, source: &str, target: &str) -> bool {
		match (self.id_to_idx.get(source), self.id_to_idx.get(target)) {
			(Some(&src), Some(&tgt)) => {
				self.graph.add_edge(src, tgt, EdgeData::default());
				true
			}
			_ => false,
		}
	}

	pub fn graph(&self) -> &ForceGraph<NodeInfo, ()> {
		&self.graph
	}

	#[cfg(test)]
	pub fn index_of(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.id_to_idx.get(id).copied()
	}

	pub fn settings(&self) -> ForceSettings {
		self.settings
	}

	pub fn set_settings(&mut self, settings: ForceSettings) {
		self.settings = ForceSettings {
			collide_strength: settings.collide_strength.clamp(0.0, 1.0),
			..settings
		};
		self.apply_strengths();
	}

	fn apply_strengths(&mut self) {
		self.graph.parameters.force_spring = (SPRING_PER_STRENGTH * self.settings.link_strength) as f32;
		self.graph.parameters.force_charge = (-CHARGE_PER_STRENGTH * self.settings.charge_strength) as f32;
	}

	pub fn set_center(&mut self, center: (f64, f64)) {
		self.center = center;
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	#[cfg(test)]
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	pub fn is_idle(&self) -> bool {
		!self.running
	}

	pub fn restart(&mut self) {
		if !self.running {
			debug!("Simulation restarted at alpha {:.3}", self.alpha);
		}
		self.running = true;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Inject energy and resume ticking.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
		self.restart();
	}

	/// Advance one step. Returns false without doing anything while idle.
	pub fn tick(&mut self, dt: f32) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		self.graph.update(dt * self.alpha as f32);
		self.hold_pinned();
		if self.settings.collide_strength > 0.0 {
			self.separate_overlaps();
		}
		self.recenter();
		self.ticks += 1;

		if self.alpha < ALPHA_MIN {
			self.running = false;
			info!("Simulation settled after {} ticks", self.ticks);
		}
		true
	}

	pub fn position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	#[cfg(test)]
	pub fn pinned(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = node.data.user_data.pinned.map(|(x, y)| (x as f64, y as f64));
			}
		});
		found
	}

	/// Fix a node at `(x, y)` until `unpin` is called.
	pub fn pin(&mut self, idx: DefaultNodeIdx, x: f64, y: f64) {
		let (x, y) = (x as f32, y as f32);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x;
				node.data.y = y;
				node.data.is_anchor = true;
				node.data.user_data.pinned = Some((x, y));
			}
		});
	}

	pub fn unpin(&mut self, idx: DefaultNodeIdx) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = false;
				node.data.user_data.pinned = None;
			}
		});
	}

	/// Topmost node whose disc contains the graph-space point.
	pub fn node_at(&self, gx: f64, gy: f64, slack: f64) -> Option<DefaultNodeIdx> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let reach = node.data.user_data.radius + slack;
			if dx * dx + dy * dy < reach * reach {
				found = Some(node.index());
			}
		});
		found
	}

	fn hold_pinned(&mut self) {
		self.graph.visit_nodes_mut(|node| {
			if let Some((x, y)) = node.data.user_data.pinned {
				node.data.x = x;
				node.data.y = y;
			}
		});
	}

	/// Shift free nodes so the centroid of the whole graph sits on `center`.
	fn recenter(&mut self) {
		let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
		self.graph.visit_nodes(|node| {
			sx += node.x() as f64;
			sy += node.y() as f64;
			n += 1;
		});
		if n == 0 {
			return;
		}
		let (dx, dy) = (
			(self.center.0 - sx / n as f64) as f32,
			(self.center.1 - sy / n as f64) as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data.pinned.is_none() {
				node.data.x += dx;
				node.data.y += dy;
			}
		});
	}

	/// Push apart free nodes whose rendered discs overlap.
	fn separate_overlaps(&mut self) {
		let mut bodies = Vec::new();
		self.graph.visit_nodes(|node| {
			bodies.push((
				node.index(),
				node.x() as f64,
				node.y() as f64,
				node.data.user_data.radius,
				node.data.user_data.pinned.is_some(),
			));
		});

		let strength = self.settings.collide_strength;
		let mut shift: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();
		for (i, &(a, ax, ay, ar, a_pinned)) in bodies.iter().enumerate() {
			for &(b, bx, by, br, b_pinned) in &bodies[i + 1..] {
				let (dx, dy) = (bx - ax, by - ay);
				let dist = (dx * dx + dy * dy).sqrt().max(1e-6);
				let overlap = ar + br - dist;
				if overlap <= 0.0 {
					continue;
				}
				let push = overlap / dist * strength * 0.5;
				if !a_pinned {
					let s = shift.entry(a).or_default();
					s.0 -= dx * push;
					s.1 -= dy * push;
				}
				if !b_pinned {
					let s = shift.entry(b).or_default();
					s.0 += dx * push;
					s.1 += dy * push;
				}
			}
		}

		self.graph.visit_nodes_mut(|node| {
			if let Some(&(dx, dy)) = shift.get(&node.index()) {
				node.data.x += dx as f32;
				node.data.y += dy as f32;
			}
		});
	}
}
