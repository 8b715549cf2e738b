use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use log::debug;

use super::scale::Encodings;
use super::simulation::{ForceSettings, NodeInfo, Simulation};
use super::tooltip::TooltipContent;
use super::types::GraphData;

/// Extra hit-test reach around a node disc, in graph units.
pub const HIT_SLACK: f64 = 2.0;
/// Pointer travel (screen px) below which a press/release counts as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;
pub const FRAME_DT: f32 = 0.016;

#[derive(Clone, Debug, PartialEq)]
pub struct GraphViewConfig {
	/// Fixed point the centering force pulls the centroid to. `None` follows
	/// the viewport center.
	pub center: Option<(f64, f64)>,
	pub radius_range: (f64, f64),
	pub zoom_extent: (f64, f64),
	pub settings: ForceSettings,
	/// Energy the layout is held at while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for GraphViewConfig {
	fn default() -> Self {
		Self {
			center: None,
			radius_range: (5.0, 20.0),
			zoom_extent: (0.1, 10.0),
			settings: ForceSettings::default(),
			drag_alpha_target: 0.3,
		}
	}
}

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	/// Node position minus pointer position at grab time, in graph units.
	pub offset_x: f64,
	pub offset_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

/// What a pointer release amounted to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Release {
	NodeClick(DefaultNodeIdx),
	BackgroundClick,
	Moved,
	None,
}

pub struct GraphViewState {
	pub simulation: Simulation,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	config: GraphViewConfig,
	tooltips: HashMap<DefaultNodeIdx, TooltipContent>,
}

impl GraphViewState {
	pub fn new(
		data: &GraphData,
		encodings: &Encodings,
		config: GraphViewConfig,
		width: f64,
		height: f64,
	) -> Self {
		let center = config.center.unwrap_or((width / 2.0, height / 2.0));
		let mut simulation = Simulation::new(config.settings, center);
		let mut tooltips = HashMap::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = (
				(center.0 + 100.0 * angle.cos()) as f32,
				(center.1 + 100.0 * angle.sin()) as f32,
			);
			let idx = simulation.add_node(
				NodeInfo {
					id: node.id.clone(),
					radius: encodings.node_radius(&node.id),
					color: encodings.node_color(node).into(),
					pinned: None,
				},
				x,
				y,
			);
			if let Some(content) = TooltipContent::for_node(node) {
				tooltips.insert(idx, content);
			}
		}
		for link in &data.links {
			simulation.add_link(&link.source, &link.target);
		}
		debug!("Graph view initialized at {}x{}", width, height);

		Self {
			simulation,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			config,
			tooltips,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.simulation.node_at(gx, gy, HIT_SLACK)
	}

	/// Press at a screen point: grab the node under it, or start panning.
	pub fn press(&mut self, sx: f64, sy: f64) {
		match self.node_at_position(sx, sy) {
			Some(idx) => self.begin_drag(idx, sx, sy),
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
					moved: false,
				};
			}
		}
	}

	pub fn begin_drag(&mut self, idx: DefaultNodeIdx, sx: f64, sy: f64) {
		let Some((nx, ny)) = self.simulation.position(idx) else {
			return;
		};
		if !self.drag.active {
			self.simulation.set_alpha_target(self.config.drag_alpha_target);
			self.simulation.restart();
		}
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			offset_x: nx - gx,
			offset_y: ny - gy,
			moved: false,
		};
		self.simulation.pin(idx, nx, ny);
	}

	/// Pointer moved to a screen point while pressed.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			if travelled(self.drag.start_x, self.drag.start_y, sx, sy) {
				self.drag.moved = true;
			}
			let (gx, gy) = self.screen_to_graph(sx, sy);
			self.simulation
				.pin(idx, gx + self.drag.offset_x, gy + self.drag.offset_y);
		} else if self.pan.active {
			if travelled(self.pan.start_x, self.pan.start_y, sx, sy) {
				self.pan.moved = true;
			}
			self.pan_to(sx, sy);
		}
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
	}

	/// Pointer released or left the surface.
	pub fn release(&mut self) -> Release {
		let outcome = if self.drag.active {
			let idx = self.drag.node_idx;
			self.end_drag();
			match idx {
				Some(idx) if !self.drag.moved => Release::NodeClick(idx),
				_ => Release::Moved,
			}
		} else if self.pan.active {
			if self.pan.moved {
				Release::Moved
			} else {
				Release::BackgroundClick
			}
		} else {
			Release::None
		};
		self.drag = DragState::default();
		self.pan = PanState::default();
		outcome
	}

	fn end_drag(&mut self) {
		if let Some(idx) = self.drag.node_idx {
			self.simulation.unpin(idx);
		}
		self.drag.active = false;
		self.simulation.set_alpha_target(0.0);
	}

	/// Scale about a screen point, keeping that point fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let (min_k, max_k) = self.config.zoom_extent;
		let new_k = (self.transform.k * factor).clamp(min_k, max_k);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn apply_settings(&mut self, settings: ForceSettings) {
		self.simulation.set_settings(settings);
		self.simulation.reheat(1.0);
		debug!("Applied force settings {:?}", self.simulation.settings());
	}

	/// Freeze the layout where it is. Dragging or applying settings resumes it.
	pub fn stop_layout(&mut self) {
		if self.simulation.is_idle() {
			return;
		}
		self.simulation.stop();
		debug!("Layout stopped at alpha {:.3}", self.simulation.alpha());
	}

	pub fn tooltip_for(&self, idx: DefaultNodeIdx) -> Option<&TooltipContent> {
		self.tooltips.get(&idx)
	}

	pub fn tick(&mut self) -> bool {
		self.simulation.tick(FRAME_DT)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		if self.config.center.is_none() {
			self.simulation.set_center((width / 2.0, height / 2.0));
		}
	}
}

fn travelled(x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
	let (dx, dy) = (x1 - x0, y1 - y0);
	dx * dx + dy * dy > CLICK_TOLERANCE * CLICK_TOLERANCE
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::loader::parse_graph;

	const GRAPH: &str = r#"{
		"nodes": [
			{"id": "A", "publications": [{"p": {"Title": "Alpha", "Year": 2001, "Citations": 3, "Publisher": "IEEE", "Country": "Chile"}}]},
			{"id": "B", "publications": [{"p": {"Country": "Peru"}}]},
			{"id": "C", "publications": [{"p": {"Country": "Chile"}}]}
		],
		"links": [{"source": "A", "target": "B"}, {"source": "A", "target": "C"}]
	}"#;

	fn view() -> GraphViewState {
		let data = parse_graph(GRAPH).unwrap();
		let config = GraphViewConfig::default();
		let encodings = Encodings::new(&data, config.radius_range);
		GraphViewState::new(&data, &encodings, config, 800.0, 600.0)
	}

	fn radii(state: &GraphViewState) -> Vec<f64> {
		let mut out = Vec::new();
		state.simulation.graph().visit_nodes(|n| out.push(n.data.user_data.radius));
		out
	}

	#[test]
	fn node_radius_comes_from_original_degree() {
		let state = view();
		assert_eq!(radii(&state), vec![20.0, 5.0, 5.0]);
	}

	#[test]
	fn drag_pins_then_release_unpins() {
		let mut state = view();
		let a = state.simulation.index_of("A").unwrap();
		let (nx, ny) = state.simulation.position(a).unwrap();

		state.press(nx, ny);
		assert!(state.drag.active);
		assert_eq!(state.simulation.alpha_target(), 0.3);
		assert!(!state.simulation.is_idle());

		state.drag_to(100.0, 200.0);
		let (px, py) = state.simulation.pinned(a).unwrap();
		assert!((px - 100.0).abs() < 1e-3 && (py - 200.0).abs() < 1e-3);
		state.tick();
		let (x, y) = state.simulation.position(a).unwrap();
		assert!((x - 100.0).abs() < 1e-3 && (y - 200.0).abs() < 1e-3);

		assert_eq!(state.release(), Release::Moved);
		assert_eq!(state.simulation.pinned(a), None);
		assert_eq!(state.simulation.alpha_target(), 0.0);
	}

	#[test]
	fn press_and_release_in_place_is_a_click() {
		let mut state = view();
		let b = state.simulation.index_of("B").unwrap();
		let (nx, ny) = state.simulation.position(b).unwrap();
		state.press(nx, ny);
		state.drag_to(nx + 1.0, ny);
		assert_eq!(state.release(), Release::NodeClick(b));
		assert_eq!(state.tooltip_for(b).unwrap().id, "B");
	}

	#[test]
	fn background_press_pans() {
		let mut state = view();
		state.press(5.0, 5.0);
		state.drag_to(55.0, 25.0);
		assert_eq!((state.transform.x, state.transform.y), (50.0, 20.0));
		assert_eq!(state.release(), Release::Moved);

		state.press(5.0, 5.0);
		assert_eq!(state.release(), Release::BackgroundClick);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = view();
		for _ in 0..100 {
			state.zoom_at(400.0, 300.0, 1.1);
		}
		assert_eq!(state.transform.k, 10.0);
		for _ in 0..200 {
			state.zoom_at(400.0, 300.0, 0.9);
		}
		assert_eq!(state.transform.k, 0.1);
	}

	#[test]
	fn zoom_keeps_pointer_fixed() {
		let mut state = view();
		let before = state.screen_to_graph(200.0, 100.0);
		state.zoom_at(200.0, 100.0, 1.1);
		let after = state.screen_to_graph(200.0, 100.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn apply_settings_updates_forces_and_reheats() {
		let mut state = view();
		state.simulation.stop();
		state.apply_settings(ForceSettings {
			link_strength: 0.5,
			collide_strength: 0.0,
			charge_strength: -50.0,
		});
		let s = state.simulation.settings();
		assert_eq!((s.link_strength, s.charge_strength), (0.5, -50.0));
		assert_eq!(state.simulation.alpha(), 1.0);
		assert!(!state.simulation.is_idle());
		assert_eq!(state.simulation.graph().parameters.force_spring, 0.025);
		assert_eq!(state.simulation.graph().parameters.force_charge, 7500.0);

		state.apply_settings(ForceSettings::default());
		assert_eq!(state.simulation.graph().parameters.force_spring, 0.05);
		assert_eq!(state.simulation.graph().parameters.force_charge, 150.0);
	}

	#[test]
	fn stop_layout_idles_until_next_drag() {
		let mut state = view();
		state.stop_layout();
		assert!(state.simulation.is_idle());
		assert!(!state.tick());

		let a = state.simulation.index_of("A").unwrap();
		let (nx, ny) = state.simulation.position(a).unwrap();
		state.press(nx, ny);
		assert!(!state.simulation.is_idle());
		assert!(state.tick());
	}

	#[test]
	fn drag_keeps_tracking_outside_the_surface() {
		let mut state = view();
		let a = state.simulation.index_of("A").unwrap();
		let (nx, ny) = state.simulation.position(a).unwrap();
		state.press(nx, ny);
		state.drag_to(-120.0, 900.0);
		assert!(state.drag.active);
		let (px, py) = state.simulation.pinned(a).unwrap();
		assert!((px + 120.0).abs() < 1e-3 && (py - 900.0).abs() < 1e-3);

		assert_eq!(state.release(), Release::Moved);
		assert_eq!(state.simulation.pinned(a), None);
	}

	#[test]
	fn interactions_leave_radius_untouched() {
		let mut state = view();
		let before = radii(&state);
		let a = state.simulation.index_of("A").unwrap();
		let (nx, ny) = state.simulation.position(a).unwrap();
		state.press(nx, ny);
		state.drag_to(nx + 40.0, ny - 40.0);
		for _ in 0..10 {
			state.tick();
		}
		state.release();
		state.apply_settings(ForceSettings::default());
		state.tick();
		assert_eq!(radii(&state), before);
		assert_eq!(before[0], 20.0);
	}
}
