use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{NodeStyle, RenderSet, Shape};

/// Physics iterations run before the layout is considered stable.
pub const STABILIZATION_ITERATIONS: u32 = 200;
/// Iterations granted after a drag so neighbours can settle.
pub const SETTLE_ITERATIONS: u32 = 60;
/// Extra pick tolerance around a node, in graph space.
pub const HIT_SLOP: f64 = 4.0;
/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub style: NodeStyle,
	/// Half width and height of the drawn shape, used for picking.
	pub half_extents: (f64, f64),
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	/// Physics ticks left before the simulation stops.
	pub iterations_left: u32,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	order: Vec<DefaultNodeIdx>,
}

impl ForceGraphState {
	pub fn new(data: &RenderSet, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 600.0,
			force_spring: 0.04,
			force_max: 120.0,
			node_speed: 3000.0,
			damping_factor: 0.85,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();
		let mut order = Vec::with_capacity(data.nodes.len());

		let count = data.nodes.len().max(1) as f64;
		let ring = 80.0 + 25.0 * count.sqrt();
		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let idx = graph.add_node(NodeData {
				x: (ring * angle.cos()) as f32,
				y: (ring * angle.sin()) as f32,
				mass: (node.style.size / 2.0) as f32,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					style: node.style.clone(),
					half_extents: node.style.half_extents(&node.label),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			order.push(idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		Self {
			graph,
			edges,
			order,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			iterations_left: STABILIZATION_ITERATIONS,
		}
	}

	pub fn is_simulating(&self) -> bool {
		self.iterations_left > 0 || self.drag.active
	}

	/// Re-arms the simulation for a short settle, e.g. after a drag.
	pub fn settle(&mut self) {
		self.iterations_left = self.iterations_left.max(SETTLE_ITERATIONS);
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// First node, in insertion order, under the screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut hits = Vec::new();
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let (hw, hh) = info.half_extents;
			let hit = match info.style.shape {
				Shape::Dot => (dx * dx + dy * dy).sqrt() <= hw + HIT_SLOP,
				Shape::Box => dx.abs() <= hw + HIT_SLOP && dy.abs() <= hh + HIT_SLOP,
			};
			if hit {
				hits.push(node.index());
			}
		});
		self.order.iter().copied().find(|idx| hits.contains(idx))
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the previous highlight around for the fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Advances physics (while iterations remain) and the hover animation.
	pub fn tick(&mut self, dt: f32) {
		if self.is_simulating() {
			self.graph.update(dt);
			self.iterations_left = self.iterations_left.saturating_sub(1);
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
