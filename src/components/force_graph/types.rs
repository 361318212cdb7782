use std::collections::{HashMap, HashSet};

use log::warn;
use serde_json::Value;

use crate::graph::{GraphPayload, NodeGroup};

/// Label font size, in graph units.
pub const FONT_PX: f64 = 14.0;
/// Average glyph advance of the label font.
const CHAR_WIDTH: f64 = 8.4;
const BOX_PAD_X: f64 = 8.0;
const BOX_PAD_Y: f64 = 6.0;

const PALETTE: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
	Dot,
	Box,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub shape: Shape,
	pub fill: String,
	pub border: String,
	pub size: f64,
}

impl NodeStyle {
	/// Visual variant for a node group.
	pub fn for_group(group: &NodeGroup) -> Self {
		match group {
			NodeGroup::Topic => Self {
				shape: Shape::Box,
				fill: "#FF6B6B".into(),
				border: "#C92A2A".into(),
				size: 30.0,
			},
			NodeGroup::FilePdf => Self {
				shape: Shape::Dot,
				fill: "#4ECDC4".into(),
				border: "#2C7873".into(),
				size: 20.0,
			},
			NodeGroup::Unknown => Self::dot(PALETTE[0]),
			NodeGroup::Other(name) => {
				let hash = name.bytes().fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
				Self::dot(PALETTE[hash % PALETTE.len()])
			}
		}
	}

	fn dot(color: &str) -> Self {
		Self {
			shape: Shape::Dot,
			fill: color.into(),
			border: color.into(),
			size: 20.0,
		}
	}

	/// Radius in graph space; sizes follow the 20/30 scale of the payload.
	pub fn radius(&self) -> f64 {
		self.size / 2.0
	}

	/// Half width and half height of the drawn shape; boxes grow with their label.
	pub fn half_extents(&self, label: &str) -> (f64, f64) {
		match self.shape {
			Shape::Dot => (self.radius(), self.radius()),
			Shape::Box => {
				let text = label.chars().count() as f64 * CHAR_WIDTH;
				(text / 2.0 + BOX_PAD_X, FONT_PX / 2.0 + BOX_PAD_Y)
			}
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderNode {
	pub id: String,
	pub label: String,
	pub style: NodeStyle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderLink {
	pub source: String,
	pub target: String,
}

/// What the canvas draws: visible nodes and the links between them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderSet {
	pub nodes: Vec<RenderNode>,
	pub links: Vec<RenderLink>,
}

impl RenderSet {
	/// Nodes in `hidden` groups are left out, along with their links.
	/// Links to unknown ids are dropped.
	pub fn build(payload: &GraphPayload, hidden: &HashSet<NodeGroup>) -> Self {
		let mut known = HashMap::new();
		let mut nodes = Vec::with_capacity(payload.nodes.len());

		for node in &payload.nodes {
			let visible = !hidden.contains(&node.group);
			known.insert(node.id.as_str(), visible);
			if !visible {
				continue;
			}
			let mut style = NodeStyle::for_group(&node.group);
			if let Some(color) = &node.color {
				style.fill = color.clone();
			}
			if let Some(size) = node.size.filter(|s| *s > 0.0) {
				style.size = size;
			}
			match node.extra.get("shape").and_then(Value::as_str) {
				Some("box") => style.shape = Shape::Box,
				Some("dot" | "circle") => style.shape = Shape::Dot,
				_ => {}
			}
			nodes.push(RenderNode {
				id: node.id.clone(),
				label: node.display_label().to_string(),
				style,
			});
		}

		let mut dangling = 0;
		let links = payload
			.edges
			.iter()
			.filter(|edge| {
				match (known.get(edge.source.as_str()), known.get(edge.target.as_str())) {
					(Some(&src), Some(&tgt)) => src && tgt,
					_ => {
						dangling += 1;
						false
					}
				}
			})
			.map(|edge| RenderLink {
				source: edge.source.clone(),
				target: edge.target.clone(),
			})
			.collect();

		if dangling > 0 {
			warn!("Skipping {dangling} edges that reference unknown nodes");
		}
		Self { nodes, links }
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
