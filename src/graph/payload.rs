use std::fmt;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::api::RawGraph;
use crate::error::AppError;

/// Node category; drives the visual variant and the visibility filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeGroup {
	Topic,
	FilePdf,
	#[default]
	Unknown,
	Other(String),
}

impl NodeGroup {
	pub fn from_wire(name: &str) -> Self {
		match name {
			"topic" => Self::Topic,
			"file_pdf" => Self::FilePdf,
			"" => Self::Unknown,
			other => Self::Other(other.to_string()),
		}
	}
}

impl fmt::Display for NodeGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Topic => f.write_str("topic"),
			Self::FilePdf => f.write_str("file_pdf"),
			Self::Unknown => f.write_str("unknown"),
			Self::Other(name) => f.write_str(name),
		}
	}
}

/// Accepts string or numeric group names; a missing or null group is `Unknown`.
impl<'de> Deserialize<'de> for NodeGroup {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		match Option::<Value>::deserialize(deserializer)? {
			None | Some(Value::Null) => Ok(Self::Unknown),
			Some(Value::String(name)) => Ok(Self::from_wire(&name)),
			Some(Value::Number(n)) => Ok(Self::Other(n.to_string())),
			Some(other) => Err(de::Error::custom(format!("expected a group name, got {other}"))),
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Node {
	#[serde(deserialize_with = "string_or_number")]
	pub id: String,
	#[serde(default)]
	pub group: NodeGroup,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub size: Option<f64>,
	#[serde(default)]
	pub url: Option<String>,
	/// Rendering attributes this client does not interpret.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Node {
	/// Label to paint; falls back to the id for unlabeled nodes.
	pub fn display_label(&self) -> &str {
		if self.label.is_empty() { &self.id } else { &self.label }
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Edge {
	#[serde(alias = "from", deserialize_with = "string_or_number")]
	pub source: String,
	#[serde(alias = "to", deserialize_with = "string_or_number")]
	pub target: String,
}

/// Decoded topic graph for one course.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphPayload {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	pub metadata: Map<String, Value>,
}

impl GraphPayload {
	/// Decodes the three graph fields independently.
	///
	/// A field may hold a serialized JSON string or an already-structured value.
	/// Absent or null fields decode to empty.
	pub fn decode(raw: &RawGraph) -> Result<Self, AppError> {
		Ok(Self {
			nodes: decode_field("nodes", raw.nodes.as_ref())?,
			edges: decode_field("edges", raw.edges.as_ref())?,
			metadata: decode_field("data", raw.data.as_ref())?,
		})
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

fn decode_field<T: DeserializeOwned + Default>(field: &str, value: Option<&Value>) -> Result<T, AppError> {
	match value {
		None | Some(Value::Null) => Ok(T::default()),
		Some(Value::String(text)) if text.trim().is_empty() => Ok(T::default()),
		Some(Value::String(text)) => serde_json::from_str(text).map_err(|e| AppError::parse(field, e)),
		Some(structured) => T::deserialize(structured).map_err(|e| AppError::parse(field, e)),
	}
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	match Value::deserialize(deserializer)? {
		Value::String(s) => Ok(s),
		Value::Number(n) => Ok(n.to_string()),
		other => Err(de::Error::custom(format!("expected a string or number id, got {other}"))),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn raw(nodes: Value, edges: Value, data: Value) -> RawGraph {
		RawGraph {
			nodes: Some(nodes),
			edges: Some(edges),
			data: Some(data),
		}
	}

	#[test]
	fn empty_serialized_fields_decode_to_empty_payload() {
		let payload = GraphPayload::decode(&raw(json!("[]"), json!("[]"), json!("{}"))).unwrap();
		assert!(payload.nodes.is_empty());
		assert!(payload.edges.is_empty());
		assert!(payload.metadata.is_empty());
	}

	#[test]
	fn absent_fields_default_to_empty() {
		let payload = GraphPayload::decode(&RawGraph::default()).unwrap();
		assert_eq!(payload, GraphPayload::default());
	}

	#[test]
	fn malformed_nodes_is_a_parse_error() {
		let err = GraphPayload::decode(&raw(json!("[{not json"), json!("[]"), json!("{}"))).unwrap_err();
		assert!(matches!(err, AppError::Parse { ref field, .. } if field == "nodes"), "{err}");
	}

	#[test]
	fn wrong_shape_is_a_parse_error() {
		let err = GraphPayload::decode(&raw(json!("[]"), json!("{\"a\":1}"), json!("{}"))).unwrap_err();
		assert!(matches!(err, AppError::Parse { ref field, .. } if field == "edges"), "{err}");
	}

	#[test]
	fn decodes_vis_style_nodes_and_edges() {
		let nodes = json!([
			{"id": "topic_0", "label": "Limits", "group": "topic", "title": "Limits and continuity"},
			{"id": 101, "label": "Chapter 3.pdf", "group": "file_pdf", "shape": "dot"}
		])
		.to_string();
		let edges = json!([{"from": "topic_0", "to": 101}]).to_string();
		let data = json!({"topic_0": {"summary": "Approaching values"}}).to_string();

		let payload = GraphPayload::decode(&raw(json!(nodes), json!(edges), json!(data))).unwrap();

		assert_eq!(payload.nodes.len(), 2);
		assert_eq!(payload.nodes[0].group, NodeGroup::Topic);
		assert_eq!(payload.nodes[1].id, "101");
		assert_eq!(payload.nodes[1].group, NodeGroup::FilePdf);
		assert_eq!(payload.nodes[1].extra.get("shape"), Some(&json!("dot")));
		assert_eq!(
			payload.edges,
			vec![Edge {
				source: "topic_0".into(),
				target: "101".into()
			}]
		);
		assert!(payload.metadata.contains_key("topic_0"));
	}

	#[test]
	fn numeric_and_missing_groups_still_decode() {
		let payload = GraphPayload::decode(&raw(
			json!([{"id": "a", "group": 3}, {"id": "b"}, {"id": "c", "group": null}]),
			Value::Null,
			Value::Null,
		))
		.unwrap();
		assert_eq!(payload.nodes[0].group, NodeGroup::Other("3".into()));
		assert_eq!(payload.nodes[1].group, NodeGroup::Unknown);
		assert_eq!(payload.nodes[2].group, NodeGroup::Unknown);

		let err = GraphPayload::decode(&raw(json!([{"id": "d", "group": ["x"]}]), Value::Null, Value::Null))
			.unwrap_err();
		assert!(matches!(err, AppError::Parse { ref field, .. } if field == "nodes"), "{err}");
	}

	#[test]
	fn structured_fields_are_accepted() {
		let payload = GraphPayload::decode(&raw(
			json!([{"id": "a", "group": "lecture"}]),
			json!([{"source": "a", "target": "missing"}]),
			Value::Null,
		))
		.unwrap();
		assert_eq!(payload.nodes[0].group, NodeGroup::Other("lecture".into()));
		assert_eq!(payload.nodes[0].display_label(), "a");
		// dangling references are kept; the view drops them
		assert_eq!(payload.edges.len(), 1);
		assert!(payload.metadata.is_empty());
	}
}
