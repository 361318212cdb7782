use serde_json::Value;

use super::payload::{GraphPayload, NodeGroup};

/// What the details panel shows for a selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetails {
	pub id: String,
	pub label: String,
	pub group: NodeGroup,
	pub summary: Option<String>,
	pub sources: Vec<String>,
	pub link: Option<String>,
}

impl GraphPayload {
	/// Resolves a node id to its details, merging in `metadata[id]` when present.
	pub fn details(&self, id: &str) -> Option<NodeDetails> {
		let node = self.node(id)?;
		let meta = self.metadata.get(id).and_then(Value::as_object);
		let text = |key: &str| {
			meta.and_then(|m| m.get(key))
				.and_then(Value::as_str)
				.map(str::to_string)
		};

		let sources = meta
			.and_then(|m| m.get("sources"))
			.and_then(Value::as_array)
			.map(|items| {
				items
					.iter()
					.filter_map(|s| s.as_str().map(str::to_string))
					.collect()
			})
			.unwrap_or_default();

		Some(NodeDetails {
			id: node.id.clone(),
			label: node.display_label().to_string(),
			group: node.group.clone(),
			summary: text("summary").or_else(|| node.title.clone()),
			sources,
			link: text("url")
				.or_else(|| text("link"))
				.or_else(|| node.url.clone()),
		})
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use crate::api::RawGraph;

	use super::*;

	fn payload() -> GraphPayload {
		GraphPayload::decode(&RawGraph {
			nodes: Some(json!([
				{"id": "t1", "label": "Derivatives", "group": "topic", "title": "Rates of change"},
				{"id": "f1", "label": "Lecture 5.pdf", "group": "file_pdf", "url": "/files/102"}
			])),
			edges: None,
			data: Some(json!({
				"t1": {"summary": "Slopes of tangent lines", "sources": ["Lecture 5.pdf", 7]}
			})),
		})
		.unwrap()
	}

	#[test]
	fn topic_details_prefer_metadata() {
		let details = payload().details("t1").unwrap();
		assert_eq!(details.label, "Derivatives");
		assert_eq!(details.group, NodeGroup::Topic);
		assert_eq!(details.summary.as_deref(), Some("Slopes of tangent lines"));
		assert_eq!(details.sources, vec!["Lecture 5.pdf"]);
		assert_eq!(details.link, None);
	}

	#[test]
	fn file_details_fall_back_to_node_attributes() {
		let details = payload().details("f1").unwrap();
		assert_eq!(details.summary, None);
		assert!(details.sources.is_empty());
		assert_eq!(details.link.as_deref(), Some("/files/102"));
	}

	#[test]
	fn unknown_id_has_no_details() {
		assert_eq!(payload().details("nope"), None);
	}
}
