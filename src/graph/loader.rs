use log::{info, warn};

use super::payload::GraphPayload;
use crate::api::Backend;
use crate::error::AppError;

/// Fetches and decodes the course graph.
///
/// Zero nodes is not an error, only worth a warning.
pub async fn load_graph<B: Backend + ?Sized>(backend: &B, course_id: &str) -> Result<GraphPayload, AppError> {
	let raw = backend.get_graph(course_id).await?;
	let payload = GraphPayload::decode(&raw)?;

	info!(
		"Graph for course {course_id}: {} nodes, {} edges, {} metadata entries",
		payload.nodes.len(),
		payload.edges.len(),
		payload.metadata.len()
	);
	if payload.is_empty() {
		warn!("No nodes found in graph data for course {course_id}");
	}
	Ok(payload)
}

/// Holds the last successfully loaded payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStore {
	current: Option<GraphPayload>,
}

impl GraphStore {
	/// Replaces the payload on success; a failed load leaves it untouched.
	pub fn apply(&mut self, result: Result<GraphPayload, AppError>) -> Result<&GraphPayload, AppError> {
		let payload = result?;
		Ok(self.current.insert(payload))
	}

	pub fn current(&self) -> Option<&GraphPayload> {
		self.current.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;
	use serde_json::json;

	use super::*;
	use crate::api::RawGraph;
	use crate::test_support::FakeBackend;

	fn graph(nodes: &str) -> RawGraph {
		RawGraph {
			nodes: Some(json!(nodes)),
			edges: Some(json!("[]")),
			data: Some(json!("{}")),
		}
	}

	#[test]
	fn empty_graph_loads_without_error() {
		let backend = FakeBackend::default();
		backend.queue_graph(Ok(graph("[]")));

		let payload = block_on(load_graph(&backend, "c1")).unwrap();

		assert!(payload.nodes.is_empty());
		assert!(payload.edges.is_empty());
		assert!(payload.metadata.is_empty());
		assert_eq!(backend.graph_requests(), vec!["c1"]);
	}

	#[test]
	fn malformed_nodes_leave_the_stored_payload_alone() {
		let backend = FakeBackend::default();
		backend.queue_graph(Ok(graph(r#"[{"id":"t1","group":"topic"}]"#)));
		backend.queue_graph(Ok(graph("nodes?")));
		let mut store = GraphStore::default();

		store.apply(block_on(load_graph(&backend, "c1"))).unwrap();
		let before = store.clone();
		let err = store.apply(block_on(load_graph(&backend, "c1"))).unwrap_err();

		assert!(matches!(err, AppError::Parse { .. }));
		assert_eq!(store, before);
		assert_eq!(store.current().map(|p| p.nodes.len()), Some(1));
	}

	#[test]
	fn transport_failure_is_a_request_error() {
		let backend = FakeBackend::default();
		backend.queue_graph(Err(AppError::request("get-graph", "status 500 Internal Server Error")));

		let err = block_on(load_graph(&backend, "c1")).unwrap_err();

		assert!(matches!(err, AppError::Request { .. }));
	}
}
