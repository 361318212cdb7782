//! Backend endpoints consumed by the client.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

pub use http::HttpBackend;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct InitializeRequest {
	pub course_id: String,
	pub topics: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct InitializeResponse {
	pub status: String,
}

/// Graph fields exactly as the backend returns them.
///
/// Each field is usually a JSON string holding serialized data; decoding
/// happens in [`crate::graph::GraphPayload::decode`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawGraph {
	#[serde(default)]
	pub nodes: Option<Value>,
	#[serde(default)]
	pub edges: Option<Value>,
	#[serde(default)]
	pub data: Option<Value>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
	pub course_id: String,
	pub query: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
	pub answer: String,
	#[serde(default)]
	pub sources: Vec<String>,
}

/// The course backend. Futures are `!Send`; everything runs on the browser event loop.
#[async_trait(?Send)]
pub trait Backend {
	async fn initialize_course(&self, request: &InitializeRequest) -> Result<InitializeResponse, AppError>;

	async fn get_graph(&self, course_id: &str) -> Result<RawGraph, AppError>;

	async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AppError>;
}
