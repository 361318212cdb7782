use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use log::debug;
use serde::de::DeserializeOwned;

use super::{Backend, ChatReply, ChatRequest, InitializeRequest, InitializeResponse, RawGraph};
use crate::error::AppError;

const INITIALIZE: &str = "initialize-course";
const GET_GRAPH: &str = "get-graph";
const CHAT: &str = "chat";

/// [`Backend`] over `fetch`, rooted at the configured API base path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpBackend {
	base: String,
}

impl HttpBackend {
	pub fn new(base: impl Into<String>) -> Self {
		Self { base: base.into() }
	}

	fn url(&self, endpoint: &str) -> String {
		format!("{}/{}", self.base, endpoint)
	}
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, AppError> {
	if !response.ok() {
		return Err(AppError::request(
			endpoint,
			format!("status {} {}", response.status(), response.status_text()),
		));
	}
	response
		.json::<T>()
		.await
		.map_err(|e| AppError::request(endpoint, format!("malformed response body: {e}")))
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
	async fn initialize_course(&self, request: &InitializeRequest) -> Result<InitializeResponse, AppError> {
		debug!("POST {INITIALIZE} for course {}", request.course_id);
		let response = Request::post(&self.url(INITIALIZE))
			.json(request)
			.map_err(|e| AppError::request(INITIALIZE, e))?
			.send()
			.await
			.map_err(|e| AppError::request(INITIALIZE, e))?;
		decode(INITIALIZE, response).await
	}

	async fn get_graph(&self, course_id: &str) -> Result<RawGraph, AppError> {
		debug!("GET {GET_GRAPH} for course {course_id}");
		let response = Request::get(&self.url(GET_GRAPH))
			.query([("course_id", course_id)])
			.send()
			.await
			.map_err(|e| AppError::request(GET_GRAPH, e))?;
		decode(GET_GRAPH, response).await
	}

	async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AppError> {
		debug!("POST {CHAT} for course {}", request.course_id);
		let response = Request::post(&self.url(CHAT))
			.json(request)
			.map_err(|e| AppError::request(CHAT, e))?
			.send()
			.await
			.map_err(|e| AppError::request(CHAT, e))?;
		decode(CHAT, response).await
	}
}
