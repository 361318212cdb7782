//! In-memory backend and virtual clock for driving the async flows in tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use leptos::reactive::owner::Owner;

use crate::api::{Backend, ChatReply, ChatRequest, InitializeRequest, InitializeResponse, RawGraph};
use crate::config::BootConfig;
use crate::error::AppError;
use crate::poll::Timer;
use crate::session::Session;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
	Initialize(InitializeRequest),
	GetGraph(String),
	Chat(ChatRequest),
}

/// Replays queued replies. An empty graph queue answers "not ready";
/// empty init and chat queues answer with a request error.
#[derive(Default)]
pub struct FakeBackend {
	init_replies: RefCell<VecDeque<Result<InitializeResponse, AppError>>>,
	graph_replies: RefCell<VecDeque<Result<RawGraph, AppError>>>,
	chat_replies: RefCell<VecDeque<Result<ChatReply, AppError>>>,
	calls: RefCell<Vec<Call>>,
	before_chat: RefCell<Option<Box<dyn Fn()>>>,
}

impl FakeBackend {
	pub fn queue_init(&self, reply: Result<InitializeResponse, AppError>) {
		self.init_replies.borrow_mut().push_back(reply);
	}

	pub fn queue_graph(&self, reply: Result<RawGraph, AppError>) {
		self.graph_replies.borrow_mut().push_back(reply);
	}

	pub fn queue_chat(&self, reply: Result<ChatReply, AppError>) {
		self.chat_replies.borrow_mut().push_back(reply);
	}

	/// Runs `hook` when a chat request arrives, before it is answered.
	pub fn on_chat(&self, hook: impl Fn() + 'static) {
		*self.before_chat.borrow_mut() = Some(Box::new(hook));
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.borrow().clone()
	}

	pub fn graph_requests(&self) -> Vec<String> {
		self.calls
			.borrow()
			.iter()
			.filter_map(|c| match c {
				Call::GetGraph(id) => Some(id.clone()),
				_ => None,
			})
			.collect()
	}
}

#[async_trait(?Send)]
impl Backend for FakeBackend {
	async fn initialize_course(&self, request: &InitializeRequest) -> Result<InitializeResponse, AppError> {
		self.calls.borrow_mut().push(Call::Initialize(request.clone()));
		self.init_replies
			.borrow_mut()
			.pop_front()
			.unwrap_or_else(|| Err(AppError::request("initialize-course", "no reply queued")))
	}

	async fn get_graph(&self, course_id: &str) -> Result<RawGraph, AppError> {
		self.calls.borrow_mut().push(Call::GetGraph(course_id.to_string()));
		self.graph_replies
			.borrow_mut()
			.pop_front()
			.unwrap_or_else(|| Ok(RawGraph::default()))
	}

	async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, AppError> {
		self.calls.borrow_mut().push(Call::Chat(request.clone()));
		if let Some(hook) = self.before_chat.borrow().as_ref() {
			hook();
		}
		self.chat_replies
			.borrow_mut()
			.pop_front()
			.unwrap_or_else(|| Err(AppError::request("chat", "no reply queued")))
	}
}

/// Clock that jumps forward by the requested amount on every sleep.
#[derive(Default)]
pub struct FakeTimer {
	now: Cell<f64>,
	sleeps: Cell<u32>,
}

impl FakeTimer {
	pub fn sleeps(&self) -> u32 {
		self.sleeps.get()
	}
}

#[async_trait(?Send)]
impl Timer for FakeTimer {
	async fn sleep(&self, ms: u32) {
		self.sleeps.set(self.sleeps.get() + 1);
		self.now.set(self.now.get() + f64::from(ms));
	}

	fn now_ms(&self) -> f64 {
		self.now.get()
	}
}

/// Session built from meta-style `pairs`, owned by a fresh reactive owner.
pub fn session(pairs: &[(&str, &str)]) -> Session {
	let config = BootConfig::from_lookup(|key| {
		pairs
			.iter()
			.find(|(k, _)| *k == key)
			.map(|(_, v)| v.to_string())
	})
	.expect("test config needs a course-id");
	// the thread-local keeps the owner, and with it the signals, alive
	Owner::new().set();
	Session::new(config)
}
