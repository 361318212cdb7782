//! Chat with the course TA bot.

use std::cell::RefCell;

use leptos::prelude::{RwSignal, Update};
use log::error;

use crate::api::{Backend, ChatReply, ChatRequest};
use crate::error::AppError;

pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
	User,
	Bot,
}

impl Sender {
	pub fn css_class(self) -> &'static str {
		match self {
			Self::User => "message user-message",
			Self::Bot => "message bot-message",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
	/// Position in the log; doubles as the render key.
	pub seq: usize,
	pub sender: Sender,
	pub text: String,
	pub sources: Vec<String>,
}

/// Append-only message log with a single in-flight slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatLog {
	messages: Vec<ChatMessage>,
	busy: bool,
}

impl ChatLog {
	/// Accepts a query: appends the user message and claims the in-flight slot.
	///
	/// Returns `None` for blank input or while a previous query is unanswered.
	pub fn begin(&mut self, raw: &str) -> Option<String> {
		let query = raw.trim();
		if query.is_empty() || self.busy {
			return None;
		}
		self.busy = true;
		self.push(Sender::User, query.to_string(), Vec::new());
		Some(query.to_string())
	}

	/// Appends the bot's answer, or the apology when the request failed.
	pub fn complete(&mut self, result: Result<ChatReply, AppError>) {
		match result {
			Ok(reply) => self.push(Sender::Bot, reply.answer, reply.sources),
			Err(e) => {
				error!("Chat failed: {e}");
				self.push(Sender::Bot, APOLOGY.to_string(), Vec::new());
			}
		}
		self.busy = false;
	}

	pub fn messages(&self) -> &[ChatMessage] {
		&self.messages
	}

	pub fn is_busy(&self) -> bool {
		self.busy
	}

	fn push(&mut self, sender: Sender, text: String, sources: Vec<String>) {
		let seq = self.messages.len();
		self.messages.push(ChatMessage {
			seq,
			sender,
			text,
			sources,
		});
	}
}

/// Somewhere a [`ChatLog`] lives; `None` when it is gone (e.g. a disposed signal).
pub trait ChatStore {
	fn with_log<R>(&self, f: impl FnOnce(&mut ChatLog) -> R) -> Option<R>;
}

impl ChatStore for RefCell<ChatLog> {
	fn with_log<R>(&self, f: impl FnOnce(&mut ChatLog) -> R) -> Option<R> {
		Some(f(&mut self.borrow_mut()))
	}
}

impl ChatStore for RwSignal<ChatLog> {
	fn with_log<R>(&self, f: impl FnOnce(&mut ChatLog) -> R) -> Option<R> {
		self.try_update(f)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
	/// Blank input or a query already in flight; nothing was sent.
	Ignored,
	Answered,
	Failed,
}

/// Sends one query, recording both sides of the exchange in `store`.
pub async fn send<B, S>(backend: &B, course_id: &str, raw: &str, store: &S) -> SendOutcome
where
	B: Backend + ?Sized,
	S: ChatStore + ?Sized,
{
	let Some(query) = store.with_log(|log| log.begin(raw)).flatten() else {
		return SendOutcome::Ignored;
	};

	let request = ChatRequest {
		course_id: course_id.to_string(),
		query,
	};
	let result = backend.chat(&request).await;
	let outcome = if result.is_ok() {
		SendOutcome::Answered
	} else {
		SendOutcome::Failed
	};
	store.with_log(|log| log.complete(result));
	outcome
}
