//! Per-page session context shared by every section through Leptos context.

use std::sync::Arc;

use leptos::prelude::*;
use log::info;

use crate::api::HttpBackend;
use crate::chat::ChatLog;
use crate::config::BootConfig;
use crate::graph::GraphStore;
use crate::lifecycle::LifecycleState;

#[derive(Clone)]
pub struct Session {
	pub config: Arc<BootConfig>,
	pub backend: HttpBackend,
	pub state: RwSignal<LifecycleState>,
	pub graph: RwSignal<GraphStore>,
	pub chat: RwSignal<ChatLog>,
	pub notice: RwSignal<Option<String>>,
}

impl Session {
	pub fn new(config: BootConfig) -> Self {
		Self {
			backend: HttpBackend::new(config.api_base.clone()),
			state: RwSignal::new(config.initial_state),
			graph: RwSignal::new(GraphStore::default()),
			chat: RwSignal::new(ChatLog::default()),
			notice: RwSignal::new(None),
			config: Arc::new(config),
		}
	}

	pub fn course_id(&self) -> &str {
		&self.config.course_id
	}

	pub fn transition(&self, next: LifecycleState) {
		let current = self.state.get_untracked();
		if current != next {
			info!("Course {}: {current} -> {next}", self.course_id());
			self.state.set(next);
		}
	}

	/// Shows a blocking notice; the user has to dismiss it.
	pub fn notify(&self, message: impl Into<String>) {
		self.notice.set(Some(message.into()));
	}
}
