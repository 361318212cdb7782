//! Async flows behind the page sections, run against the session state.

use leptos::prelude::Update;
use log::{debug, error, info, warn};

use crate::api::Backend;
use crate::config::TimeoutPolicy;
use crate::error::AppError;
use crate::graph::load_graph;
use crate::init::{InitOutcome, submit_topics};
use crate::lifecycle::{LifecycleState, Setup};
use crate::poll::{PollError, Timer, wait_for_graph};
use crate::session::Session;

pub const INIT_FAILED_NOTICE: &str = "Failed to initialize course. Please try again.";
pub const LOAD_FAILED_NOTICE: &str = "Failed to load graph data. Please check the console for details.";
pub const TIMEOUT_NOTICE: &str = "Course generation is taking longer than expected. Please reload the page later.";

/// Runs the setup of a newly entered section to completion.
pub async fn run_setup<B, C>(session: &Session, backend: &B, timer: &C, setup: Setup)
where
	B: Backend + ?Sized,
	C: Timer + ?Sized,
{
	debug!("Running {setup:?} for course {}", session.course_id());
	match setup {
		Setup::StartPolling => {
			let _ = run_polling(session, backend, timer).await;
		}
		Setup::LoadGraph => {
			let _ = run_graph_load(session, backend).await;
		}
		Setup::InitForm | Setup::Nothing => {}
	}
}

/// Submits the topics and moves the session on; a failure raises the notice.
pub async fn run_init<B: Backend + ?Sized>(
	session: &Session,
	backend: &B,
	topics: &str,
) -> Result<InitOutcome, AppError> {
	let result = submit_topics(backend, session.course_id(), topics).await;
	match &result {
		Ok(outcome) => {
			if let Some(next) = outcome.next_state() {
				session.transition(next);
			}
		}
		Err(e) => {
			error!("Initialization failed: {e}");
			session.notify(INIT_FAILED_NOTICE);
		}
	}
	result
}

/// Polls for readiness and moves the session to `Active` once the graph has nodes.
///
/// On timeout the state is left alone; the notice is raised only under
/// [`TimeoutPolicy::Notify`].
pub async fn run_polling<B, C>(session: &Session, backend: &B, timer: &C) -> Result<(), PollError>
where
	B: Backend + ?Sized,
	C: Timer + ?Sized,
{
	let policy = session.config.poll;
	match wait_for_graph(backend, timer, session.course_id(), &policy).await {
		Ok(payload) => {
			info!("Course {} is ready ({} nodes)", session.course_id(), payload.nodes.len());
			session.transition(LifecycleState::Active);
			Ok(())
		}
		Err(err) => {
			let PollError::TimedOut { attempts } = err;
			warn!(
				"Course {} still generating after {attempts} checks; polling stopped",
				session.course_id()
			);
			if policy.on_timeout == TimeoutPolicy::Notify {
				session.notify(TIMEOUT_NOTICE);
			}
			Err(err)
		}
	}
}

/// Fetches the course graph into the session store and returns its node count.
///
/// A failure keeps the previous payload and raises the notice.
pub async fn run_graph_load<B: Backend + ?Sized>(session: &Session, backend: &B) -> Result<usize, AppError> {
	let result = load_graph(backend, session.course_id()).await;
	let applied = session
		.graph
		.try_update(|store| store.apply(result).map(|payload| payload.nodes.len()))
		.unwrap_or(Ok(0));
	if let Err(e) = &applied {
		error!("Failed to load graph data: {e}");
		session.notify(LOAD_FAILED_NOTICE);
	}
	applied
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;
	use leptos::prelude::{GetUntracked, WithUntracked};
	use serde_json::json;

	use super::*;
	use crate::api::{InitializeResponse, RawGraph};
	use crate::graph::GraphStore;
	use crate::lifecycle::PageRenderer;
	use crate::test_support::{FakeBackend, FakeTimer, session};

	fn ready_graph() -> RawGraph {
		RawGraph {
			nodes: Some(json!(r#"[{"id":"t1","label":"Limits","group":"topic"}]"#)),
			edges: Some(json!("[]")),
			data: Some(json!("{}")),
		}
	}

	#[test]
	fn setup_to_active_loads_the_course_graph() {
		let session = session(&[("course-id", "course-7")]);
		let backend = FakeBackend::default();
		backend.queue_init(Ok(InitializeResponse {
			status: "complete".into(),
		}));
		backend.queue_graph(Ok(ready_graph()));
		let timer = FakeTimer::default();
		let mut renderer = PageRenderer::default();
		assert_eq!(renderer.enter(session.state.get_untracked()), Some(Setup::InitForm));

		let outcome = block_on(run_init(&session, &backend, "Limits")).unwrap();
		assert_eq!(outcome, InitOutcome::Ready);
		assert_eq!(session.state.get_untracked(), LifecycleState::Active);

		let setup = renderer.enter(session.state.get_untracked()).unwrap();
		assert_eq!(setup, Setup::LoadGraph);
		block_on(run_setup(&session, &backend, &timer, setup));

		assert_eq!(backend.graph_requests(), vec!["course-7"]);
		let nodes = session.graph.with_untracked(|s| s.current().map(|p| p.nodes.len()));
		assert_eq!(nodes, Some(1));
		assert_eq!(session.notice.get_untracked(), None);
		assert_eq!(timer.sleeps(), 0);
	}

	#[test]
	fn failed_init_raises_the_notice_and_keeps_the_form() {
		let session = session(&[("course-id", "c1")]);
		let backend = FakeBackend::default();
		backend.queue_init(Err(AppError::request("initialize-course", "offline")));

		assert!(block_on(run_init(&session, &backend, "Limits")).is_err());

		assert_eq!(session.state.get_untracked(), LifecycleState::NeedsInit);
		assert_eq!(session.notice.get_untracked().as_deref(), Some(INIT_FAILED_NOTICE));
	}

	#[test]
	fn generating_course_becomes_active_once_ready() {
		let session = session(&[("course-id", "c1"), ("app-state", "GENERATING")]);
		let backend = FakeBackend::default();
		backend.queue_graph(Ok(RawGraph::default()));
		backend.queue_graph(Ok(ready_graph()));
		let timer = FakeTimer::default();

		block_on(run_setup(&session, &backend, &timer, Setup::StartPolling));

		assert_eq!(session.state.get_untracked(), LifecycleState::Active);
		assert_eq!(backend.graph_requests().len(), 2);
		// the ready payload is not kept; entering Active loads it again
		assert_eq!(session.graph.get_untracked(), GraphStore::default());
	}

	#[test]
	fn timeout_stays_generating_and_is_silent_by_default() {
		let session = session(&[("course-id", "c1"), ("app-state", "GENERATING")]);
		let backend = FakeBackend::default();
		let timer = FakeTimer::default();

		let result = block_on(run_polling(&session, &backend, &timer));

		assert_eq!(result, Err(PollError::TimedOut { attempts: 29 }));
		assert_eq!(session.state.get_untracked(), LifecycleState::Generating);
		assert_eq!(session.notice.get_untracked(), None);
	}

	#[test]
	fn timeout_raises_the_notice_when_configured() {
		let session = session(&[
			("course-id", "c1"),
			("app-state", "GENERATING"),
			("poll-timeout-ms", "6000"),
			("on-timeout", "notify"),
		]);
		let backend = FakeBackend::default();
		let timer = FakeTimer::default();

		let result = block_on(run_polling(&session, &backend, &timer));

		assert_eq!(result, Err(PollError::TimedOut { attempts: 2 }));
		assert_eq!(session.state.get_untracked(), LifecycleState::Generating);
		assert_eq!(session.notice.get_untracked().as_deref(), Some(TIMEOUT_NOTICE));
	}

	#[test]
	fn failed_reload_keeps_the_shown_graph() {
		let session = session(&[("course-id", "c1"), ("app-state", "ACTIVE")]);
		let backend = FakeBackend::default();
		backend.queue_graph(Ok(ready_graph()));
		backend.queue_graph(Ok(RawGraph {
			nodes: Some(json!("[{broken")),
			..RawGraph::default()
		}));

		assert_eq!(block_on(run_graph_load(&session, &backend)), Ok(1));
		let before = session.graph.get_untracked();

		let err = block_on(run_graph_load(&session, &backend)).unwrap_err();

		assert!(matches!(err, AppError::Parse { .. }));
		assert_eq!(session.graph.get_untracked(), before);
		assert_eq!(session.notice.get_untracked().as_deref(), Some(LOAD_FAILED_NOTICE));
	}
}
