//! Course initialization: submit the instructor's topics to the backend.

use log::{info, warn};

use crate::api::{Backend, InitializeRequest};
use crate::error::AppError;
use crate::lifecycle::LifecycleState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
	/// The graph was built synchronously.
	Ready,
	/// The backend accepted the job; readiness has to be polled.
	Started,
	/// The backend answered with a status this client does not know.
	Unrecognized(String),
}

impl InitOutcome {
	fn from_status(status: &str) -> Self {
		match status.trim().to_ascii_lowercase().as_str() {
			"complete" => Self::Ready,
			"generating" | "pending" | "started" => Self::Started,
			_ => Self::Unrecognized(status.to_string()),
		}
	}

	/// The state to move to, if any.
	pub fn next_state(&self) -> Option<LifecycleState> {
		match self {
			Self::Ready => Some(LifecycleState::Active),
			Self::Started => Some(LifecycleState::Generating),
			Self::Unrecognized(_) => None,
		}
	}
}

/// Sends the free-text topics for `course_id`. No retry on failure.
pub async fn submit_topics<B: Backend + ?Sized>(
	backend: &B,
	course_id: &str,
	topics: &str,
) -> Result<InitOutcome, AppError> {
	let request = InitializeRequest {
		course_id: course_id.to_string(),
		topics: topics.to_string(),
	};
	let response = backend.initialize_course(&request).await?;
	let outcome = InitOutcome::from_status(&response.status);
	match &outcome {
		InitOutcome::Unrecognized(status) => {
			warn!("Course {course_id} initialization returned unknown status {status:?}")
		}
		_ => info!("Course {course_id} initialization: {}", response.status),
	}
	Ok(outcome)
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::api::InitializeResponse;
	use crate::test_support::{Call, FakeBackend};

	fn status(s: &str) -> Result<InitializeResponse, AppError> {
		Ok(InitializeResponse { status: s.into() })
	}

	#[test]
	fn complete_status_moves_to_active() {
		let backend = FakeBackend::default();
		backend.queue_init(status("complete"));

		let outcome = block_on(submit_topics(&backend, "c1", "Limits\nDerivatives")).unwrap();

		assert_eq!(outcome, InitOutcome::Ready);
		assert_eq!(outcome.next_state(), Some(LifecycleState::Active));
		assert_eq!(
			backend.calls(),
			vec![Call::Initialize(InitializeRequest {
				course_id: "c1".into(),
				topics: "Limits\nDerivatives".into(),
			})]
		);
	}

	#[test]
	fn pending_status_moves_to_generating() {
		let backend = FakeBackend::default();
		backend.queue_init(status("GENERATING"));

		let outcome = block_on(submit_topics(&backend, "c1", "Limits")).unwrap();

		assert_eq!(outcome.next_state(), Some(LifecycleState::Generating));
	}

	#[test]
	fn unknown_status_keeps_the_state() {
		let backend = FakeBackend::default();
		backend.queue_init(status("queued-for-review"));

		let outcome = block_on(submit_topics(&backend, "c1", "Limits")).unwrap();

		assert_eq!(outcome, InitOutcome::Unrecognized("queued-for-review".into()));
		assert_eq!(outcome.next_state(), None);
	}

	#[test]
	fn request_failure_is_returned_without_retry() {
		let backend = FakeBackend::default();
		backend.queue_init(Err(AppError::request("initialize-course", "offline")));

		let err = block_on(submit_topics(&backend, "c1", "Limits")).unwrap_err();

		assert!(matches!(err, AppError::Request { .. }));
		assert_eq!(backend.calls().len(), 1);
	}
}
