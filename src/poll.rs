//! Readiness polling: wait for a predicate, bounded by a deadline.

use std::future::Future;

use async_trait::async_trait;
use log::{debug, info, warn};
use thiserror::Error;

use crate::api::Backend;
use crate::config::PollPolicy;
use crate::error::AppError;
use crate::graph::GraphPayload;

/// Time source for the poll loop.
#[async_trait(?Send)]
pub trait Timer {
	async fn sleep(&self, ms: u32);

	fn now_ms(&self) -> f64;
}

/// Browser event-loop timer; dropping a pending sleep clears its timeout.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

#[async_trait(?Send)]
impl Timer for BrowserTimer {
	async fn sleep(&self, ms: u32) {
		gloo_timers::future::TimeoutFuture::new(ms).await;
	}

	fn now_ms(&self) -> f64 {
		js_sys::Date::now()
	}
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PollError {
	#[error("gave up after {attempts} checks")]
	TimedOut { attempts: u32 },
}

/// Runs `check` every `policy.interval_ms` until it yields a value.
///
/// The deadline is measured from the call, is checked before every attempt and
/// is never extended by failed checks. A failed check is logged and polling
/// continues.
pub async fn poll_until<T, C, F, Fut>(timer: &C, policy: &PollPolicy, mut check: F) -> Result<T, PollError>
where
	C: Timer + ?Sized,
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<Option<T>, AppError>>,
{
	let started = timer.now_ms();
	let deadline = f64::from(policy.timeout_ms);
	let mut attempts = 0;

	loop {
		timer.sleep(policy.interval_ms).await;
		if timer.now_ms() - started >= deadline {
			return Err(PollError::TimedOut { attempts });
		}

		attempts += 1;
		match check().await {
			Ok(Some(value)) => return Ok(value),
			Ok(None) => debug!("Poll attempt {attempts}: not ready"),
			Err(e) => warn!("Poll attempt {attempts} failed: {e}"),
		}
	}
}

/// Polls the graph endpoint until the course has at least one node.
pub async fn wait_for_graph<B, C>(
	backend: &B,
	timer: &C,
	course_id: &str,
	policy: &PollPolicy,
) -> Result<GraphPayload, PollError>
where
	B: Backend + ?Sized,
	C: Timer + ?Sized,
{
	info!(
		"Waiting for course {course_id} (every {} ms, up to {} ms)",
		policy.interval_ms, policy.timeout_ms
	);
	poll_until(timer, policy, move || async move {
		let raw = backend.get_graph(course_id).await?;
		let payload = GraphPayload::decode(&raw)?;
		Ok::<_, AppError>((!payload.is_empty()).then_some(payload))
	})
	.await
}
