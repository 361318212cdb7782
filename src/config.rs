//! Boot configuration injected by the hosting page as `<meta>` tags.

use log::warn;

use crate::error::ConfigError;
use crate::lifecycle::LifecycleState;

const META_PREFIX: &str = "course-explorer:";

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 2_000;
pub const DEFAULT_POLL_TIMEOUT_MS: u32 = 60_000;

/// What the loading page does once polling gives up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeoutPolicy {
	/// Log only; the page stays on the loading section.
	#[default]
	Silent,
	/// Also show a notice to the user.
	Notify,
}

impl TimeoutPolicy {
	fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"silent" => Some(Self::Silent),
			"notify" => Some(Self::Notify),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
	pub interval_ms: u32,
	pub timeout_ms: u32,
	pub on_timeout: TimeoutPolicy,
}

impl Default for PollPolicy {
	fn default() -> Self {
		Self {
			interval_ms: DEFAULT_POLL_INTERVAL_MS,
			timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
			on_timeout: TimeoutPolicy::default(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootConfig {
	pub course_id: String,
	pub initial_state: LifecycleState,
	pub user_roles: Vec<String>,
	pub api_base: String,
	pub poll: PollPolicy,
}

impl BootConfig {
	/// Builds the config from a key lookup; keys are the meta names without prefix.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let course_id = lookup("course-id")
			.map(|id| id.trim().to_string())
			.filter(|id| !id.is_empty())
			.ok_or(ConfigError::MissingCourseId)?;

		let initial_state = lookup("app-state")
			.map(|s| LifecycleState::from_wire(&s))
			.unwrap_or_default();

		let user_roles = lookup("user-roles")
			.map(|roles| {
				roles
					.split(',')
					.map(str::trim)
					.filter(|r| !r.is_empty())
					.map(String::from)
					.collect()
			})
			.unwrap_or_default();

		let api_base = lookup("api-base")
			.map(|b| b.trim().trim_end_matches('/').to_string())
			.filter(|b| !b.is_empty())
			.unwrap_or_else(|| DEFAULT_API_BASE.to_string());

		let on_timeout = match lookup("on-timeout") {
			Some(raw) => TimeoutPolicy::parse(&raw).unwrap_or_else(|| {
				warn!("Unknown timeout policy {raw:?}, using silent");
				TimeoutPolicy::Silent
			}),
			None => TimeoutPolicy::default(),
		};

		let poll = PollPolicy {
			interval_ms: millis(&lookup, "poll-interval-ms", DEFAULT_POLL_INTERVAL_MS),
			timeout_ms: millis(&lookup, "poll-timeout-ms", DEFAULT_POLL_TIMEOUT_MS),
			on_timeout,
		};

		Ok(Self {
			course_id,
			initial_state,
			user_roles,
			api_base,
			poll,
		})
	}

	/// Reads `<meta name="course-explorer:*">` tags from the current document.
	pub fn from_document() -> Result<Self, ConfigError> {
		let document = web_sys::window().and_then(|w| w.document());
		Self::from_lookup(|key| {
			let selector = format!("meta[name=\"{META_PREFIX}{key}\"]");
			document
				.as_ref()?
				.query_selector(&selector)
				.ok()
				.flatten()?
				.get_attribute("content")
		})
	}

	pub fn is_instructor(&self) -> bool {
		self.user_roles
			.iter()
			.any(|r| r.to_ascii_lowercase().contains("instructor"))
	}
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
	let Some(raw) = lookup(key) else {
		return default;
	};
	match raw.trim().parse::<u32>() {
		Ok(ms) if ms > 0 => ms,
		_ => {
			warn!("Ignoring invalid {key} value {raw:?}, using {default}");
			default
		}
	}
}
