//! Course lifecycle states and the page section each one shows.

use std::fmt;

use log::warn;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
	#[default]
	NeedsInit,
	NotReady,
	Generating,
	Active,
}

impl LifecycleState {
	/// Parses the state name injected by the hosting page.
	///
	/// Unknown names map to `NotReady`, which is what the backend reports for
	/// any course status it does not recognize.
	pub fn from_wire(name: &str) -> Self {
		match name.trim() {
			"NEEDS_INIT" => Self::NeedsInit,
			"NOT_READY" => Self::NotReady,
			"GENERATING" => Self::Generating,
			"ACTIVE" => Self::Active,
			other => {
				warn!("Unknown course state {other:?}, treating as NOT_READY");
				Self::NotReady
			}
		}
	}

	pub fn wire_name(self) -> &'static str {
		match self {
			Self::NeedsInit => "NEEDS_INIT",
			Self::NotReady => "NOT_READY",
			Self::Generating => "GENERATING",
			Self::Active => "ACTIVE",
		}
	}

	pub fn section(self) -> Section {
		match self {
			Self::NeedsInit => Section::Init,
			Self::NotReady => Section::NotReady,
			Self::Generating => Section::Loading,
			Self::Active => Section::App,
		}
	}
}

impl fmt::Display for LifecycleState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.wire_name())
	}
}

/// One of the page sections; exactly one is visible at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
	Init,
	NotReady,
	Loading,
	App,
}

impl Section {
	pub fn element_id(self) -> &'static str {
		match self {
			Self::Init => "init-page",
			Self::NotReady => "not-ready-page",
			Self::Loading => "loading-page",
			Self::App => "app-page",
		}
	}
}

/// CSS `display` value for `section` while the course is in `state`.
pub fn section_display(section: Section, state: LifecycleState) -> &'static str {
	if state.section() == section {
		"block"
	} else {
		"none"
	}
}

/// Setup routine run when a section is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Setup {
	InitForm,
	Nothing,
	StartPolling,
	LoadGraph,
}

impl Setup {
	pub fn for_state(state: LifecycleState) -> Self {
		match state {
			LifecycleState::NeedsInit => Self::InitForm,
			LifecycleState::NotReady => Self::Nothing,
			LifecycleState::Generating => Self::StartPolling,
			LifecycleState::Active => Self::LoadGraph,
		}
	}
}

/// Tracks the entered state so a section's setup runs once per entry.
#[derive(Clone, Debug, Default)]
pub struct PageRenderer {
	entered: Option<LifecycleState>,
}

impl PageRenderer {
	/// Returns the setup to run, or `None` when `state` is already the entered one.
	pub fn enter(&mut self, state: LifecycleState) -> Option<Setup> {
		if self.entered == Some(state) {
			return None;
		}
		self.entered = Some(state);
		Some(Setup::for_state(state))
	}
}
