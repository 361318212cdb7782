use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use super::app_page::AppPage;
use super::init_page::InitPage;
use super::loading::LoadingPage;
use super::not_ready::NotReadyPage;
use crate::components::notice::Notice;
use crate::flows::run_setup;
use crate::lifecycle::{LifecycleState, PageRenderer, Section, Setup, section_display};
use crate::poll::BrowserTimer;
use crate::session::Session;

/// Shows the one section matching the course state and runs its setup once per entry.
#[component]
pub fn Home() -> impl IntoView {
	let session = expect_context::<Session>();
	let state = session.state;
	// same-state writes do not re-fire the effect below
	let current = Memo::new(move |_| state.get());
	let renderer = Rc::new(RefCell::new(PageRenderer::default()));

	Effect::new(move |_| {
		let state = current.get();
		let Some(setup) = renderer.borrow_mut().enter(state) else {
			return;
		};
		debug!("Entering {state}: {setup:?}");
		if matches!(setup, Setup::InitForm | Setup::Nothing) {
			return;
		}
		let session = session.clone();
		spawn_local(async move {
			run_setup(&session, &session.backend, &BrowserTimer, setup).await;
		});
	});

	let display = move |section: Section| move || section_display(section, current.get());
	let shown = move |wanted: LifecycleState| move || current.get() == wanted;

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<Notice />

			<div id=Section::Init.element_id() class="page-state" style:display=display(Section::Init)>
				<Show when=shown(LifecycleState::NeedsInit)>
					<InitPage />
				</Show>
			</div>
			<div id=Section::NotReady.element_id() class="page-state" style:display=display(Section::NotReady)>
				<NotReadyPage />
			</div>
			<div id=Section::Loading.element_id() class="page-state" style:display=display(Section::Loading)>
				<LoadingPage />
			</div>
			<div id=Section::App.element_id() class="page-state" style:display=display(Section::App)>
				<Show when=shown(LifecycleState::Active)>
					<AppPage />
				</Show>
			</div>
		</ErrorBoundary>
	}
}
