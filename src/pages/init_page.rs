use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::flows::run_init;
use crate::session::Session;

/// Setup form: the instructor lists the course topics, one per line.
#[component]
pub fn InitPage() -> impl IntoView {
	let session = expect_context::<Session>();
	let instructor = session.config.is_instructor();
	let (topics, set_topics) = signal(String::new());
	let (submitting, set_submitting) = signal(false);

	let on_submit = move |_| {
		if submitting.get_untracked() {
			return;
		}
		set_submitting.set(true);
		let (session, text) = (session.clone(), topics.get_untracked());
		spawn_local(async move {
			// errors are logged and surfaced as the notice
			let _ = run_init(&session, &session.backend, &text).await;
			set_submitting.set(false);
		});
	};

	view! {
		<h1>"Set up the course explorer"</h1>
		{(!instructor)
			.then(|| view! { <p class="muted">"Only the course instructor should run the setup."</p> })}
		<label for="topics-input">"Course topics (one per line)"</label>
		<textarea
			id="topics-input"
			rows="8"
			prop:value=move || topics.get()
			on:input=move |ev| set_topics.set(event_target_value(&ev))
		></textarea>
		<button id="init-btn" on:click=on_submit disabled=move || submitting.get()>
			{move || if submitting.get() { "Building..." } else { "Build course graph" }}
		</button>
	}
}
