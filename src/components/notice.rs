use leptos::prelude::*;

use crate::session::Session;

/// Blocking notice; covers the page until dismissed.
#[component]
pub fn Notice() -> impl IntoView {
	let notice = expect_context::<Session>().notice;

	view! {
		<Show when=move || notice.with(Option::is_some)>
			<div class="notice-backdrop" role="alertdialog" aria-modal="true">
				<div class="notice">
					<p>{move || notice.get().unwrap_or_default()}</p>
					<button on:click=move |_| notice.set(None)>"OK"</button>
				</div>
			</div>
		</Show>
	}
}
