use leptos::prelude::*;

#[component]
pub fn LoadingPage() -> impl IntoView {
	view! {
		<div class="spinner" aria-hidden="true"></div>
		<h1>"Building the course graph"</h1>
		<p>"This can take a minute. The page will update when it is ready."</p>
	}
}
