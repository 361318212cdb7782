use leptos::prelude::*;

#[component]
pub fn NotReadyPage() -> impl IntoView {
	view! {
		<h1>"Course explorer is not ready yet"</h1>
		<p>"Your instructor has not set up this course. Please check back later."</p>
	}
}
