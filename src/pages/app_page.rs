use leptos::prelude::*;

use crate::components::chat_panel::ChatPanel;
use crate::components::graph_view::GraphView;
use crate::session::Session;

#[component]
pub fn AppPage() -> impl IntoView {
	let course_id = expect_context::<Session>().config.course_id.clone();

	view! {
		<header class="app-header">
			<h1>"Course Explorer"</h1>
			<span class="course-id">{course_id}</span>
		</header>
		<main class="app-layout">
			<GraphView />
			<ChatPanel />
		</main>
	}
}
