use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::KeyboardEvent;

use crate::chat::{self, ChatLog, ChatMessage};
use crate::session::Session;

#[component]
fn ChatBubble(message: ChatMessage) -> impl IntoView {
	let sources = (!message.sources.is_empty()).then(|| {
		let list = message
			.sources
			.into_iter()
			.enumerate()
			.map(|(i, s)| {
				view! {
					{(i > 0).then_some(", ")}
					<span class="source">{s}</span>
				}
			})
			.collect_view();
		view! { <div class="sources">"Sources: " {list}</div> }
	});

	view! {
		<div class=message.sender.css_class()>
			<p>{message.text}</p>
			{sources}
		</div>
	}
}

/// Chat with the course TA bot; one question in flight at a time.
#[component]
pub fn ChatPanel() -> impl IntoView {
	let session = expect_context::<Session>();
	let log = session.chat;
	let (input, set_input) = signal(String::new());
	let list_ref = NodeRef::<leptos::html::Div>::new();
	let busy = move || log.with(ChatLog::is_busy);

	// keep the newest message in view
	Effect::new(move |_| {
		log.with(|l| l.messages().len());
		if let Some(list) = list_ref.get() {
			list.set_scroll_top(list.scroll_height());
		}
	});

	let submit = move || {
		let raw = input.get_untracked();
		if raw.trim().is_empty() || log.with_untracked(ChatLog::is_busy) {
			return;
		}
		set_input.set(String::new());
		let session = session.clone();
		spawn_local(async move {
			chat::send(&session.backend, session.course_id(), &raw, &session.chat).await;
		});
	};
	let submit_key = submit.clone();

	view! {
		<section class="chat-panel">
			<div id="chat-messages" class="chat-messages" node_ref=list_ref>
				<For
					each=move || log.with(|l| l.messages().to_vec())
					key=|m| m.seq
					children=|m| view! { <ChatBubble message=m /> }
				/>
			</div>
			<div class="chat-input-row">
				<input
					id="chat-input"
					type="text"
					placeholder="Ask a question about the course..."
					prop:value=move || input.get()
					on:input=move |ev| set_input.set(event_target_value(&ev))
					on:keydown=move |ev: KeyboardEvent| {
						if ev.key() == "Enter" {
							submit_key();
						}
					}
					disabled=busy
				/>
				<button id="chat-send" on:click=move |_| submit() disabled=busy>
					"Send"
				</button>
			</div>
		</section>
	}
}
