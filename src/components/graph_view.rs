use std::collections::HashSet;

use leptos::prelude::*;
use log::error;

use super::force_graph::{ForceGraphCanvas, RenderSet};
use super::node_details::NodeDetailsPanel;
use crate::graph::NodeGroup;
use crate::session::Session;

const VIEW_ERROR_NOTICE: &str = "Error initializing graph visualization. Check console for details.";

/// Graph container, file toggle and the details panel for the clicked node.
#[component]
pub fn GraphView() -> impl IntoView {
	let session = expect_context::<Session>();
	let store = session.graph;
	let hidden = RwSignal::new(HashSet::<NodeGroup>::new());
	let selected = RwSignal::new(None::<String>);

	let render_set = Signal::derive(move || {
		hidden.with(|hidden| {
			store.with(|s| {
				s.current()
					.map(|payload| RenderSet::build(payload, hidden))
					.unwrap_or_default()
			})
		})
	});
	let details = Signal::derive(move || {
		let id = selected.get()?;
		store.with(|s| s.current()?.details(&id))
	});

	let loaded = move || store.with(|s| s.current().is_some());
	let has_nodes = move || render_set.with(|set| !set.is_empty());
	let files_hidden = move || hidden.with(|h| h.contains(&NodeGroup::FilePdf));
	let toggle_files = move |_| {
		hidden.update(|h| {
			if !h.remove(&NodeGroup::FilePdf) {
				h.insert(NodeGroup::FilePdf);
			}
		})
	};

	let on_select = Callback::new(move |id: String| selected.set(Some(id)));
	let on_error = Callback::new(move |reason: String| {
		error!("Error initializing graph view: {reason}");
		session.notify(VIEW_ERROR_NOTICE);
	});

	view! {
		<section class="graph-panel">
			<div class="graph-toolbar">
				<button id="toggle-files" on:click=toggle_files>
					{move || if files_hidden() { "Show files" } else { "Hide files" }}
				</button>
			</div>
			<div id="graph-network" class="graph-network">
				<Show
					when=loaded
					fallback=|| view! { <p class="graph-placeholder">"Graph data is not available yet."</p> }
				>
					<Show
						when=has_nodes
						fallback=|| view! { <p class="graph-placeholder">"No nodes to display"</p> }
					>
						<ForceGraphCanvas data=render_set on_select=on_select on_error=on_error />
					</Show>
				</Show>
			</div>
			<NodeDetailsPanel details=details />
		</section>
	}
}
