use leptos::prelude::*;

use crate::graph::NodeDetails;

#[component]
pub fn NodeDetailsPanel(#[prop(into)] details: Signal<Option<NodeDetails>>) -> impl IntoView {
	view! {
		<aside id="node-details" class="node-details">
			{move || match details.get() {
				None => view! { <p class="muted">"Click a node to see its details."</p> }.into_any(),
				Some(d) => {
					let sources = (!d.sources.is_empty())
						.then(|| {
							view! {
								<div class="sources">
									"Sources: "
									{d.sources
										.into_iter()
										.map(|s| view! { <span class="source">{s}</span> })
										.collect_view()}
								</div>
							}
						});
					view! {
						<h3>{d.label}</h3>
						<p class="node-group">{d.group.to_string()}</p>
						{d.summary.map(|s| view! { <p class="summary">{s}</p> })}
						{sources}
						{d.link.map(|href| view! { <a href=href target="_blank" rel="noopener">"Open file"</a> })}
						<p class="node-id">"Node: " {d.id}</p>
					}
						.into_any()
				}
			}}
		</aside>
	}
}
