//! Leptos client-side course explorer: setup, readiness polling, topic graph and TA chat.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, error, info};

// Modules
mod api;
mod chat;
mod components;
mod config;
mod error;
mod flows;
mod graph;
mod init;
mod lifecycle;
mod pages;
mod poll;
mod session;
#[cfg(test)]
mod test_support;

// Top-Level pages
use crate::config::BootConfig;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::session::Session;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The app root: reads the boot config from the hosting page and routes to the explorer.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let content = match BootConfig::from_document() {
		Ok(config) => {
			info!(
				"Course {} starting in state {}",
				config.course_id, config.initial_state
			);
			provide_context(Session::new(config));
			view! {
				<Router>
					<Routes fallback=|| view! { <NotFound /> }>
						<Route path=path!("/") view=Home />
						<Route path=path!("/launch") view=Home />
						<Route path=path!("/test") view=Home />
					</Routes>
				</Router>
			}
			.into_any()
		}
		Err(e) => {
			error!("Cannot start: {e}");
			view! {
				<h1>"Course explorer unavailable"</h1>
				<p>{e.to_string()}</p>
			}
			.into_any()
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Course Explorer" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		{content}
	}
}
