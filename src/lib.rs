//! Browser frontend for chatting with an uploaded repository and viewing its workflow chart.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod components;
mod pages;

use crate::api::ApiConfig;
use crate::pages::chat::ChatPage;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Root component: provides the backend config and routes to the chat page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = ApiConfig::from_window();
	info!("backend at {}", config.base_url);
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		<Title text="Repo Chat" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=ChatPage />
			</Routes>
		</Router>
	}
}
