use leptos::prelude::*;

use crate::api::ModelStatus;

/// Counts reported by the backend after indexing a repository.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepoInfo {
	pub file_count: usize,
	pub chunk_count: usize,
}

#[component]
pub fn Navbar(
	#[prop(into)] repo_name: Signal<Option<String>>,
	#[prop(into)] repo_info: Signal<Option<RepoInfo>>,
	#[prop(into)] model_status: Signal<Option<ModelStatus>>,
	#[prop(into)] on_reset: Callback<()>,
	#[prop(into)] on_workflow: Callback<()>,
) -> impl IntoView {
	view! {
		<nav class="navbar">
			<h1 class="navbar-title">"CodeGenius"</h1>
			<span class="navbar-status">
				{move || match model_status.get() {
					Some(status) => format!("● {}", status.label()),
					None => "○ Backend offline".to_string(),
				}}
			</span>
			<Show when=move || repo_name.read().is_some()>
				<div class="navbar-repo">
					<span class="navbar-repo-name">{move || repo_name.get().unwrap_or_default()}</span>
					<span class="navbar-repo-info">
						{move || {
							repo_info
								.get()
								.map(|i| format!("{} files · {} chunks", i.file_count, i.chunk_count))
								.unwrap_or_default()
						}}
					</span>
					<button on:click=move |_| on_workflow.run(())>"Workflow"</button>
					<button on:click=move |_| on_reset.run(())>"New repository"</button>
				</div>
			</Show>
		</nav>
	}
}
