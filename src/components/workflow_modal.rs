use leptos::prelude::*;
use log::{error, info};

use super::workflow_chart::{NodeKind, WorkflowChart};
use crate::api::{ApiClient, ApiConfig};

/// Full-screen overlay that fetches and draws the workflow of `repo_name`.
#[component]
pub fn WorkflowModal(repo_name: String, open: RwSignal<bool>) -> impl IntoView {
	let config = use_context::<ApiConfig>().unwrap_or_else(ApiConfig::from_window);
	let client = ApiClient::new(&config);
	let repo = repo_name.clone();
	let workflow = LocalResource::new(move || {
		let (client, repo) = (client.clone(), repo.clone());
		async move {
			info!("fetching workflow for {repo}");
			client.workflow(&repo).await
		}
	});

	view! {
		<div class="workflow-modal" on:click=move |_| open.set(false)>
			<div class="workflow-modal-panel" on:click=|ev| ev.stop_propagation()>
				<header class="workflow-modal-header">
					<div>
						<h2>"Workflow Flowchart"</h2>
						<p class="workflow-modal-repo">{repo_name}</p>
					</div>
					<button class="workflow-modal-close" on:click=move |_| open.set(false)>
						"✕"
					</button>
				</header>
				<div class="workflow-modal-body">
					{move || match workflow.get() {
						None => {
							view! { <div class="workflow-modal-loading">"Generating workflow..."</div> }
								.into_any()
						}
						Some(Err(err)) => {
							error!("workflow fetch failed: {err}");
							view! { <div class="workflow-modal-error">{err.to_string()}</div> }
								.into_any()
						}
						Some(Ok(graph)) => {
							view! { <WorkflowChart data=Signal::derive(move || graph.clone()) /> }
								.into_any()
						}
					}}
				</div>
				<footer class="workflow-modal-legend">
					{NodeKind::ALL
						.iter()
						.map(|kind| {
							let palette = kind.palette();
							view! {
								<span class="workflow-legend-item">
									<span
										class="workflow-legend-swatch"
										style=format!(
											"background: {}; border: 1.5px solid {};",
											palette.fill,
											palette.color,
										)
									/>
									{kind.as_str()}
								</span>
							}
						})
						.collect_view()}
				</footer>
			</div>
		</div>
	}
}
