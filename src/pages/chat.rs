use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use leptos::callback::UnsyncCallback;
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info, warn};
use web_sys::File;

use crate::api::{ApiClient, ApiConfig, ApiError, ModelStatus, ProgressStatus};
use crate::components::chat::{ChatInput, ChatMessage, ChatMessageView, TypingIndicator};
use crate::components::navbar::{Navbar, RepoInfo};
use crate::components::upload::{FileUpload, UploadStatus, read_file, repo_name_for};
use crate::components::workflow_modal::WorkflowModal;

const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(10);
const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(800);
/// Pause on the success message before switching to the chat.
const CHAT_SWITCH_DELAY: Duration = Duration::from_millis(1200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
	Upload,
	Chat,
}

/// Poll `/progress` while an upload is in flight. Transient failures and
/// idle responses are ignored; a late response never overrides a final status.
fn poll_progress(client: ApiClient, status: RwSignal<Option<UploadStatus>>) -> Option<IntervalHandle> {
	let finished = Rc::new(Cell::new(false));
	let poll = move || {
		if finished.get() {
			return;
		}
		let (client, finished) = (client.clone(), finished.clone());
		spawn_local(async move {
			let Ok(progress) = client.progress().await else {
				return;
			};
			if progress.status == ProgressStatus::Idle {
				return;
			}
			debug!("backend progress: {}% {}", progress.progress, progress.message);
			if progress.progress > 50 {
				status.update(|current| {
					if matches!(current, Some(UploadStatus::InProgress { .. })) {
						*current = Some(UploadStatus::InProgress {
							message: progress.friendly_message(),
							progress: progress.progress,
						});
					}
				});
			}
			if progress.is_finished() {
				finished.set(true);
			}
		});
	};
	set_interval_with_handle(poll, PROGRESS_POLL_INTERVAL)
		.map_err(|err| warn!("could not start progress polling: {err:?}"))
		.ok()
}

#[component]
pub fn ChatPage() -> impl IntoView {
	let config = use_context::<ApiConfig>().unwrap_or_else(ApiConfig::from_window);
	let client = ApiClient::new(&config);

	let step = RwSignal::new(Step::Upload);
	let messages = RwSignal::new(Vec::<ChatMessage>::new());
	let query = RwSignal::new(String::new());
	let is_loading = RwSignal::new(false);
	let repo_name = RwSignal::new(None::<String>);
	let repo_info = RwSignal::new(None::<RepoInfo>);
	let upload_status = RwSignal::new(None::<UploadStatus>);
	let model_status = RwSignal::new(None::<ModelStatus>);
	let show_workflow = RwSignal::new(false);
	let chat_end = NodeRef::<Div>::new();

	let check_health = {
		let client = client.clone();
		move || {
			let client = client.clone();
			spawn_local(async move {
				let status = match client.health().await {
					Ok(health) => Some(health.model_status()),
					Err(err) => {
						warn!("health check failed: {err}");
						None
					}
				};
				model_status.set(status);
			});
		}
	};
	check_health();
	match set_interval_with_handle(check_health, HEALTH_POLL_INTERVAL) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(err) => error!("could not start health polling: {err:?}"),
	}

	Effect::new(move |_| {
		messages.track();
		if let Some(end) = chat_end.get() {
			end.scroll_into_view();
		}
	});

	let on_file = {
		let client = client.clone();
		UnsyncCallback::new(move |file: File| {
			let name = file.name();
			info!("file selected: {} ({:.1} MB)", name, file.size() / 1024.0 / 1024.0);
			let Some(repo) = repo_name_for(&name) else {
				warn!("rejected {name}: not a ZIP file");
				upload_status.set(Some(UploadStatus::Failed("Please select a ZIP file".into())));
				return;
			};

			is_loading.set(true);
			upload_status.set(Some(UploadStatus::InProgress {
				message: "Uploading file to server...".into(),
				progress: 0,
			}));
			let client = client.clone();
			spawn_local(async move {
				let poller = poll_progress(client.clone(), upload_status);
				let result = match read_file(&file).await {
					Ok(bytes) => client.upload(&name, &repo, bytes).await,
					Err(err) => Err(ApiError::Rejected(err)),
				};
				if let Some(handle) = poller {
					handle.clear();
				}
				is_loading.set(false);

				match result {
					Ok(upload) => {
						info!(
							"indexed {}: {} files, {} chunks",
							repo, upload.file_count, upload.chunk_count
						);
						upload_status.set(Some(UploadStatus::Success(format!(
							"✓ Processed {} files into {} chunks",
							upload.file_count, upload.chunk_count
						))));
						repo_name.set(Some(repo.clone()));
						repo_info.set(Some(RepoInfo {
							file_count: upload.file_count,
							chunk_count: upload.chunk_count,
						}));
						set_timeout(
							move || {
								step.set(Step::Chat);
								messages.set(vec![ChatMessage::greeting(&repo)]);
							},
							CHAT_SWITCH_DELAY,
						);
					}
					Err(err) => {
						error!("upload failed: {err}");
						upload_status.set(Some(UploadStatus::Failed(err.to_string())));
					}
				}
			});
		})
	};

	let on_send = {
		let client = client.clone();
		Callback::new(move |()| {
			let text = query.get_untracked();
			if text.trim().is_empty() || is_loading.get_untracked() {
				return;
			}
			query.set(String::new());
			messages.update(|m| m.push(ChatMessage::user(text.clone())));
			is_loading.set(true);

			let client = client.clone();
			spawn_local(async move {
				let reply = match client.chat(&text).await {
					Ok(response) => ChatMessage::from(response),
					Err(err) => {
						error!("chat failed: {err}");
						ChatMessage::error(err.to_string())
					}
				};
				messages.update(|m| m.push(reply));
				is_loading.set(false);
			});
		})
	};

	let on_reset = Callback::new(move |()| {
		let client = client.clone();
		spawn_local(async move {
			match client.reset().await {
				Ok(_) => {
					info!("backend state cleared");
					show_workflow.set(false);
					step.set(Step::Upload);
					messages.set(Vec::new());
					repo_name.set(None);
					repo_info.set(None);
					upload_status.set(None);
				}
				Err(err) => error!("reset failed: {err}"),
			}
		});
	});

	let on_workflow = Callback::new(move |()| show_workflow.set(true));

	view! {
		<div class="chat-page">
			<Navbar
				repo_name=repo_name
				repo_info=repo_info
				model_status=model_status
				on_reset=on_reset
				on_workflow=on_workflow
			/>

			{move || {
				let repo = repo_name.get()?;
				show_workflow.get().then(|| view! { <WorkflowModal repo_name=repo open=show_workflow /> })
			}}

			<main class="chat-main">
				{move || match step.get() {
					Step::Upload => {
						view! {
							<section class="upload-step">
								<h2>"Understand your codebase instantly"</h2>
								<p>"Upload any repository and ask questions about it."</p>
								<FileUpload on_select=on_file is_loading=is_loading status=upload_status />
							</section>
						}
							.into_any()
					}
					Step::Chat => {
						view! {
							<section class="chat-step">
								<div class="chat-messages">
									{move || {
										messages
											.get()
											.into_iter()
											.map(|message| view! { <ChatMessageView message=message /> })
											.collect_view()
									}}
									<Show when=move || is_loading.get()>
										<TypingIndicator />
									</Show>
									<div node_ref=chat_end />
								</div>
								<ChatInput
									query=query
									is_loading=is_loading
									model_status=model_status
									on_send=on_send
								/>
							</section>
						}
							.into_any()
					}
				}}
			</main>
		</div>
	}
}
