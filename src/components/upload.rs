use leptos::callback::UnsyncCallback;
use leptos::ev::{DragEvent, Event};
use leptos::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

#[derive(Clone, Debug, PartialEq)]
pub enum UploadStatus {
	InProgress { message: String, progress: u32 },
	Success(String),
	Failed(String),
}

/// Repository name for an uploaded archive: the file name minus `.zip`.
/// Returns `None` for anything that is not a ZIP.
pub fn repo_name_for(file_name: &str) -> Option<String> {
	let split = file_name.len().checked_sub(4)?;
	let (stem, ext) = (file_name.get(..split)?, file_name.get(split..)?);
	(ext.eq_ignore_ascii_case(".zip") && !stem.is_empty()).then(|| stem.to_string())
}

pub async fn read_file(file: &File) -> Result<Vec<u8>, String> {
	let buffer = JsFuture::from(file.array_buffer())
		.await
		.map_err(|e| format!("could not read {}: {:?}", file.name(), e))?;
	Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[component]
pub fn FileUpload(
	on_select: UnsyncCallback<File>,
	#[prop(into)] is_loading: Signal<bool>,
	#[prop(into)] status: Signal<Option<UploadStatus>>,
) -> impl IntoView {
	let drag_active = RwSignal::new(false);

	let on_change = move |ev: Event| {
		let input = event_target::<HtmlInputElement>(&ev);
		if let Some(file) = input.files().and_then(|files| files.get(0)) {
			on_select.run(file);
		}
		input.set_value("");
	};

	let on_drop = move |ev: DragEvent| {
		ev.prevent_default();
		drag_active.set(false);
		if let Some(file) = ev
			.data_transfer()
			.and_then(|dt| dt.files())
			.and_then(|files| files.get(0))
		{
			on_select.run(file);
		}
	};

	view! {
		<div
			class="file-upload"
			class:drag-active=move || drag_active.get()
			on:dragenter=move |ev: DragEvent| {
				ev.prevent_default();
				drag_active.set(true);
			}
			on:dragover=move |ev: DragEvent| ev.prevent_default()
			on:dragleave=move |_| drag_active.set(false)
			on:drop=on_drop
		>
			{move || match status.get() {
				Some(UploadStatus::InProgress { message, progress }) => {
					view! {
						<div class="file-upload-progress">
							<p>{message}</p>
							<progress max="100" value=progress.to_string() />
							<span>{format!("{progress}%")}</span>
						</div>
					}
						.into_any()
				}
				Some(UploadStatus::Success(message)) => {
					view! { <p class="file-upload-success">{message}</p> }.into_any()
				}
				other => {
					let error = match other {
						Some(UploadStatus::Failed(message)) => Some(message),
						_ => None,
					};
					view! {
						<label class="file-upload-drop">
							<p>"Drop your repository ZIP here or click to browse"</p>
							<input
								type="file"
								accept=".zip"
								style="display: none;"
								prop:disabled=move || is_loading.get()
								on:change=on_change
							/>
						</label>
						{error.map(|e| view! { <p class="file-upload-error">{e}</p> })}
					}
						.into_any()
				}
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zip_extension_is_stripped() {
		assert_eq!(repo_name_for("my-project.zip").as_deref(), Some("my-project"));
		assert_eq!(repo_name_for("Archive.ZIP").as_deref(), Some("Archive"));
		assert_eq!(repo_name_for("code.v2.zip").as_deref(), Some("code.v2"));
	}

	#[test]
	fn non_zip_files_are_rejected() {
		assert_eq!(repo_name_for("notes.tar.gz"), None);
		assert_eq!(repo_name_for(".zip"), None);
		assert_eq!(repo_name_for("zip"), None);
		assert_eq!(repo_name_for("ünï.zip").as_deref(), Some("ünï"));
	}
}
