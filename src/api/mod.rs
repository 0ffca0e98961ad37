//! Client for the repository indexing and chat backend.

mod error;
mod types;

use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

pub use error::ApiError;
pub use types::{
	ChatRequest, ChatResponse, HealthResponse, ModelStatus, ProgressResponse, ProgressStatus,
	ResetResponse, Source, UploadResponse,
};

use crate::components::workflow_chart::WorkflowGraph;

/// Used when the page origin cannot be read (outside a browser).
pub const FALLBACK_API_BASE: &str = "http://localhost:5000/api";
pub const API_PATH: &str = "/api";

/// Where the backend lives. Provided to components through Leptos context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	pub base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: FALLBACK_API_BASE.to_string(),
		}
	}
}

impl ApiConfig {
	/// `<page origin>/api`, so requests go through the dev-server proxy.
	pub fn from_window() -> Self {
		web_sys::window()
			.and_then(|w| w.location().origin().ok())
			.map(|origin| Self {
				base_url: format!("{}{}", origin.trim_end_matches('/'), API_PATH),
			})
			.unwrap_or_default()
	}
}

#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
}

impl ApiClient {
	pub fn new(config: &ApiConfig) -> Self {
		Self {
			base_url: config.base_url.trim_end_matches('/').to_string(),
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
		let status = response.status();
		if !status.is_success() {
			warn!("{} responded {}", response.url(), status);
		}
		let body = response.text().await?;
		if !status.is_success() {
			return Err(ApiError::from_status(status.as_u16(), &body));
		}
		Ok(serde_json::from_str(&body)?)
	}

	pub async fn health(&self) -> Result<HealthResponse, ApiError> {
		let response = reqwest::Client::new().get(self.url("/health")).send().await?;
		Self::decode(response).await
	}

	pub async fn progress(&self) -> Result<ProgressResponse, ApiError> {
		let response = reqwest::Client::new().get(self.url("/progress")).send().await?;
		Self::decode(response).await
	}

	pub async fn upload(
		&self,
		file_name: &str,
		repo_name: &str,
		bytes: Vec<u8>,
	) -> Result<UploadResponse, ApiError> {
		debug!("uploading {} ({} bytes) as {}", file_name, bytes.len(), repo_name);
		let part = Part::bytes(bytes)
			.file_name(file_name.to_string())
			.mime_str("application/zip")?;
		let form = Form::new()
			.part("file", part)
			.text("repo_name", repo_name.to_string());
		let response = reqwest::Client::new()
			.post(self.url("/upload"))
			.multipart(form)
			.send()
			.await?;
		let upload: UploadResponse = Self::decode(response).await?;
		if upload.status != "success" {
			return Err(ApiError::Rejected(upload.error.unwrap_or_else(|| {
				"Processing failed. Check the backend terminal for details.".into()
			})));
		}
		Ok(upload)
	}

	pub async fn chat(&self, query: &str) -> Result<ChatResponse, ApiError> {
		let response = reqwest::Client::new()
			.post(self.url("/chat"))
			.json(&ChatRequest { query })
			.send()
			.await?;
		let chat: ChatResponse = Self::decode(response).await?;
		if chat.status != "success" {
			return Err(ApiError::Rejected(
				chat.error
					.unwrap_or_else(|| "Sorry, an error occurred".into()),
			));
		}
		Ok(chat)
	}

	pub async fn reset(&self) -> Result<ResetResponse, ApiError> {
		let response = reqwest::Client::new().post(self.url("/reset")).send().await?;
		Self::decode(response).await
	}

	/// Fetch the workflow graph generated for `repo`.
	pub async fn workflow(&self, repo: &str) -> Result<WorkflowGraph, ApiError> {
		let response = reqwest::Client::new()
			.get(self.url("/workflow"))
			.query(&[("repo", repo)])
			.send()
			.await?;
		Self::decode(response).await
	}
}
