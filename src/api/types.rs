use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HealthResponse {
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub groq_available: bool,
	#[serde(default)]
	pub ollama_available: bool,
}

/// Which answer generator the backend currently has available.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelStatus {
	Groq,
	Ollama,
	/// No LLM reachable; answers are built from retrieved context only.
	Context,
}

impl HealthResponse {
	pub fn model_status(&self) -> ModelStatus {
		if self.groq_available {
			ModelStatus::Groq
		} else if self.ollama_available {
			ModelStatus::Ollama
		} else {
			ModelStatus::Context
		}
	}
}

impl ModelStatus {
	pub fn label(self) -> &'static str {
		match self {
			ModelStatus::Groq => "Groq",
			ModelStatus::Ollama => "Ollama",
			ModelStatus::Context => "Context",
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
	Uploading,
	Processing,
	Done,
	Error,
	#[default]
	#[serde(other)]
	Idle,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ProgressResponse {
	#[serde(default)]
	pub status: ProgressStatus,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub progress: u32,
}

impl ProgressResponse {
	pub fn is_finished(&self) -> bool {
		matches!(self.status, ProgressStatus::Done | ProgressStatus::Error)
	}

	/// Short user-facing text for the current processing stage.
	pub fn friendly_message(&self) -> String {
		match self.status {
			ProgressStatus::Done => "✓ Complete! Loading chat...".into(),
			ProgressStatus::Error => format!("Error: {}", self.message),
			_ => match self.progress {
				0..=55 => "Saving file to server...",
				56..=63 => "Extracting & scanning files...",
				64..=78 => "Analyzing your code...",
				79..=98 => "Building search index...",
				_ => "Almost done...",
			}
			.into(),
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UploadResponse {
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub file_count: usize,
	#[serde(default)]
	pub chunk_count: usize,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ChatRequest<'a> {
	pub query: &'a str,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Source {
	pub filename: String,
	#[serde(default)]
	pub filepath: String,
	#[serde(default)]
	pub relevance: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ChatResponse {
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub answer: String,
	#[serde(default)]
	pub model: String,
	#[serde(default)]
	pub model_name: String,
	#[serde(default)]
	pub sources: Vec<Source>,
	#[serde(default)]
	pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResetResponse {
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn progress(status: ProgressStatus, progress: u32) -> ProgressResponse {
		ProgressResponse {
			status,
			message: "disk full".into(),
			progress,
		}
	}

	#[test]
	fn model_status_prefers_groq() {
		let health: HealthResponse = serde_json::from_str(
			r#"{"status": "healthy", "groq_available": true, "ollama_available": true, "vector_store": {}}"#,
		)
		.unwrap();
		assert_eq!(health.model_status(), ModelStatus::Groq);

		let health = HealthResponse {
			ollama_available: true,
			..Default::default()
		};
		assert_eq!(health.model_status().label(), "Ollama");
		assert_eq!(HealthResponse::default().model_status(), ModelStatus::Context);
	}

	#[test]
	fn progress_messages_follow_stage() {
		let p = ProgressStatus::Processing;
		assert_eq!(progress(p, 52).friendly_message(), "Saving file to server...");
		assert_eq!(progress(p, 60).friendly_message(), "Extracting & scanning files...");
		assert_eq!(progress(p, 70).friendly_message(), "Analyzing your code...");
		assert_eq!(progress(p, 98).friendly_message(), "Building search index...");
		assert_eq!(progress(p, 99).friendly_message(), "Almost done...");
		assert_eq!(
			progress(ProgressStatus::Error, 0).friendly_message(),
			"Error: disk full"
		);
		assert!(progress(ProgressStatus::Done, 100).is_finished());
	}

	#[test]
	fn unknown_progress_status_is_idle() {
		let p: ProgressResponse =
			serde_json::from_str(r#"{"status": "warming", "message": "", "progress": 3}"#).unwrap();
		assert_eq!(p.status, ProgressStatus::Idle);
		assert!(!p.is_finished());

		let p: ProgressResponse =
			serde_json::from_str(r#"{"status": "done", "message": "ok", "progress": 100}"#).unwrap();
		assert_eq!(p.status, ProgressStatus::Done);
		let p: ProgressResponse = serde_json::from_str(r#"{"status": "idle"}"#).unwrap();
		assert_eq!(p.status, ProgressStatus::Idle);
	}

	#[test]
	fn chat_response_with_sources() {
		let r: ChatResponse = serde_json::from_str(
			r#"{
				"status": "success",
				"query": "what does it do",
				"answer": "It indexes code.",
				"model": "groq",
				"model_name": "llama-3.1-8b-instant",
				"sources": [{"filename": "app.py", "filepath": "repo/app.py", "relevance": 0.82}],
				"repository": "demo"
			}"#,
		)
		.unwrap();
		assert_eq!(r.sources.len(), 1);
		assert_eq!(r.sources[0].filename, "app.py");
		assert_eq!(r.error, None);
	}
}
