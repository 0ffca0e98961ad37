use serde::Deserialize;
use thiserror::Error;

/// Failures talking to the backend. `Display` is the text shown to the user.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ApiError {
	#[error("Cannot connect to backend. Make sure it is running. ({0})")]
	Network(String),

	#[error("File is too large. Please use a ZIP file smaller than 100 MB.")]
	TooLarge,

	#[error("{message}")]
	Status { status: u16, message: String },

	#[error("Unexpected response from backend: {0}")]
	Decode(String),

	/// The backend answered 200 but reported a failure in the body.
	#[error("{0}")]
	Rejected(String),
}

#[derive(Deserialize)]
struct ErrorBody {
	error: Option<String>,
}

impl ApiError {
	pub fn from_status(status: u16, body: &str) -> Self {
		if status == 413 {
			return ApiError::TooLarge;
		}
		let message = serde_json::from_str::<ErrorBody>(body)
			.ok()
			.and_then(|b| b.error)
			.unwrap_or_else(|| format!("Request failed with status {status}"));
		ApiError::Status { status, message }
	}
}

impl From<reqwest::Error> for ApiError {
	fn from(err: reqwest::Error) -> Self {
		ApiError::Network(err.to_string())
	}
}

impl From<serde_json::Error> for ApiError {
	fn from(err: serde_json::Error) -> Self {
		ApiError::Decode(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_uses_backend_error_message() {
		let err = ApiError::from_status(404, r#"{"error": "No chunks found for \"demo\"."}"#);
		assert_eq!(err.to_string(), "No chunks found for \"demo\".");
	}

	#[test]
	fn status_without_body_is_generic() {
		let err = ApiError::from_status(500, "<html>oops</html>");
		assert_eq!(
			err,
			ApiError::Status {
				status: 500,
				message: "Request failed with status 500".into()
			}
		);
	}

	#[test]
	fn payload_too_large_has_fixed_text() {
		let err = ApiError::from_status(413, r#"{"error": "File too large (120.0 MB)"}"#);
		assert_eq!(err, ApiError::TooLarge);
	}
}
