use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
	#[error("invalid URL {url}: {reason}")]
	InvalidUrl { url: String, reason: String },
	#[error("invalid credentials: {0}")]
	Credentials(String),
	#[error("request to {url} failed: {source}")]
	Transport {
		url: String,
		#[source]
		source: reqwest::Error,
	},
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	Prompt(#[from] dialoguer::Error),
	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl AppError {
	/// Process exit code reported by the CLI when this error aborts a run.
	pub fn exit_code(&self) -> u8 {
		match self {
			AppError::InvalidUrl { .. } => 2,
			AppError::Credentials(_) => 2,
			AppError::Prompt(_) => 2,
			AppError::Transport { .. } => 1,
			AppError::Http(_) => 1,
			AppError::Json(_) => 1,
			AppError::Anyhow(_) => 1,
		}
	}
}

pub type AppResult<T> = Result<T, AppError>;
