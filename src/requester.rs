use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use reqwest::{StatusCode, Url};

use crate::config::{Credentials, TransportConfig};
use crate::errors::{AppError, AppResult};

/// What the checks need to know about an HTTP response. Non-2xx statuses are
/// returned as-is; callers inspect `status` themselves.
#[derive(Debug, Clone)]
pub struct RawResponse {
	pub status: StatusCode,
	/// Final URL, after redirects.
	pub url: Url,
	pub content_type: Option<String>,
	pub allow_origin: Option<String>,
	pub body: String,
}

impl RawResponse {
	pub fn ok(&self) -> bool {
		self.status.is_success()
	}

	/// `404 Not Found`, or just the code for statuses without a reason phrase.
	pub fn reason(&self) -> String {
		match self.status.canonical_reason() {
			Some(reason) => format!("{} {}", self.status.as_u16(), reason),
			None => self.status.as_u16().to_string(),
		}
	}

	pub fn content_type_or_unknown(&self) -> &str {
		self.content_type.as_deref().unwrap_or("no content-type")
	}

	pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
		serde_json::from_str(&self.body)
	}
}

/// A single GET. Checks await each request before issuing the next.
#[allow(async_fn_in_trait)]
pub trait Fetch {
	async fn get(&self, url: Url) -> AppResult<RawResponse>;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpFetch {
	client: reqwest::Client,
	credentials: Option<Credentials>,
}

impl HttpFetch {
	pub fn new(transport: &TransportConfig, credentials: Option<Credentials>) -> AppResult<Self> {
		let mut default_headers = HeaderMap::new();
		default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
		let client = reqwest::Client::builder()
			.user_agent(transport.user_agent.clone())
			.connect_timeout(Duration::from_millis(transport.connect_timeout_ms))
			.timeout(Duration::from_millis(transport.timeout_ms))
			.default_headers(default_headers)
			.build()?;
		Ok(Self { client, credentials })
	}
}

impl Fetch for HttpFetch {
	async fn get(&self, url: Url) -> AppResult<RawResponse> {
		tracing::debug!(%url, "GET");
		let mut req = self.client.get(url.clone());
		if let Some(creds) = &self.credentials {
			req = req.basic_auth(&creds.user, Some(&creds.password));
		}
		let resp = req.send().await.map_err(|source| AppError::Transport { url: url.to_string(), source })?;
		let status = resp.status();
		let final_url = resp.url().clone();
		let header = |name: reqwest::header::HeaderName| resp.headers().get(name).and_then(|v: &HeaderValue| v.to_str().ok()).map(str::to_string);
		let content_type = header(CONTENT_TYPE);
		let allow_origin = header(ACCESS_CONTROL_ALLOW_ORIGIN);
		let body = resp.text().await.map_err(|source| AppError::Transport { url: url.to_string(), source })?;
		tracing::debug!(status = status.as_u16(), url = %final_url, bytes = body.len(), "response");
		Ok(RawResponse { status, url: final_url, content_type, allow_origin, body })
	}
}

/// Result of probing a discovered link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
	pub ok: bool,
	pub message: String,
}

/// Thin wrapper over a [`Fetch`] that forces JSON responses.
pub struct Requester<F> {
	fetch: F,
}

impl<F: Fetch> Requester<F> {
	pub fn new(fetch: F) -> Self {
		Self { fetch }
	}

	pub fn fetch(&self) -> &F {
		&self.fetch
	}

	/// GET `url` with `params` plus `format=json`.
	pub async fn send_request(&self, url: &str, params: &[(&str, &str)]) -> AppResult<RawResponse> {
		let url = build_url(url, params)?;
		self.fetch.get(url).await
	}

	/// Whether `url` resolves to a JSON document. Never fails: every problem
	/// becomes a negative probe whose message names the URL.
	pub async fn check_url_exists(&self, url: &str) -> Probe {
		let resp = match self.send_request(url, &[]).await {
			Ok(resp) => resp,
			Err(err) => {
				tracing::warn!(%url, error = %err, "probe failed");
				return Probe { ok: false, message: format!("WARNING: URL not resolvable ({}): {}", url, err) };
			}
		};
		if !resp.ok() {
			return Probe { ok: false, message: format!("WARNING: URL not resolvable ({})", url) };
		}
		if resp.json().is_err() {
			return Probe { ok: false, message: format!("WARNING: Could not retrieve JSON content from URL ({})", url) };
		}
		Probe { ok: true, message: String::new() }
	}
}

/// Appends `params` and `format=json` to whatever query `url` already has.
pub fn build_url(url: &str, params: &[(&str, &str)]) -> AppResult<Url> {
	let mut parsed = Url::parse(url).map_err(|e| AppError::InvalidUrl { url: url.to_string(), reason: e.to_string() })?;
	{
		let mut qp = parsed.query_pairs_mut();
		for (k, v) in params {
			qp.append_pair(k, v);
		}
		qp.append_pair("format", "json");
	}
	Ok(parsed)
}
