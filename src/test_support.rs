use std::cell::RefCell;
use std::collections::HashMap;

use reqwest::{StatusCode, Url};

use crate::errors::{AppError, AppResult};
use crate::requester::{Fetch, RawResponse};

/// In-memory transport keyed by URL path. Unrouted paths fail like a
/// refused connection. Every requested URL is recorded in order.
#[derive(Default)]
pub struct StubFetch {
	routes: RefCell<HashMap<String, (u16, Option<String>, Option<String>, String)>>,
	requested: RefCell<Vec<String>>,
}

impl StubFetch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn route(&self, path: &str, status: u16, content_type: &str, body: &str) {
		self.routes.borrow_mut().insert(path.to_string(), (status, Some(content_type.to_string()), None, body.to_string()));
	}

	pub fn route_with_cors(&self, path: &str, body: &str) {
		self.routes
			.borrow_mut()
			.insert(path.to_string(), (200, Some("application/json".into()), Some("*".into()), body.to_string()));
	}

	pub fn requested(&self) -> Vec<String> {
		self.requested.borrow().clone()
	}

	pub fn requested_paths(&self) -> Vec<String> {
		self.requested
			.borrow()
			.iter()
			.filter_map(|u| Url::parse(u).ok())
			.map(|u| u.path().to_string())
			.collect()
	}

	pub fn response(&self, url: &str, status: u16, content_type: &str, body: &str) -> RawResponse {
		RawResponse {
			status: StatusCode::from_u16(status).unwrap(),
			url: Url::parse(url).unwrap(),
			content_type: Some(content_type.to_string()),
			allow_origin: None,
			body: body.to_string(),
		}
	}
}

impl Fetch for StubFetch {
	async fn get(&self, url: Url) -> AppResult<RawResponse> {
		self.requested.borrow_mut().push(url.to_string());
		let routes = self.routes.borrow();
		let Some((status, content_type, allow_origin, body)) = routes.get(url.path()) else {
			return Err(AppError::Anyhow(anyhow::anyhow!("connection refused")));
		};
		Ok(RawResponse {
			status: StatusCode::from_u16(*status).unwrap(),
			url,
			content_type: content_type.clone(),
			allow_origin: allow_origin.clone(),
			body: body.clone(),
		})
	}
}
