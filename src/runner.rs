//! The three RGS checks and the sequence that runs them.
//!
//! Each check builds and returns its own message list. Nothing is carried
//! over between calls, so checks can run in any order or subset.

use serde_json::Value;

use crate::config::TesterConfig;
use crate::models::{CheckKind, CheckReport, Message, RunReport};
use crate::requester::{Fetch, RawResponse, Requester};
use crate::schema::ResourceType;
use crate::validator::Validator;

/// Resource paths appended to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
	pub monitoring_point: String,
	pub gauging: String,
	pub conversion_group: String,
}

impl Endpoints {
	pub fn for_base_url(base_url: &str) -> Self {
		let base = base_url.trim_end_matches('/');
		// USGS serves gaugings under the misspelt path
		let gauging = if base.contains("usgs") { "/guaging" } else { "/gauging" };
		Self {
			monitoring_point: format!("{}/monitoring-point", base),
			gauging: format!("{}{}", base, gauging),
			conversion_group: format!("{}/conversion-group", base),
		}
	}
}

pub struct ApiTester<F> {
	base_url: String,
	mp_id: String,
	check_cors: bool,
	endpoints: Endpoints,
	validator: Validator,
	requester: Requester<F>,
}

impl<F: Fetch> ApiTester<F> {
	pub fn new(config: &TesterConfig, fetch: F) -> Self {
		if config.base_url.contains("usgs") {
			tracing::info!("USGS URL, using the guaging endpoint spelling");
		}
		Self {
			base_url: config.base_url.clone(),
			mp_id: config.monitoring_point.clone(),
			check_cors: config.check_cors,
			endpoints: Endpoints::for_base_url(&config.base_url),
			validator: Validator::new(config.no_header, config.verbose),
			requester: Requester::new(fetch),
		}
	}

	pub fn endpoints(&self) -> &Endpoints {
		&self.endpoints
	}

	pub fn requester(&self) -> &Requester<F> {
		&self.requester
	}

	/// Runs `checks` one after another.
	pub async fn run_all(&self, checks: &[CheckKind]) -> RunReport {
		let mut report = RunReport::new(&self.base_url, &self.mp_id);
		for &check in checks {
			tracing::info!(check = check.title(), "running check");
			let messages = self.run(check).await;
			report.checks.push(CheckReport::new(check, messages));
		}
		report
	}

	pub async fn run(&self, check: CheckKind) -> Vec<Message> {
		match check {
			CheckKind::MonitoringPoint => self.test_monitoring_point().await,
			CheckKind::Gauging => self.test_gaugings().await,
			CheckKind::ConvGroup => self.test_conversion_group().await,
		}
	}

	// Two spellings of the MP parameter are sent; APIs tend to ignore unknown ones.
	fn mp_params(&self) -> [(&str, &str); 2] {
		[("monitoringPoint", self.mp_id.as_str()), ("monitoring-point", self.mp_id.as_str())]
	}

	pub async fn test_monitoring_point(&self) -> Vec<Message> {
		let mut messages = vec![Message::info(format!("Testing retrieval of monitoring point ({} at {})", self.mp_id, self.base_url))];
		let Some(resp) = self.fetch_resource(&self.endpoints.monitoring_point, &mut messages).await else {
			return messages;
		};
		if !resp.ok() {
			messages.push(Message::error(format!("Failed on MP retrieval: error returned from: {} ({})", resp.url, resp.reason())));
			return messages;
		}
		messages.push(Message::info("Received monitoring point encoding, checking structure..."));
		let Some(result) = parse_json(&resp, &mut messages) else {
			return messages;
		};

		let validation = self.validator.validate_object(ResourceType::MonitoringPoint, &result, false, &mut messages);
		if !validation.passed {
			return messages;
		}
		let groups = validation.object.as_ref().and_then(|mp| mp.get("conversiongroup_set"));
		messages.push(Message::info(format!(
			"Checking conversion group link ({})",
			groups.map(Value::to_string).unwrap_or_else(|| "none".into())
		)));
		match groups.and_then(Value::as_array).and_then(|g| g.first()) {
			Some(Value::String(link)) => {
				let probe = self.requester.check_url_exists(link).await;
				if probe.ok {
					messages.push(Message::info("Conversion group link OK"));
				} else {
					messages.push(Message::error(format!("Conversion group link from MP not resolvable ({})", probe.message)));
				}
			}
			Some(other) => messages.push(Message::error(format!("Conversion group link from MP is not a URL ({})", other))),
			None => messages.push(Message::error("No conversion group link from MP")),
		}
		messages
	}

	pub async fn test_gaugings(&self) -> Vec<Message> {
		let mut messages = vec![Message::info(format!("Testing gaugings end point at {} for MP:{}", self.endpoints.gauging, self.mp_id))];
		let Some(resp) = self.fetch_resource(&self.endpoints.gauging, &mut messages).await else {
			return messages;
		};
		if !resp.ok() {
			messages.push(Message::error(format!("Failed on gauging retrieval ({})", resp.reason())));
			return messages;
		}
		messages.push(Message::info("Received gaugings, checking structure..."));
		let Some(result) = parse_json(&resp, &mut messages) else {
			return messages;
		};
		self.validator.validate_object(ResourceType::Gauging, &result, false, &mut messages);
		messages
	}

	pub async fn test_conversion_group(&self) -> Vec<Message> {
		let mut messages = vec![Message::info(format!(
			"Testing conversion group end point at {} for MP:{}",
			self.endpoints.conversion_group, self.mp_id
		))];
		let Some(resp) = self.fetch_resource(&self.endpoints.conversion_group, &mut messages).await else {
			return messages;
		};
		if !resp.ok() {
			messages.push(Message::error(format!("Failed on conversion group retrieval ({})", resp.reason())));
			return messages;
		}
		messages.push(Message::info("Received conversion group, checking structure..."));
		let Some(result) = parse_json(&resp, &mut messages) else {
			return messages;
		};

		let group = self.validator.validate_object(ResourceType::ConversionGroup, &result, false, &mut messages);
		if !group.passed {
			return messages;
		}
		messages.push(Message::info("Checking nested conversion period object structure..."));
		let first_period = group.object.as_ref().and_then(|g| g.get("conversionPeriods")).and_then(Value::as_array).and_then(|p| p.first());
		let Some(period) = first_period else {
			messages.push(Message::warn("No conversion periods listed in group"));
			return messages;
		};

		// periods are embedded in the group, so there is no envelope to unwrap
		let period = self.validator.validate_object(ResourceType::ConversionPeriod, period, true, &mut messages);
		if !period.passed {
			return messages;
		}
		let conv_url = match period.object.as_ref().and_then(|p| p.get("applicableConversion")) {
			Some(Value::String(url)) => url.clone(),
			other => {
				messages.push(Message::error(format!(
					"Applicable conversion is not a URL ({})",
					other.map(Value::to_string).unwrap_or_default()
				)));
				return messages;
			}
		};
		messages.push(Message::info(format!("Valid period object. Checking conversion at {}", conv_url)));

		let Some(resp) = self.fetch_resource(&conv_url, &mut messages).await else {
			return messages;
		};
		if !resp.ok() {
			messages.push(Message::error(format!("Error retrieving applicable conversion ({})", resp.reason())));
			return messages;
		}
		messages.push(Message::info("Retrieved conversion."));
		let Some(result) = parse_json(&resp, &mut messages) else {
			return messages;
		};
		self.validator.validate_object(ResourceType::Conversion, &result, false, &mut messages);
		messages
	}

	/// Sends the MP-scoped request and records the response line. A transport
	/// failure is recorded as an error and yields `None`.
	async fn fetch_resource(&self, url: &str, messages: &mut Vec<Message>) -> Option<RawResponse> {
		let resp = match self.requester.send_request(url, &self.mp_params()).await {
			Ok(resp) => resp,
			Err(err) => {
				tracing::warn!(%url, error = %err, "request failed");
				messages.push(Message::error(format!("Request to {} failed: {}", url, err)));
				return None;
			}
		};
		messages.push(Message::info(format!(
			"Received {} response from {} ({})",
			resp.status.as_u16(),
			resp.url,
			resp.content_type_or_unknown()
		)));
		if resp.ok() {
			self.header_advisories(&resp, messages);
		}
		Some(resp)
	}

	fn header_advisories(&self, resp: &RawResponse, messages: &mut Vec<Message>) {
		let is_json = resp
			.content_type
			.as_deref()
			.and_then(|ct| ct.split(';').next())
			.is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"));
		if !is_json {
			messages.push(Message::warn(format!(
				"The response type has not been set to JSON (received {})",
				resp.content_type_or_unknown()
			)));
		}
		if self.check_cors && resp.allow_origin.is_none() {
			messages.push(Message::warn(
				"There is no Access-Control-Allow-Origin header set. This is needed for cross-service clients",
			));
		}
	}
}

fn parse_json(resp: &RawResponse, messages: &mut Vec<Message>) -> Option<Value> {
	match resp.json() {
		Ok(v) => Some(v),
		Err(err) => {
			tracing::debug!(url = %resp.url, error = %err, "response is not JSON");
			messages.push(Message::error(format!("No valid JSON response from {}", resp.url)));
			None
		}
	}
}
