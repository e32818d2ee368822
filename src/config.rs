use clap::Parser;

use crate::errors::{AppError, AppResult};
use crate::models::CheckKind;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rgs_api_tester", version)]
#[command(about = "Run the RGS smoke tests against a WaterML2.0 part 2 REST API", long_about = None)]
pub struct Opts {
	/// Base URL of the API, e.g. http://waterml2.csiro.au/rgs-api/v1
	#[arg(value_name = "URL")]
	pub url: String,

	/// Monitoring point identifier to test with, e.g. 419009
	#[arg(value_name = "MP_ID")]
	pub mp_id: String,

	/// Basic auth credentials as user/pass (prompts for the password if only a user is given)
	#[arg(short, long)]
	pub auth: Option<String>,

	/// The API does NOT wrap responses in a result header (count/next/results)
	#[arg(short, long)]
	pub no_header: bool,

	/// Include the JSON responses in the output
	#[arg(short, long)]
	pub verbose: bool,

	/// Warn when responses lack an Access-Control-Allow-Origin header
	#[arg(long)]
	pub check_cors: bool,

	/// Checks to run, in order (repeatable); defaults to all three
	#[arg(short, long = "check", value_enum)]
	pub checks: Vec<CheckKind>,

	#[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Total request timeout in milliseconds [env: RGS_TIMEOUT_MS]
	#[arg(long)]
	pub timeout_ms: Option<u64>,

	/// Connect timeout in milliseconds [env: RGS_CONNECT_TIMEOUT_MS]
	#[arg(long)]
	pub connect_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
	pub timeout_ms: u64,
	pub connect_timeout_ms: u64,
	pub user_agent: String,
}

impl Default for TransportConfig {
	fn default() -> Self {
		Self {
			timeout_ms: 30_000,
			connect_timeout_ms: 10_000,
			user_agent: concat!("rgs-api-tester/", env!("CARGO_PKG_VERSION")).to_string(),
		}
	}
}

impl TransportConfig {
	pub fn from_env() -> Self {
		let defaults = Self::default();
		Self {
			timeout_ms: std::env::var("RGS_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(defaults.timeout_ms),
			connect_timeout_ms: std::env::var("RGS_CONNECT_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(defaults.connect_timeout_ms),
			user_agent: std::env::var("RGS_USER_AGENT").ok().filter(|v| !v.trim().is_empty()).unwrap_or(defaults.user_agent),
		}
	}
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	pub user: String,
	pub password: String,
}

impl std::fmt::Debug for Credentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Credentials").field("user", &self.user).field("password", &"***").finish()
	}
}

/// `user/pass` split at the first slash. A bare `user` yields no password.
pub fn parse_auth(raw: &str) -> AppResult<(String, Option<String>)> {
	let raw = raw.trim();
	let (user, password) = match raw.split_once('/') {
		Some((u, p)) => (u, Some(p.to_string())),
		None => (raw, None),
	};
	if user.is_empty() {
		return Err(AppError::Credentials("expected user/pass".into()));
	}
	Ok((user.to_string(), password))
}

impl Credentials {
	/// Parses `raw`, asking on the terminal for a missing password.
	pub fn resolve(raw: &str) -> AppResult<Self> {
		let (user, password) = parse_auth(raw)?;
		let password = match password {
			Some(p) => p,
			None => dialoguer::Password::new().with_prompt(format!("Password for {}", user)).allow_empty_password(true).interact()?,
		};
		Ok(Self { user, password })
	}
}

#[derive(Debug, Clone)]
pub struct TesterConfig {
	pub base_url: String,
	pub monitoring_point: String,
	pub no_header: bool,
	pub verbose: bool,
	pub check_cors: bool,
	pub checks: Vec<CheckKind>,
	pub format: OutputFormat,
	pub transport: TransportConfig,
	pub credentials: Option<Credentials>,
}

impl TesterConfig {
	pub fn new(base_url: impl Into<String>, monitoring_point: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			monitoring_point: monitoring_point.into(),
			no_header: false,
			verbose: false,
			check_cors: false,
			checks: CheckKind::ALL.to_vec(),
			format: OutputFormat::Text,
			transport: TransportConfig::default(),
			credentials: None,
		}
	}

	/// Merges command-line options over the environment (`RGS_*`).
	pub fn from_opts(opts: Opts) -> AppResult<Self> {
		crate::requester::build_url(&opts.url, &[])?;

		let mut transport = TransportConfig::from_env();
		if let Some(ms) = opts.timeout_ms {
			transport.timeout_ms = ms;
		}
		if let Some(ms) = opts.connect_timeout_ms {
			transport.connect_timeout_ms = ms;
		}

		let auth = opts.auth.or_else(|| std::env::var("RGS_AUTH").ok().filter(|v| !v.trim().is_empty()));
		let credentials = auth.as_deref().map(Credentials::resolve).transpose()?;

		let mut checks = Vec::new();
		for c in opts.checks {
			if !checks.contains(&c) {
				checks.push(c);
			}
		}
		if checks.is_empty() {
			checks = CheckKind::ALL.to_vec();
		}

		Ok(Self {
			base_url: opts.url,
			monitoring_point: opts.mp_id,
			no_header: opts.no_header,
			verbose: opts.verbose,
			check_cors: opts.check_cors,
			checks,
			format: opts.format,
			transport,
			credentials,
		})
	}
}
