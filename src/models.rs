use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
	Info,
	Warn,
	Error,
	/// Raw response content, emitted in verbose mode.
	Code,
}

impl Severity {
	pub fn label(&self) -> &'static str {
		match self {
			Severity::Info => "INFO",
			Severity::Warn => "WARN",
			Severity::Error => "ERROR",
			Severity::Code => "CODE",
		}
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	pub level: Severity,
	pub msg: String,
}

impl Message {
	pub fn info(msg: impl Into<String>) -> Self {
		Self { level: Severity::Info, msg: msg.into() }
	}
	pub fn warn(msg: impl Into<String>) -> Self {
		Self { level: Severity::Warn, msg: msg.into() }
	}
	pub fn error(msg: impl Into<String>) -> Self {
		Self { level: Severity::Error, msg: msg.into() }
	}
	pub fn code(msg: impl Into<String>) -> Self {
		Self { level: Severity::Code, msg: msg.into() }
	}
}

/// The three checks a run can be made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
	#[value(name = "mp")]
	MonitoringPoint,
	Gauging,
	ConvGroup,
}

impl CheckKind {
	pub const ALL: [CheckKind; 3] = [CheckKind::MonitoringPoint, CheckKind::Gauging, CheckKind::ConvGroup];

	pub fn title(&self) -> &'static str {
		match self {
			CheckKind::MonitoringPoint => "monitoring point",
			CheckKind::Gauging => "gauging",
			CheckKind::ConvGroup => "conversion group",
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
	pub check: CheckKind,
	pub passed: bool,
	pub errors: usize,
	pub warnings: usize,
	pub messages: Vec<Message>,
}

impl CheckReport {
	pub fn new(check: CheckKind, messages: Vec<Message>) -> Self {
		let errors = messages.iter().filter(|m| m.level == Severity::Error).count();
		let warnings = messages.iter().filter(|m| m.level == Severity::Warn).count();
		Self { check, passed: errors == 0, errors, warnings, messages }
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
	pub base_url: String,
	pub monitoring_point: String,
	pub started_at: String,
	pub checks: Vec<CheckReport>,
}

impl RunReport {
	pub fn new(base_url: &str, monitoring_point: &str) -> Self {
		Self {
			base_url: base_url.to_string(),
			monitoring_point: monitoring_point.to_string(),
			started_at: now_iso(),
			checks: Vec::new(),
		}
	}

	pub fn has_errors(&self) -> bool {
		self.checks.iter().any(|c| !c.passed)
	}

	pub fn total_errors(&self) -> usize {
		self.checks.iter().map(|c| c.errors).sum()
	}

	pub fn total_warnings(&self) -> usize {
		self.checks.iter().map(|c| c.warnings).sum()
	}
}

pub fn now_iso() -> String {
	OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_default()
}
