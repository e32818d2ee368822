use std::fmt::Write as _;

use crate::errors::AppResult;
use crate::models::{RunReport, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
	/// One line per message
	#[default]
	Text,
	/// The whole run as a JSON document
	Json,
}

pub fn render(report: &RunReport, format: OutputFormat) -> AppResult<String> {
	match format {
		OutputFormat::Text => Ok(render_text(report)),
		OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
	}
}

pub fn render_text(report: &RunReport) -> String {
	let mut out = String::new();
	for check in &report.checks {
		let _ = writeln!(out, "Running {} test...", check.check.title());
		for m in &check.messages {
			match m.level {
				// raw dumps are multi-line, keep them unprefixed
				Severity::Code => {
					let _ = writeln!(out, "{}", m.msg);
				}
				level => {
					let _ = writeln!(out, "[{}] {}", level, m.msg);
				}
			}
		}
	}
	let passed = report.checks.iter().filter(|c| c.passed).count();
	let _ = writeln!(
		out,
		"{}/{} checks passed ({} error(s), {} warning(s))",
		passed,
		report.checks.len(),
		report.total_errors(),
		report.total_warnings()
	);
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::{CheckKind, CheckReport, Message};

	fn sample() -> RunReport {
		let mut run = RunReport::new("http://x/api", "419009");
		run.checks.push(CheckReport::new(
			CheckKind::MonitoringPoint,
			vec![Message::info("Successfully passed MP test!"), Message::code("{\n  \"id\": 1\n}")],
		));
		run.checks.push(CheckReport::new(CheckKind::Gauging, vec![Message::error("Failed on gauging retrieval (500 Internal Server Error)")]));
		run
	}

	#[test]
	fn text_lists_messages_per_check() {
		let text = render_text(&sample());
		let lines: Vec<&str> = text.lines().collect();
		assert_eq!(lines[0], "Running monitoring point test...");
		assert_eq!(lines[1], "[INFO] Successfully passed MP test!");
		assert_eq!(lines[2], "{");
		assert_eq!(lines[5], "Running gauging test...");
		assert_eq!(lines[6], "[ERROR] Failed on gauging retrieval (500 Internal Server Error)");
		assert_eq!(lines[7], "1/2 checks passed (1 error(s), 0 warning(s))");
	}

	#[test]
	fn json_output_is_the_report() {
		let out = render(&sample(), OutputFormat::Json).unwrap();
		let v: serde_json::Value = serde_json::from_str(&out).unwrap();
		assert_eq!(v["monitoring_point"], "419009");
		assert_eq!(v["checks"][1]["check"], "gauging");
		assert_eq!(v["checks"][1]["passed"], false);
		assert_eq!(v["checks"][0]["messages"][0]["level"], "INFO");
	}
}
