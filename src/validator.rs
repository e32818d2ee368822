use serde_json::Value;

use crate::models::Message;
use crate::schema::ResourceType;

/// Outcome of a structural check. `object` is the entity that was inspected,
/// or `None` when no payload could be located in the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
	pub passed: bool,
	pub object: Option<Value>,
}

impl Validation {
	fn failed() -> Self {
		Self { passed: false, object: None }
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
	/// Responses carry the payload directly instead of inside `results`.
	pub no_header: bool,
	/// Dump every validated document as a `CODE` message.
	pub verbose: bool,
}

impl Validator {
	pub fn new(no_header: bool, verbose: bool) -> Self {
		Self { no_header, verbose }
	}

	/// Checks `content` for the fields required by `resource`, appending
	/// messages to `messages`. Pass the whole response document: envelope
	/// handling happens here unless `skip_envelope` (or `no_header`) is set.
	pub fn validate_object(&self, resource: ResourceType, content: &Value, skip_envelope: bool, messages: &mut Vec<Message>) -> Validation {
		if self.verbose {
			messages.push(Message::code(serde_json::to_string_pretty(content).unwrap_or_else(|_| content.to_string())));
		}

		let payload = if self.no_header || skip_envelope {
			content
		} else {
			match unwrap_envelope(content, messages) {
				Some(p) => p,
				None => return Validation::failed(),
			}
		};

		if is_empty(payload) {
			messages.push(Message::error("No results returned!"));
		}
		let object = match payload {
			Value::Array(items) => items.first().unwrap_or(payload),
			other => other,
		};

		let missing = resource.missing_fields(object);
		for field in &missing {
			messages.push(Message::error(format!("JSON object does not contain required {} field!", field)));
		}
		tracing::debug!(resource = resource.tag(), missing = missing.len(), "validated object");

		if missing.is_empty() {
			messages.push(Message::info(format!("Successfully passed {} test!", resource)));
		} else {
			messages.push(Message::error(format!("{} error(s) found in {} objects", missing.len(), resource)));
		}
		Validation { passed: missing.is_empty(), object: Some(object.clone()) }
	}
}

fn unwrap_envelope<'a>(content: &'a Value, messages: &mut Vec<Message>) -> Option<&'a Value> {
	if let Some(results) = content.get("results") {
		return Some(results);
	}
	if let Some(result) = content.get("result") {
		messages.push(Message::error("Result property should be named results (plural). Forgiving this error..."));
		return Some(result);
	}
	messages.push(Message::error("No results could be found in header!"));
	None
}

fn is_empty(v: &Value) -> bool {
	match v {
		Value::Array(a) => a.is_empty(),
		Value::Object(o) => o.is_empty(),
		Value::Null => true,
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::Severity;
	use serde_json::json;

	fn levels(messages: &[Message]) -> Vec<Severity> {
		messages.iter().map(|m| m.level).collect()
	}

	#[test]
	fn passes_when_every_field_is_present() {
		let content = json!({"results": [{"id": 1, "name": "Site A", "shape": "point", "conversiongroup_set": ["http://x/cg/1"]}]});
		let mut messages = Vec::new();
		let v = Validator::default().validate_object(ResourceType::MonitoringPoint, &content, false, &mut messages);
		assert!(v.passed);
		assert_eq!(v.object.unwrap()["name"], "Site A");
		assert_eq!(messages, vec![Message::info("Successfully passed MP test!")]);
	}

	#[test]
	fn reports_every_missing_field_and_a_summary() {
		let content = json!({"results": [{"id": 7}]});
		let mut messages = Vec::new();
		let v = Validator::default().validate_object(ResourceType::ConversionGroup, &content, false, &mut messages);
		assert!(!v.passed);
		assert_eq!(
			messages,
			vec![
				Message::error("JSON object does not contain required monitoringPoint field!"),
				Message::error("JSON object does not contain required conversionPeriods field!"),
				Message::error("2 error(s) found in CONV_GROUP objects"),
			]
		);
		assert_eq!(v.object, Some(json!({"id": 7})));
	}

	#[test]
	fn only_the_first_result_is_inspected() {
		let content = json!({"results": [
			{"periodStart": "a", "periodEnd": "b", "applicableConversion": "c"},
			{"bogus": true}
		]});
		let mut messages = Vec::new();
		let v = Validator::default().validate_object(ResourceType::ConversionPeriod, &content, false, &mut messages);
		assert!(v.passed);
		assert_eq!(v.object.unwrap()["periodStart"], "a");
	}

	#[test]
	fn singular_result_key_is_forgiven_with_an_advisory() {
		let content = json!({"result": [{"id": 1, "monitoringPoint": "419009", "conversionPeriods": []}]});
		let mut messages = Vec::new();
		let v = Validator::default().validate_object(ResourceType::ConversionGroup, &content, false, &mut messages);
		assert!(v.passed);
		assert_eq!(levels(&messages), vec![Severity::Error, Severity::Info]);
		assert!(messages[0].msg.contains("plural"));
	}

	#[test]
	fn plural_key_wins_over_singular() {
		let content = json!({"results": [{"id": 1, "monitoringPoint": "m", "conversionPeriods": []}], "result": []});
		let mut messages = Vec::new();
		let v = Validator::default().validate_object(ResourceType::ConversionGroup, &content, false, &mut messages);
		assert!(v.passed);
		assert_eq!(messages.len(), 1);
	}

	#[test]
	fn missing_envelope_fails_without_an_object() {
		let content = json!({"count": 0, "next": null});
		let mut messages = Vec::new();
		let v = Validator::default().validate_object(ResourceType::Gauging, &content, false, &mut messages);
		assert_eq!(v, Validation { passed: false, object: None });
		assert_eq!(messages, vec![Message::error("No results could be found in header!")]);
	}

	#[test]
	fn empty_results_are_reported_then_checked() {
		let content = json!({"results": []});
		let mut messages = Vec::new();
		let v = Validator::default().validate_object(ResourceType::ConversionPeriod, &content, false, &mut messages);
		assert!(!v.passed);
		assert_eq!(messages[0], Message::error("No results returned!"));
		assert_eq!(messages.last().unwrap(), &Message::error("3 error(s) found in CONV_PERIOD objects"));
	}

	#[test]
	fn skip_envelope_validates_content_directly() {
		let period = json!({"periodStart": "2001", "periodEnd": null, "applicableConversion": "http://x/conv/1"});
		let mut messages = Vec::new();
		let v = Validator::default().validate_object(ResourceType::ConversionPeriod, &period, true, &mut messages);
		assert!(v.passed);
		assert_eq!(v.object, Some(period));
	}

	#[test]
	fn no_header_mode_ignores_envelope_keys() {
		let content = json!({"results": [], "id": 1, "name": "n", "shape": "s", "conversiongroup_set": []});
		let mut messages = Vec::new();
		let v = Validator::new(true, false).validate_object(ResourceType::MonitoringPoint, &content, false, &mut messages);
		assert!(v.passed);
	}

	#[test]
	fn no_header_mode_still_takes_first_element_of_a_list() {
		let content = json!([{"id": 1, "monitoringPoint": "m", "conversionPeriods": []}]);
		let mut messages = Vec::new();
		let v = Validator::new(true, false).validate_object(ResourceType::ConversionGroup, &content, false, &mut messages);
		assert!(v.passed);
		assert_eq!(v.object.unwrap()["id"], 1);
	}

	#[test]
	fn verbose_mode_dumps_content_first() {
		let content = json!({"results": [{"id": 1}]});
		let mut messages = Vec::new();
		Validator::new(false, true).validate_object(ResourceType::ConversionGroup, &content, false, &mut messages);
		assert_eq!(messages[0].level, Severity::Code);
		assert!(messages[0].msg.contains("\"results\""));
	}
}
