//! Required-field tables for the RGS resource types.
//!
//! These are presence checks only. Field types, value ranges and nested
//! structure are never inspected.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
	MonitoringPoint,
	Gauging,
	Conversion,
	ConversionPeriod,
	ConversionGroup,
}

const MP_REQUIRED: &[&str] = &["id", "name", "shape", "conversiongroup_set"];
const GAUGING_REQUIRED: &[&str] = &[
	"id",
	"observedPropertyFrom",
	"observedPropertyTo",
	"fromValue",
	"toValue",
	"featureOfInterest",
	"phenomenonTime",
];
const CONV_REQUIRED: &[&str] = &["id", "paramFrom", "paramTo", "conversionperiod_set", "monitoringPoint", "points"];
const CONV_PERIOD_REQUIRED: &[&str] = &["periodStart", "periodEnd", "applicableConversion"];
const CONV_GROUP_REQUIRED: &[&str] = &["id", "monitoringPoint", "conversionPeriods"];

impl ResourceType {
	pub const ALL: [ResourceType; 5] = [
		ResourceType::MonitoringPoint,
		ResourceType::Gauging,
		ResourceType::Conversion,
		ResourceType::ConversionPeriod,
		ResourceType::ConversionGroup,
	];

	/// Tag used in messages, e.g. `Successfully passed MP test!`.
	pub fn tag(&self) -> &'static str {
		match self {
			ResourceType::MonitoringPoint => "MP",
			ResourceType::Gauging => "GAUGING",
			ResourceType::Conversion => "CONV",
			ResourceType::ConversionPeriod => "CONV_PERIOD",
			ResourceType::ConversionGroup => "CONV_GROUP",
		}
	}

	pub fn from_tag(tag: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|t| t.tag().eq_ignore_ascii_case(tag))
	}

	/// Required field names, in the order they are checked.
	pub fn required_fields(&self) -> &'static [&'static str] {
		match self {
			ResourceType::MonitoringPoint => MP_REQUIRED,
			ResourceType::Gauging => GAUGING_REQUIRED,
			ResourceType::Conversion => CONV_REQUIRED,
			ResourceType::ConversionPeriod => CONV_PERIOD_REQUIRED,
			ResourceType::ConversionGroup => CONV_GROUP_REQUIRED,
		}
	}

	/// Names of required fields absent from `object`, in table order.
	/// Anything that is not a JSON object is missing every field.
	pub fn missing_fields(&self, object: &serde_json::Value) -> Vec<&'static str> {
		let map = object.as_object();
		self.required_fields()
			.iter()
			.copied()
			.filter(|field| !map.is_some_and(|m| m.contains_key(*field)))
			.collect()
	}
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}
