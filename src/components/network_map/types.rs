use serde::{Deserialize, Deserializer};

/// Health bucket a proxy was placed in by the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusCategory {
	Ok,
	Warn,
	#[default]
	Error,
}

impl StatusCategory {
	/// Anything that is not recognisably healthy or delayed counts as an error.
	pub fn from_label(label: &str) -> Self {
		match label.trim().to_ascii_lowercase().as_str() {
			"success" | "ok" => Self::Ok,
			"warning" | "warn" => Self::Warn,
			_ => Self::Error,
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Self::Ok => "#10b981",
			Self::Warn => "#f59e0b",
			Self::Error => "#ef4444",
		}
	}

	pub fn css_class(self) -> &'static str {
		match self {
			Self::Ok => "success",
			Self::Warn => "warning",
			Self::Error => "danger",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			Self::Ok => "Online",
			Self::Warn => "Delayed update",
			Self::Error => "Offline",
		}
	}
}

impl<'de> Deserialize<'de> for StatusCategory {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let label = String::deserialize(deserializer)?;
		Ok(Self::from_label(&label))
	}
}

/// One entry of the `data-proxies` array.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ProxyDescriptor {
	pub name: String,
	#[serde(rename = "status_color", alias = "status", default)]
	pub status: StatusCategory,
	#[serde(default)]
	pub hosts_count: u32,
	#[serde(default)]
	pub mode: String,
	#[serde(default)]
	pub last_access: String,
}

/// Parses the serialized proxy list; blank input is an empty list.
pub fn parse_proxy_data(raw: &str) -> Result<Vec<ProxyDescriptor>, serde_json::Error> {
	if raw.trim().is_empty() {
		return Ok(Vec::new());
	}
	serde_json::from_str(raw)
}
