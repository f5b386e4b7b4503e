//! Opaque provider credentials that redact their values when formatted.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Provider-defined credential record returned by the integration backend.
///
/// The crate never interprets the contents; it only transports them to whoever renders
/// provider data. Values stay out of `Debug`/`Display` output, only keys are shown.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(BTreeMap<String, Value>);
impl Credentials {
	/// Wraps a backend payload, returning `None` when it carries no entries.
	///
	/// An empty record is how the backend reports that no grant exists yet.
	pub fn from_map(map: BTreeMap<String, Value>) -> Option<Self> {
		if map.is_empty() { None } else { Some(Self(map)) }
	}

	/// Looks up a single credential value.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Returns the conventional `access_token` entry when it is a string.
	pub fn access_token(&self) -> Option<&str> {
		self.get("access_token").and_then(Value::as_str)
	}

	/// Iterates over credential keys without exposing values.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	/// Number of entries in the record.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Always false for records built through [`Credentials::from_map`].
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the raw record. Callers must avoid logging it.
	pub fn expose(&self) -> &BTreeMap<String, Value> {
		&self.0
	}

	/// Serializes the record to the JSON text the backend's data endpoints expect.
	pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(&self.0)
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_map().entries(self.0.keys().map(|key| (key, "<redacted>"))).finish()
	}
}
impl Display for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "<{} redacted credential entries>", self.0.len())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn record(value: Value) -> Option<Credentials> {
		let map: BTreeMap<String, Value> =
			serde_json::from_value(value).expect("Credential fixture should be a JSON object.");

		Credentials::from_map(map)
	}

	#[test]
	fn empty_records_are_rejected() {
		assert!(record(json!({})).is_none());
	}

	#[test]
	fn formatters_redact_values() {
		let credentials = record(json!({ "access_token": "abc", "expires_in": 1800 }))
			.expect("Non-empty record should be accepted.");

		assert_eq!(
			format!("{credentials:?}"),
			"{\"access_token\": \"<redacted>\", \"expires_in\": \"<redacted>\"}"
		);
		assert_eq!(credentials.to_string(), "<2 redacted credential entries>");
		assert_eq!(credentials.access_token(), Some("abc"));
		assert_eq!(credentials.keys().collect::<Vec<_>>(), ["access_token", "expires_in"]);
	}

	#[test]
	fn json_text_preserves_entries() {
		let credentials =
			record(json!({ "access_token": "abc" })).expect("Non-empty record should be accepted.");

		assert_eq!(
			credentials.to_json_string().expect("Record should serialize."),
			"{\"access_token\":\"abc\"}"
		);
	}
}
