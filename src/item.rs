//! Normalized records returned by a provider's `load` endpoint.

// crates.io
use serde::Deserializer;
// self
use crate::_prelude::*;

/// One provider object (contact, page, base, ...) flattened into a common shape.
///
/// Timestamps are kept as the backend's text because providers disagree on offsets and
/// precision; consumers parse them when they need to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationItem {
	/// Provider-side identifier.
	#[serde(default)]
	pub id: Option<String>,
	/// Provider-side object type (e.g. `contact`).
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Whether the item groups other items.
	#[serde(default)]
	pub directory: bool,
	/// Path or name of the parent item.
	#[serde(default)]
	pub parent_path_or_name: Option<String>,
	/// Identifier of the parent item.
	#[serde(default)]
	pub parent_id: Option<String>,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Creation time as reported by the backend.
	#[serde(default)]
	pub creation_time: Option<String>,
	/// Last modification time as reported by the backend.
	#[serde(default)]
	pub last_modified_time: Option<String>,
	/// Link to the item in the provider's UI.
	#[serde(default)]
	pub url: Option<String>,
	/// Identifiers of child items.
	#[serde(default)]
	pub children: Option<Vec<String>>,
	/// MIME type for file-like items.
	#[serde(default)]
	pub mime_type: Option<String>,
	/// Provider change cursor.
	#[serde(default)]
	pub delta: Option<String>,
	/// Drive identifier for file-like items.
	#[serde(default)]
	pub drive_id: Option<String>,
	/// Whether the item should be shown; absent or `null` means visible.
	#[serde(default = "visible", deserialize_with = "visible_unless_false")]
	pub visibility: bool,
}

fn visible() -> bool {
	true
}

fn visible_unless_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(visible))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn sparse_items_take_defaults() {
		let item: IntegrationItem = serde_json::from_str(
			r#"{"id":"101","type":"contact","name":"Ada Lovelace","creation_time":"2024-03-01"}"#,
		)
		.expect("Sparse items should deserialize.");

		assert_eq!(item.kind.as_deref(), Some("contact"));
		assert_eq!(item.creation_time.as_deref(), Some("2024-03-01"));
		assert!(!item.directory);
		assert!(item.visibility);
		assert_eq!(item.children, None);
	}

	#[test]
	fn null_visibility_means_visible() {
		let shown: IntegrationItem = serde_json::from_str(r#"{"id":"101","visibility":null}"#)
			.expect("Null visibility should deserialize.");
		let hidden: IntegrationItem = serde_json::from_str(r#"{"id":"7","visibility":false}"#)
			.expect("Explicit visibility should deserialize.");

		assert!(shown.visibility);
		assert!(!hidden.visibility);
	}
}
