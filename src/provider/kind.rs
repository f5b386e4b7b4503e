//! Closed set of providers the integration backend ships with.

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	provider::{Capabilities, ProviderDescriptor},
};

/// Built-in provider variants.
///
/// Every variant supplies the same contract to the coordinator: a backend path segment, a display
/// name, and a descriptor. Adding a provider means adding a variant, so lookups stay exhaustive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
	/// Notion workspaces.
	Notion,
	/// Airtable bases.
	Airtable,
	/// HubSpot CRM.
	HubSpot,
}
impl ProviderKind {
	/// Every built-in variant, in picker order.
	pub const ALL: [ProviderKind; 3] =
		[ProviderKind::Notion, ProviderKind::Airtable, ProviderKind::HubSpot];

	/// Backend path segment and registry identifier.
	pub const fn id(self) -> &'static str {
		match self {
			ProviderKind::Notion => "notion",
			ProviderKind::Airtable => "airtable",
			ProviderKind::HubSpot => "hubspot",
		}
	}

	/// Name shown to users.
	pub const fn display_name(self) -> &'static str {
		match self {
			ProviderKind::Notion => "Notion",
			ProviderKind::Airtable => "Airtable",
			ProviderKind::HubSpot => "HubSpot",
		}
	}

	/// Descriptor registered for the variant.
	pub fn descriptor(self) -> ProviderDescriptor {
		ProviderDescriptor {
			id: ProviderId::from_static(self.id()),
			display_name: self.display_name().to_owned(),
			capabilities: Capabilities::ALL,
		}
	}

	/// Maps a registry identifier back to its variant.
	pub fn from_id(id: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.id() == id)
	}
}
impl Display for ProviderKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.display_name())
	}
}
