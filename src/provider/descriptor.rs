//! Provider descriptor data structures shared by the registry and the coordinator.
//!
//! Descriptors are plain data: an identifier that doubles as the backend path segment, the
//! human-readable name shown to users, and the capabilities the backend integration offers.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Capability flags wired into provider descriptors.
pub mod capability;

pub use builder::*;
pub use capability::*;

// self
use crate::{_prelude::*, auth::ProviderId};

/// Immutable provider descriptor consumed by the coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Name shown to users and reported as the integration `type`.
	pub display_name: String,
	/// Enabled capabilities.
	pub capabilities: Capabilities,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Checks whether the descriptor enables a given capability.
	pub fn supports(&self, capability: Capability) -> bool {
		self.capabilities.supports(capability)
	}
}
impl Display for ProviderDescriptor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.display_name)
	}
}
