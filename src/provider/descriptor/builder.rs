// std
use std::iter::IntoIterator;
// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	provider::{Capabilities, Capability, ProviderDescriptor},
};

const DISPLAY_NAME_MAX_LEN: usize = 64;

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Display name is required.
	#[error("Missing display name for provider `{id}`.")]
	MissingDisplayName {
		/// Identifier of the incomplete descriptor.
		id: String,
	},
	/// Display name is too long to render.
	#[error("Display name for provider `{id}` exceeds {max} characters.")]
	DisplayNameTooLong {
		/// Identifier of the offending descriptor.
		id: String,
		/// Maximum permitted character count.
		max: usize,
	},
	/// At least one capability must be enabled.
	#[error("Descriptor must enable at least one capability.")]
	NoCapabilities,
	/// Item loading only makes sense after an authorization handshake.
	#[error("The load_items capability requires enabling authorize.")]
	LoadItemsWithoutAuthorize,
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Human-readable name.
	pub display_name: Option<String>,
	/// Capabilities enabled for the provider.
	pub capabilities: Capabilities,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self { id, display_name: None, capabilities: Capabilities::default() }
	}

	/// Sets the display name.
	pub fn display_name(mut self, name: impl Into<String>) -> Self {
		self.display_name = Some(name.into());

		self
	}

	/// Enables a single capability.
	pub fn capability(mut self, capability: Capability) -> Self {
		self.capabilities = self.capabilities.enable(capability);

		self
	}

	/// Enables multiple capabilities.
	pub fn capabilities<I>(mut self, capabilities: I) -> Self
	where
		I: IntoIterator<Item = Capability>,
	{
		for capability in capabilities.into_iter() {
			self.capabilities = self.capabilities.enable(capability);
		}

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let display_name = self
			.display_name
			.map(|name| name.trim().to_owned())
			.filter(|name| !name.is_empty())
			.ok_or_else(|| ProviderDescriptorError::MissingDisplayName {
				id: self.id.to_string(),
			})?;
		let descriptor =
			ProviderDescriptor { id: self.id, display_name, capabilities: self.capabilities };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		if self.capabilities.is_empty() {
			return Err(ProviderDescriptorError::NoCapabilities);
		}
		if self.capabilities.load_items && !self.capabilities.authorize {
			return Err(ProviderDescriptorError::LoadItemsWithoutAuthorize);
		}
		if self.display_name.chars().count() > DISPLAY_NAME_MAX_LEN {
			return Err(ProviderDescriptorError::DisplayNameTooLong {
				id: self.id.to_string(),
				max: DISPLAY_NAME_MAX_LEN,
			});
		}

		Ok(())
	}
}
