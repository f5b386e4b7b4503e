//! Static lookup table from provider identifier to descriptor.

// self
use crate::{
	_prelude::*,
	provider::{ProviderDescriptor, ProviderKind},
};

/// Errors raised while assembling a [`ProviderRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum RegistryError {
	/// Registry needs at least one provider.
	#[error("Provider registry cannot be empty.")]
	Empty,
	/// Two descriptors share an identifier.
	#[error("Provider `{id}` is registered more than once.")]
	DuplicateProvider {
		/// Identifier that appeared twice.
		id: String,
	},
}

/// Ordered, immutable set of provider descriptors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderRegistry {
	providers: Vec<ProviderDescriptor>,
}
impl ProviderRegistry {
	/// Builds a registry, rejecting duplicate identifiers.
	pub fn new<I>(descriptors: I) -> Result<Self, RegistryError>
	where
		I: IntoIterator<Item = ProviderDescriptor>,
	{
		let mut providers = Vec::<ProviderDescriptor>::new();

		for descriptor in descriptors {
			if providers.iter().any(|existing| existing.id == descriptor.id) {
				return Err(RegistryError::DuplicateProvider { id: descriptor.id.to_string() });
			}

			providers.push(descriptor);
		}

		if providers.is_empty() {
			return Err(RegistryError::Empty);
		}

		Ok(Self { providers })
	}

	/// Registry holding every [`ProviderKind`] variant.
	pub fn builtin() -> Self {
		Self { providers: ProviderKind::ALL.into_iter().map(ProviderKind::descriptor).collect() }
	}

	/// Descriptors in registration order.
	pub fn list_providers(&self) -> &[ProviderDescriptor] {
		&self.providers
	}

	/// Resolves a provider by identifier.
	pub fn resolve(&self, id: &str) -> Result<&ProviderDescriptor> {
		self.providers
			.iter()
			.find(|descriptor| descriptor.id.as_ref() == id)
			.ok_or_else(|| Error::NotFound { provider: id.to_owned() })
	}

	/// Resolves a provider by the name shown in the picker.
	pub fn resolve_display_name(&self, name: &str) -> Result<&ProviderDescriptor> {
		self.providers
			.iter()
			.find(|descriptor| descriptor.display_name == name)
			.ok_or_else(|| Error::NotFound { provider: name.to_owned() })
	}
}
impl Default for ProviderRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}
