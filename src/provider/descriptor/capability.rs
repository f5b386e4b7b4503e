// self
use crate::_prelude::*;

/// Operations a provider's backend integration exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
	/// Popup-driven authorization followed by a credential exchange.
	Authorize,
	/// Loading normalized items with previously issued credentials.
	LoadItems,
}
impl Capability {
	/// Returns a stable label for the capability.
	pub fn as_str(self) -> &'static str {
		match self {
			Capability::Authorize => "authorize",
			Capability::LoadItems => "load_items",
		}
	}
}
impl Display for Capability {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Collection of capability flags wired into the descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
	/// Indicates whether the authorization handshake is available.
	pub authorize: bool,
	/// Indicates whether item loading is available.
	pub load_items: bool,
}
impl Capabilities {
	/// Every capability enabled.
	pub const ALL: Self = Self { authorize: true, load_items: true };

	/// Returns true if the provided capability is enabled.
	pub fn supports(self, capability: Capability) -> bool {
		match capability {
			Capability::Authorize => self.authorize,
			Capability::LoadItems => self.load_items,
		}
	}

	/// Marks a capability as enabled.
	pub fn enable(mut self, capability: Capability) -> Self {
		match capability {
			Capability::Authorize => self.authorize = true,
			Capability::LoadItems => self.load_items = true,
		}

		self
	}

	/// Returns true when no capability is enabled.
	pub fn is_empty(self) -> bool {
		!self.authorize && !self.load_items
	}
}
