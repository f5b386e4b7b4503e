//! Caller identity a handshake is performed for.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, OrgId, UserId},
};

/// The (user, organization) pair a provider gets linked to.
///
/// The coordinator never interprets it; both halves travel to the backend as the `user_id` and
/// `org_id` form fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
	/// End user starting the handshake.
	pub user_id: UserId,
	/// Organization the user acts for.
	pub org_id: OrgId,
}
impl Identity {
	/// Pairs already validated identifiers.
	pub fn new(user_id: UserId, org_id: OrgId) -> Self {
		Self { user_id, org_id }
	}

	/// Validates raw form inputs and pairs them.
	pub fn parse(user: &str, org: &str) -> Result<Self, IdentifierError> {
		Ok(Self { user_id: UserId::new(user)?, org_id: OrgId::new(org)? })
	}

	/// Form fields sent with every backend call.
	pub fn form_fields(&self) -> [(&'static str, &str); 2] {
		[("user_id", self.user_id.as_ref()), ("org_id", self.org_id.as_ref())]
	}
}
impl Display for Identity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}@{}", self.user_id, self.org_id)
	}
}
