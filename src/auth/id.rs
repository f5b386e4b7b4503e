//! Strongly typed identifiers for users, organizations, and providers.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $validate:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				$validate($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (user, org, provider).
		kind: &'static str,
	},
	/// The identifier contains characters that are not allowed for its kind.
	#[error("{kind} identifier contains {what}.")]
	InvalidCharacter {
		/// Kind of identifier (user, org, provider).
		kind: &'static str,
		/// Offending character class.
		what: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (user, org, provider).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! {
	UserId,
	"End-user identifier supplied by the presentation layer.",
	"User",
	validate_free_form
}
def_id! {
	OrgId,
	"Organization identifier supplied by the presentation layer.",
	"Org",
	validate_free_form
}
def_id! {
	ProviderId,
	"Identifier for a registered provider (also its backend path segment).",
	"Provider",
	validate_slug
}

impl ProviderId {
	// Built-in providers use literals that are valid slugs.
	pub(crate) fn from_static(value: &'static str) -> Self {
		debug_assert!(validate_slug("Provider", value).is_ok());

		Self(value.to_owned())
	}
}

// User and org ids come straight from form inputs, so inner spaces are accepted.
fn validate_free_form(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.trim().is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_control) {
		return Err(IdentifierError::InvalidCharacter { kind, what: "control characters" });
	}

	validate_len(kind, view)
}

fn validate_slug(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::InvalidCharacter { kind, what: "whitespace" });
	}
	if view.contains(['/', '?', '#']) {
		return Err(IdentifierError::InvalidCharacter { kind, what: "URL delimiters" });
	}

	validate_len(kind, view)
}

fn validate_len(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	#[test]
	fn provider_ids_reject_whitespace_and_delimiters() {
		assert!(ProviderId::new("hubspot").is_ok());
		assert!(ProviderId::new(" hubspot").is_err(), "Leading whitespace must be rejected.");
		assert!(ProviderId::new("hub/spot").is_err(), "Path delimiters must be rejected.");
		assert!(ProviderId::new("").is_err());
	}

	#[test]
	fn free_form_ids_accept_inner_spaces() {
		let user = UserId::new("Test User").expect("Inner spaces should be accepted for users.");

		assert_eq!(user.as_ref(), "Test User");
		assert!(OrgId::new("   ").is_err(), "Blank organizations must be rejected.");
		assert!(OrgId::new("org\u{0007}").is_err(), "Control characters must be rejected.");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let org: OrgId =
			serde_json::from_str("\"TestOrg\"").expect("Org should deserialize successfully.");

		assert_eq!(org.as_ref(), "TestOrg");
		assert!(serde_json::from_str::<ProviderId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<UserId>("\"\"").is_err());
	}

	#[test]
	fn length_limits_and_borrowed_lookup() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		UserId::new(&exact).expect("Exact length should succeed.");

		assert!(UserId::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());

		let map: HashMap<ProviderId, u8> = HashMap::from_iter([(
			ProviderId::new("notion").expect("Provider used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("notion"), Some(&7));
	}
}
