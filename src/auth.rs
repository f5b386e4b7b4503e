//! Auth-domain identifiers, caller identity, and credential records.

pub mod credentials;
pub mod id;
pub mod identity;

pub use credentials::*;
pub use id::*;
pub use identity::*;
