//! Link third-party data providers to a user/org identity: popup-driven OAuth handshakes,
//! credential exchange against an integration backend, and observable session state for the UI
//! layer that drives them.
//!
//! The [`handshake::Coordinator`] is the entry point. It resolves a provider from the
//! [`provider::ProviderRegistry`], asks a [`exchange::CredentialExchange`] for the consent URL,
//! opens it through a [`surface::ConsentSurface`], waits for the window to close, and exchanges
//! the completed grant for [`auth::Credentials`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod exchange;
pub mod handshake;
pub mod http;
pub mod item;
pub mod obs;
pub mod provider;
pub mod surface;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::{Arc, Weak},
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
