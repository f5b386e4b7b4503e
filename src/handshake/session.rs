//! Handshake session state and transitions.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Identity},
	error::ErrorKind,
	obs,
	provider::ProviderDescriptor,
	surface::ConsentWindow,
};

/// Generation number identifying one handshake within a coordinator.
///
/// Every `begin_authorization` and every cancellation bumps the generation, so callbacks carrying
/// an older id can be recognized and dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);
impl SessionId {
	pub(crate) const fn new(generation: u64) -> Self {
		Self(generation)
	}

	/// Raw generation number.
	pub const fn get(self) -> u64 {
		self.0
	}
}
impl Display for SessionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "#{}", self.0)
	}
}

/// Fieldless projection of [`SessionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
	/// No handshake in progress.
	Idle,
	/// Waiting for the backend to return the consent URL.
	Requesting,
	/// Consent window is open; waiting for the user to close it.
	AwaitingUserAction,
	/// Window closed; exchanging the grant for credentials.
	Exchanging,
	/// Credentials were issued.
	Connected,
	/// The handshake failed; the user must start over.
	Failed,
}
impl SessionStatus {
	/// Returns a stable label suitable for logs or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SessionStatus::Idle => "idle",
			SessionStatus::Requesting => "requesting",
			SessionStatus::AwaitingUserAction => "awaiting_user_action",
			SessionStatus::Exchanging => "exchanging",
			SessionStatus::Connected => "connected",
			SessionStatus::Failed => "failed",
		}
	}

	/// True while a handshake is in flight (connect control disabled, spinner shown).
	pub const fn is_busy(self) -> bool {
		matches!(
			self,
			SessionStatus::Requesting
				| SessionStatus::AwaitingUserAction
				| SessionStatus::Exchanging
		)
	}

	/// True for `Connected` and `Failed`.
	pub const fn is_terminal(self) -> bool {
		matches!(self, SessionStatus::Connected | SessionStatus::Failed)
	}
}
impl Display for SessionStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Failure recorded on a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionError {
	/// Coarse category.
	pub kind: ErrorKind,
	/// Human-readable message; never empty.
	pub message: String,
}
impl From<&Error> for SessionError {
	fn from(err: &Error) -> Self {
		let message = err.to_string();
		let message = if message.trim().is_empty() { err.kind().to_string() } else { message };

		Self { kind: err.kind(), message }
	}
}
impl Display for SessionError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.message)
	}
}

/// Session state; credentials exist only when connected and errors only when failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SessionState {
	/// See [`SessionStatus::Idle`].
	Idle,
	/// See [`SessionStatus::Requesting`].
	Requesting,
	/// See [`SessionStatus::AwaitingUserAction`].
	AwaitingUserAction,
	/// See [`SessionStatus::Exchanging`].
	Exchanging,
	/// See [`SessionStatus::Connected`].
	Connected(Credentials),
	/// See [`SessionStatus::Failed`].
	Failed(SessionError),
}
impl SessionState {
	/// Fieldless status.
	pub fn status(&self) -> SessionStatus {
		match self {
			SessionState::Idle => SessionStatus::Idle,
			SessionState::Requesting => SessionStatus::Requesting,
			SessionState::AwaitingUserAction => SessionStatus::AwaitingUserAction,
			SessionState::Exchanging => SessionStatus::Exchanging,
			SessionState::Connected(_) => SessionStatus::Connected,
			SessionState::Failed(_) => SessionStatus::Failed,
		}
	}

	/// Credentials of a connected session.
	pub fn credentials(&self) -> Option<&Credentials> {
		match self {
			SessionState::Connected(credentials) => Some(credentials),
			_ => None,
		}
	}

	/// Error of a failed session.
	pub fn error(&self) -> Option<&SessionError> {
		match self {
			SessionState::Failed(error) => Some(error),
			_ => None,
		}
	}
}

/// What a consumer of provider data receives once a session is connected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationParams {
	/// Display name of the connected provider.
	#[serde(rename = "type")]
	pub kind: String,
	/// Credentials issued for it.
	pub credentials: Credentials,
}

/// Published view of the coordinator's current session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
	/// Session the snapshot belongs to; `None` before the first handshake.
	pub session_id: Option<SessionId>,
	/// Provider being connected; `None` when the requested provider did not resolve.
	pub provider: Option<ProviderDescriptor>,
	/// Identity the provider is linked to.
	pub identity: Option<Identity>,
	/// Current state.
	pub state: SessionState,
	/// When the session was created.
	pub started_at: Option<OffsetDateTime>,
	/// When the state last changed.
	pub updated_at: OffsetDateTime,
}
impl SessionSnapshot {
	pub(crate) fn idle() -> Self {
		Self {
			session_id: None,
			provider: None,
			identity: None,
			state: SessionState::Idle,
			started_at: None,
			updated_at: OffsetDateTime::now_utc(),
		}
	}

	pub(crate) fn unresolved(id: SessionId, identity: Identity, err: &Error) -> Self {
		let now = OffsetDateTime::now_utc();

		Self {
			session_id: Some(id),
			provider: None,
			identity: Some(identity),
			state: SessionState::Failed(err.into()),
			started_at: Some(now),
			updated_at: now,
		}
	}

	/// Fieldless status.
	pub fn status(&self) -> SessionStatus {
		self.state.status()
	}

	/// Credentials of a connected session.
	pub fn credentials(&self) -> Option<&Credentials> {
		self.state.credentials()
	}

	/// Error of a failed session.
	pub fn error(&self) -> Option<&SessionError> {
		self.state.error()
	}

	/// True while a handshake is in flight.
	pub fn is_busy(&self) -> bool {
		self.status().is_busy()
	}

	/// Whether the connect control should be enabled.
	pub fn can_connect(&self) -> bool {
		!self.is_busy()
	}

	/// `{ type, credentials }` for downstream consumers once connected.
	pub fn integration_params(&self) -> Option<IntegrationParams> {
		let provider = self.provider.as_ref()?;
		let credentials = self.credentials()?;

		Some(IntegrationParams {
			kind: provider.display_name.clone(),
			credentials: credentials.clone(),
		})
	}
}

/// Consent window taken out of its session.
///
/// Closing may call back into the coordinator, so it happens only after the coordinator lock is
/// released.
#[must_use = "detached windows must be closed once the coordinator lock is released"]
#[derive(Default)]
pub(crate) struct DetachedWindow(Option<Box<dyn ConsentWindow>>);
impl DetachedWindow {
	pub(crate) fn close(self) {
		if let Some(mut window) = self.0 {
			window.close();
		}
	}
}
impl From<Option<Box<dyn ConsentWindow>>> for DetachedWindow {
	fn from(window: Option<Box<dyn ConsentWindow>>) -> Self {
		Self(window)
	}
}

/// One connect attempt for one provider/identity pair.
///
/// The consent window is held only while the state is `AwaitingUserAction`; every transition out
/// of that state detaches it for the caller to close.
pub(crate) struct AuthorizationSession {
	pub(crate) id: SessionId,
	pub(crate) provider: ProviderDescriptor,
	pub(crate) identity: Identity,
	state: SessionState,
	window: Option<Box<dyn ConsentWindow>>,
	started_at: OffsetDateTime,
	updated_at: OffsetDateTime,
}
impl AuthorizationSession {
	pub(crate) fn new(id: SessionId, provider: ProviderDescriptor, identity: Identity) -> Self {
		let now = OffsetDateTime::now_utc();

		obs::trace_transition(id, SessionStatus::Idle, SessionStatus::Requesting);
		obs::record_transition(SessionStatus::Requesting);

		Self {
			id,
			provider,
			identity,
			state: SessionState::Requesting,
			window: None,
			started_at: now,
			updated_at: now,
		}
	}

	pub(crate) fn status(&self) -> SessionStatus {
		self.state.status()
	}

	pub(crate) fn transition(&mut self, next: SessionState) -> DetachedWindow {
		let detached = self.detach_window();

		self.enter(next);

		detached
	}

	pub(crate) fn fail(&mut self, err: &Error) -> DetachedWindow {
		self.transition(SessionState::Failed(err.into()))
	}

	pub(crate) fn await_user(&mut self, window: Box<dyn ConsentWindow>) -> DetachedWindow {
		self.enter(SessionState::AwaitingUserAction);

		self.window.replace(window).into()
	}

	fn enter(&mut self, next: SessionState) {
		let from = self.state.status();
		let to = next.status();

		obs::trace_transition(self.id, from, to);
		obs::record_transition(to);

		self.state = next;
		self.updated_at = OffsetDateTime::now_utc();
	}

	pub(crate) fn window_closed(&self) -> bool {
		self.window.as_ref().is_none_or(|window| window.is_closed())
	}

	pub(crate) fn detach_window(&mut self) -> DetachedWindow {
		self.window.take().into()
	}

	pub(crate) fn snapshot(&self) -> SessionSnapshot {
		SessionSnapshot {
			session_id: Some(self.id),
			provider: Some(self.provider.clone()),
			identity: Some(self.identity.clone()),
			state: self.state.clone(),
			started_at: Some(self.started_at),
			updated_at: self.updated_at,
		}
	}
}
impl Debug for AuthorizationSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationSession")
			.field("id", &self.id)
			.field("provider", &self.provider.id)
			.field("identity", &self.identity)
			.field("state", &self.state)
			.field("window_open", &self.window.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::provider::ProviderKind;

	struct CountingWindow(Arc<AtomicUsize>);
	impl ConsentWindow for CountingWindow {
		fn is_closed(&self) -> bool {
			self.0.load(Ordering::SeqCst) > 0
		}

		fn close(&mut self) {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}

	fn session() -> AuthorizationSession {
		AuthorizationSession::new(
			SessionId::new(1),
			ProviderKind::HubSpot.descriptor(),
			Identity::parse("TestUser", "TestOrg").expect("Identity fixture should be valid."),
		)
	}

	#[test]
	fn leaving_awaiting_user_action_detaches_the_window() {
		let closes = Arc::new(AtomicUsize::new(0));
		let mut session = session();

		session.await_user(Box::new(CountingWindow(closes.clone()))).close();

		assert!(!session.window_closed());

		let detached = session.transition(SessionState::Exchanging);

		assert!(session.window.is_none());
		assert!(session.window_closed());
		assert_eq!(closes.load(Ordering::SeqCst), 0, "Detaching must not close the window yet.");

		detached.close();

		assert_eq!(closes.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn snapshots_expose_integration_params_only_when_connected() {
		let mut session = session();

		assert_eq!(session.snapshot().integration_params(), None);

		let credentials = Credentials::from_map(BTreeMap::from([(
			"access_token".to_owned(),
			serde_json::Value::from("abc"),
		)]))
		.expect("Credential fixture is non-empty.");

		session.transition(SessionState::Connected(credentials.clone())).close();

		let params =
			session.snapshot().integration_params().expect("Connected sessions expose params.");

		assert_eq!(params.kind, "HubSpot");
		assert_eq!(params.credentials, credentials);
		assert_eq!(
			serde_json::to_value(&params).expect("Params should serialize.")["type"],
			"HubSpot"
		);
	}

	#[test]
	fn session_errors_are_never_blank() {
		let mut session = session();

		session.fail(&Error::NotFound { provider: "dropbox".into() }).close();

		let snapshot = session.snapshot();
		let error = snapshot.error().expect("Failed sessions carry an error.");

		assert_eq!(error.kind, ErrorKind::NotFound);
		assert!(!error.message.is_empty());
		assert!(snapshot.credentials().is_none());
		assert!(snapshot.can_connect());
	}
}
