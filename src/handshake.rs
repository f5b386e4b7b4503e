//! Popup-driven authorization handshakes and the state the UI observes.
//!
//! A [`Coordinator`] runs at most one handshake at a time:
//!
//! ```text
//! Idle -> Requesting -> AwaitingUserAction -> Exchanging -> Connected
//!              |                |                  |
//!              +--------------> Failed <-----------+
//! ```
//!
//! Starting a new handshake (or cancelling) bumps the session generation. The window poller and
//! every in-flight backend call carry the generation they were started for, so results that
//! arrive after their session was replaced are discarded instead of overwriting newer state.

pub mod config;
pub mod session;

pub use config::*;
pub use session::*;

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{self, Instant, MissedTickBehavior},
};
// self
use crate::{
	_prelude::*,
	auth::Identity,
	exchange::CredentialExchange,
	obs::{self, FlowOutcome, FlowSpan},
	provider::{ProviderDescriptor, ProviderRegistry},
	surface::ConsentSurface,
};

/// Drives provider handshakes and publishes their state.
///
/// Cloning is cheap; clones share one session. When the last clone is dropped the window poller
/// stops and any open consent window is closed.
#[derive(Clone)]
pub struct Coordinator {
	shared: Arc<Shared>,
}
impl Coordinator {
	/// Creates a coordinator with the default [`HandshakeConfig`].
	pub fn new(
		registry: ProviderRegistry,
		exchange: Arc<dyn CredentialExchange>,
		surface: Arc<dyn ConsentSurface>,
	) -> Self {
		Self::with_config(registry, exchange, surface, HandshakeConfig::default())
	}

	/// Creates a coordinator with explicit tunables.
	pub fn with_config(
		registry: ProviderRegistry,
		exchange: Arc<dyn CredentialExchange>,
		surface: Arc<dyn ConsentSurface>,
		config: HandshakeConfig,
	) -> Self {
		let (publisher, _) = watch::channel(SessionSnapshot::idle());

		Self {
			shared: Arc::new(Shared {
				registry,
				exchange,
				surface,
				config,
				publisher,
				inner: Mutex::new(Inner::default()),
			}),
		}
	}

	/// Providers offered to the user.
	pub fn registry(&self) -> &ProviderRegistry {
		&self.shared.registry
	}

	/// Active tunables.
	pub fn config(&self) -> &HandshakeConfig {
		&self.shared.config
	}

	/// Starts a handshake for `provider` on behalf of `identity`, replacing any current one.
	///
	/// Resolves once the consent window is open (or the attempt failed); completion is observed
	/// through [`Coordinator::subscribe`]. Failures are both returned and recorded on the
	/// published session, except [`Error::Superseded`], which means a newer call or a
	/// [`Coordinator::cancel`] took over before this one finished.
	///
	/// Must be called from within a Tokio runtime.
	pub async fn begin_authorization(
		&self,
		provider: &str,
		identity: Identity,
	) -> Result<SessionId> {
		const STAGE: &str = "begin_authorization";

		let span = FlowSpan::new(STAGE, Some(provider));

		obs::record_flow_outcome(STAGE, FlowOutcome::Attempt);

		let result = span.instrument(self.shared.begin(provider, identity)).await;

		obs::record_result(STAGE, &result);

		result
	}

	/// Abandons the in-flight handshake and returns to `Idle`.
	///
	/// Returns `false` (and changes nothing) when no handshake is in flight, so a connected or
	/// failed session keeps its outcome.
	pub fn cancel(&self) -> bool {
		self.shared.update(|inner| {
			if !inner.session.as_ref().is_some_and(|session| session.status().is_busy()) {
				return (false, DetachedWindow::default());
			}

			inner.supersede();

			let Some(session) = inner.session.as_mut() else {
				return (true, DetachedWindow::default());
			};
			let detached = session.transition(SessionState::Idle);

			self.shared.publish(session.snapshot());

			(true, detached)
		})
	}

	/// Current session snapshot.
	pub fn snapshot(&self) -> SessionSnapshot {
		self.shared.publisher.borrow().clone()
	}

	/// Receiver notified on every state change.
	pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
		self.shared.publisher.subscribe()
	}

	/// `{ type, credentials }` of the connected session, if any.
	pub fn integration_params(&self) -> Option<IntegrationParams> {
		self.shared.publisher.borrow().integration_params()
	}

	/// Waits until no handshake is in flight and returns the resulting snapshot.
	pub async fn settled(&self) -> SessionSnapshot {
		let mut receiver = self.subscribe();
		let settled = receiver.wait_for(|snapshot| !snapshot.is_busy()).await.map(|s| s.clone());

		settled.unwrap_or_else(|_| self.snapshot())
	}
}
impl Debug for Coordinator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let snapshot = self.shared.publisher.borrow();

		f.debug_struct("Coordinator")
			.field("providers", &self.shared.registry.list_providers().len())
			.field("session_id", &snapshot.session_id)
			.field("status", &snapshot.status())
			.field("config", &self.shared.config)
			.finish()
	}
}

struct Shared {
	registry: ProviderRegistry,
	exchange: Arc<dyn CredentialExchange>,
	surface: Arc<dyn ConsentSurface>,
	config: HandshakeConfig,
	publisher: watch::Sender<SessionSnapshot>,
	inner: Mutex<Inner>,
}
impl Shared {
	async fn begin(self: &Arc<Self>, provider: &str, identity: Identity) -> Result<SessionId> {
		let resolved = self.registry.resolve(provider).cloned();
		let (id, provider) = self.update(|inner| {
			let id = inner.supersede();
			let superseded = inner.detach_window();

			match resolved {
				Ok(provider) => {
					let session = AuthorizationSession::new(id, provider.clone(), identity.clone());

					self.publish(session.snapshot());
					inner.session = Some(session);

					(Ok((id, provider)), superseded)
				},
				Err(err) => {
					inner.session = None;
					self.publish(SessionSnapshot::unresolved(id, identity.clone(), &err));

					(Err(err), superseded)
				},
			}
		})?;
		let requested = self.exchange.request_authorization_url(&provider, &identity).await;
		let url = self.update(|inner| {
			let session = match inner.current(id, "authorization_url") {
				Ok(session) => session,
				Err(err) => return (Err(err), DetachedWindow::default()),
			};

			match requested {
				Ok(url) => (Ok(url), DetachedWindow::default()),
				Err(err) => {
					let detached = session.fail(&err);

					self.publish(session.snapshot());

					(Err(err), detached)
				},
			}
		})?;
		let features = self.config.window.titled_for(&provider.display_name);
		let opened = self.surface.open(&url, &features);

		self.update(|inner| {
			let session = match inner.current(id, "consent_window") {
				Ok(session) => session,
				Err(err) => return (Err(err), opened.ok().into()),
			};

			match opened {
				Ok(window) => {
					let detached = session.await_user(window);

					self.publish(session.snapshot());

					let period = self.config.poll_interval();
					let poll = FlowSpan::new("consent_poll", Some(provider.id.as_ref()))
						.instrument(poll_consent(Arc::downgrade(self), id, period));

					inner.poller = Some(tokio::spawn(poll));

					(Ok(id), detached)
				},
				Err(err) => {
					let err = Error::from(err);
					let detached = session.fail(&err);

					self.publish(session.snapshot());

					(Err(err), detached)
				},
			}
		})
	}

	// Windows detached under the lock are closed after it is released; closing may call back
	// into the coordinator.
	fn update<T>(&self, update: impl FnOnce(&mut Inner) -> (T, DetachedWindow)) -> T {
		let (value, detached) = update(&mut *self.inner.lock());

		detached.close();

		value
	}

	fn publish(&self, snapshot: SessionSnapshot) {
		self.publisher.send_replace(snapshot);
	}
}
impl Drop for Shared {
	fn drop(&mut self) {
		let inner = self.inner.get_mut();

		inner.supersede();
		inner.detach_window().close();
	}
}

#[derive(Debug, Default)]
struct Inner {
	generation: u64,
	session: Option<AuthorizationSession>,
	poller: Option<JoinHandle<()>>,
}
impl Inner {
	// Invalidates every callback of the current session and stops its poller.
	fn supersede(&mut self) -> SessionId {
		self.generation += 1;

		if let Some(poller) = self.poller.take() {
			poller.abort();
		}

		SessionId::new(self.generation)
	}

	fn detach_window(&mut self) -> DetachedWindow {
		self.session.as_mut().map(AuthorizationSession::detach_window).unwrap_or_default()
	}

	fn current(
		&mut self,
		id: SessionId,
		callback: &'static str,
	) -> Result<&mut AuthorizationSession> {
		let current = SessionId::new(self.generation);

		match self.session.as_mut() {
			Some(session) if session.id == id && current == id => Ok(session),
			_ => {
				obs::trace_stale_callback(id, current, callback);

				Err(Error::Superseded)
			},
		}
	}
}

enum Tick {
	Stale,
	Open,
	Closed(ProviderDescriptor, Identity),
}

async fn poll_consent(weak: Weak<Shared>, id: SessionId, period: StdDuration) {
	let mut ticker = time::interval_at(Instant::now() + period, period);

	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	let (shared, provider, identity) = loop {
		ticker.tick().await;

		let Some(shared) = weak.upgrade() else { return };
		let tick = shared.update(|inner| {
			let Ok(session) = inner.current(id, "consent_poll") else {
				return (Tick::Stale, DetachedWindow::default());
			};

			if !session.window_closed() {
				return (Tick::Open, DetachedWindow::default());
			}

			let detached = session.transition(SessionState::Exchanging);

			shared.publish(session.snapshot());

			(Tick::Closed(session.provider.clone(), session.identity.clone()), detached)
		});

		match tick {
			Tick::Stale => return,
			Tick::Open => continue,
			Tick::Closed(provider, identity) => break (shared, provider, identity),
		}
	};
	let exchanged = shared.exchange.exchange_for_credentials(&provider, &identity).await;

	shared.update(|inner| {
		let Ok(session) = inner.current(id, "credentials") else {
			return ((), DetachedWindow::default());
		};
		let detached = match exchanged {
			Ok(credentials) => session.transition(SessionState::Connected(credentials)),
			Err(err) => session.fail(&err),
		};

		shared.publish(session.snapshot());
		inner.poller = None;

		((), detached)
	});
}
