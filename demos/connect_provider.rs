//! Connects a provider against a locally running integration backend.
//!
//! Usage: `cargo run --example connect_provider -- [provider] [user] [org]`. The backend location
//! defaults to `http://localhost:8000` and can be overridden with `INTEGRATION_BACKEND_URL`.
//! Open the printed URL in a browser, finish the consent screen, then press Enter.

// std
use std::{env, io, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use integration_connect::{
	auth::Identity,
	exchange::{DEFAULT_BACKEND_URL, HttpCredentialExchange},
	handshake::{Coordinator, SessionStatus},
	provider::ProviderRegistry,
	surface::SignalSurface,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = env::args().skip(1);
	let provider = args.next().unwrap_or_else(|| "hubspot".into());
	let user = args.next().unwrap_or_else(|| "TestUser".into());
	let org = args.next().unwrap_or_else(|| "TestOrg".into());
	let identity = Identity::parse(&user, &org)?;
	let backend_url =
		env::var("INTEGRATION_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into());
	let exchange = Arc::new(HttpCredentialExchange::new(&backend_url)?);

	exchange.ping().await?;

	let registry = ProviderRegistry::builtin();
	let surface = SignalSurface::default();
	let coordinator = Coordinator::new(registry, exchange.clone(), Arc::new(surface.clone()));

	println!(
		"Available providers: {}.",
		coordinator
			.registry()
			.list_providers()
			.iter()
			.map(|provider| provider.id.to_string())
			.collect::<Vec<_>>()
			.join(", ")
	);

	coordinator.begin_authorization(&provider, identity).await?;

	let opened = surface.opened();
	let window = opened.last().ok_or_else(|| eyre!("No consent window was opened."))?;

	println!("{}: open {} and press Enter when done.", window.features.title, window.url);
	tokio::task::spawn_blocking(|| io::stdin().read_line(&mut String::new())).await??;
	window.signal.close();

	let settled = coordinator.settled().await;

	if settled.status() != SessionStatus::Connected {
		let reason = settled.error().map(ToString::to_string).unwrap_or_default();

		return Err(eyre!("Handshake ended as {}: {reason}", settled.status()));
	}

	let params = settled.integration_params().ok_or_else(|| eyre!("Connected without params."))?;

	println!("Connected {} with {}.", params.kind, params.credentials);

	let descriptor = settled.provider.ok_or_else(|| eyre!("Connected without a provider."))?;
	let items = exchange.load_items(&descriptor, &params.credentials).await?;

	for item in items.iter().filter(|item| item.visibility) {
		println!(
			"- [{}] {}",
			item.kind.as_deref().unwrap_or("item"),
			item.name.as_deref().unwrap_or("(unnamed)")
		);
	}

	Ok(())
}
