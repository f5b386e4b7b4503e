#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use integration_connect::{
	error::{Error, ErrorKind, TransportError},
	exchange::{CredentialExchange, HttpCredentialExchange, ReqwestCredentialExchange},
	handshake::{Coordinator, HandshakeConfig, SessionStatus},
	provider::{ProviderDescriptor, ProviderKind, ProviderRegistry},
	surface::SignalSurface,
	url::Url,
};

fn build_exchange(server: &MockServer) -> ReqwestCredentialExchange {
	let base_url = Url::parse(&server.base_url()).expect("Mock backend URL should parse.");

	HttpCredentialExchange::with_http_client(base_url, test_reqwest_http_client())
		.expect("Mock backend URL should be accepted.")
}

fn hubspot() -> ProviderDescriptor {
	ProviderKind::HubSpot.descriptor()
}

#[tokio::test]
async fn authorize_returns_the_consent_url() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/integrations/hubspot/authorize")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200)
				.header("content-type", "application/json")
				.body("\"https://app.hubspot.com/oauth/authorize?client_id=abc&state=xyz\"");
		})
		.await;
	let exchange = build_exchange(&server);
	let url = exchange
		.request_authorization_url(&hubspot(), &test_identity())
		.await
		.expect("Authorize endpoint should yield a consent URL.");

	mock.assert_async().await;

	assert_eq!(url.host_str(), Some("app.hubspot.com"));
	assert_eq!(
		url.query_pairs().find(|(key, _)| key == "state").map(|(_, value)| value.into_owned()),
		Some("xyz".into())
	);
}

#[tokio::test]
async fn authorize_rejection_is_an_invalid_request() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/integrations/notion/authorize");
			then.status(422)
				.header("content-type", "application/json")
				.body("{\"detail\":\"org_id is required\"}");
		})
		.await;
	let exchange = build_exchange(&server);
	let err = exchange
		.request_authorization_url(&ProviderKind::Notion.descriptor(), &test_identity())
		.await
		.expect_err("Validation failures should be rejected.");

	mock.assert_async().await;

	assert_eq!(err.kind(), ErrorKind::InvalidRequest);
	assert!(err.to_string().contains("org_id is required"));
}

#[tokio::test]
async fn credentials_are_returned_as_a_map() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/integrations/hubspot/credentials");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"abc\",\"expires_in\":1800}");
		})
		.await;
	let exchange = build_exchange(&server);
	let credentials = exchange
		.exchange_for_credentials(&hubspot(), &test_identity())
		.await
		.expect("Stored grants should be returned.");

	mock.assert_async().await;

	assert_eq!(credentials.access_token(), Some("abc"));
	assert_eq!(credentials.keys().collect::<Vec<_>>(), ["access_token", "expires_in"]);
	assert!(!format!("{credentials:?}").contains("abc"), "Debug output should redact values.");
}

#[tokio::test]
async fn missing_grant_is_not_authorized() {
	let server = MockServer::start_async().await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(POST).path("/integrations/hubspot/credentials");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"detail\":\"No credentials found.\"}");
		})
		.await;
	let empty = server
		.mock_async(|when, then| {
			when.method(POST).path("/integrations/airtable/credentials");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let exchange = build_exchange(&server);
	let err = exchange
		.exchange_for_credentials(&hubspot(), &test_identity())
		.await
		.expect_err("Backend rejection should fail the exchange.");

	rejected.assert_async().await;

	assert_eq!(err.kind(), ErrorKind::NotAuthorized);
	assert_eq!(err.to_string(), "Authorization was not completed: No credentials found.");

	let err = exchange
		.exchange_for_credentials(&ProviderKind::Airtable.descriptor(), &test_identity())
		.await
		.expect_err("Empty payloads should fail the exchange.");

	empty.assert_async().await;

	assert_eq!(err.kind(), ErrorKind::NotAuthorized);
}

#[tokio::test]
async fn server_errors_are_service_unavailable() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/integrations/hubspot/credentials");
			then.status(500).body("Internal Server Error");
		})
		.await;
	let exchange = build_exchange(&server);
	let err = exchange
		.exchange_for_credentials(&hubspot(), &test_identity())
		.await
		.expect_err("Server errors should fail the exchange.");

	mock.assert_async().await;

	assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
}

#[tokio::test]
async fn unreachable_backend_is_service_unavailable() {
	let exchange = HttpCredentialExchange::new("http://127.0.0.1:9")
		.expect("Loopback URL should be accepted.");
	let err = exchange
		.request_authorization_url(&hubspot(), &test_identity())
		.await
		.expect_err("Closed ports should fail the request.");

	assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
	assert!(
		matches!(err, Error::Transport(TransportError::Network { .. })),
		"Unreachable backends should keep the transport error, got {err:?}."
	);
}

#[tokio::test]
async fn load_items_posts_credentials_and_parses_items() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/integrations/hubspot/load")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(
				r#"[
					{"id": "101", "type": "contact", "name": "Ada Lovelace"},
					{"id": "7", "type": "company", "name": "Engines", "visibility": false}
				]"#,
			);
		})
		.await;
	let exchange = build_exchange(&server);
	let items = exchange
		.load_items(&hubspot(), &credentials(&[("access_token", "abc")]))
		.await
		.expect("Load endpoint should return items.");

	mock.assert_async().await;

	assert_eq!(items.len(), 2);
	assert_eq!(items[0].name.as_deref(), Some("Ada Lovelace"));
	assert!(items[0].visibility);
	assert_eq!(items[1].kind.as_deref(), Some("company"));
	assert!(!items[1].visibility);
}

#[tokio::test]
async fn ping_probes_the_backend_root() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"Ping\":\"Pong\"}");
		})
		.await;
	let exchange = build_exchange(&server);

	exchange.ping().await.expect("Healthy backends should answer the probe.");
	mock.assert_async().await;
}

#[tokio::test]
async fn coordinator_connects_through_the_http_backend() {
	let server = MockServer::start_async().await;
	let authorize = server
		.mock_async(|when, then| {
			when.method(POST).path("/integrations/hubspot/authorize");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!("\"{}\"", server.url("/consent/hubspot")));
		})
		.await;
	let credentials_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/integrations/hubspot/credentials");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"abc\"}");
		})
		.await;
	let base_url = Url::parse(&server.base_url()).expect("Mock backend URL should parse.");
	let exchange: ReqwestCredentialExchange =
		HttpCredentialExchange::with_http_client(base_url, test_reqwest_http_client())
			.expect("Mock backend URL should be accepted.");
	let surface = SignalSurface::default();
	let coordinator = Coordinator::with_config(
		ProviderRegistry::builtin(),
		Arc::new(exchange),
		Arc::new(surface.clone()),
		HandshakeConfig::default().with_poll_interval(Duration::from_millis(10)),
	);

	coordinator
		.begin_authorization("hubspot", test_identity())
		.await
		.expect("Handshake should open the consent window.");
	authorize.assert_async().await;

	let opened = surface.opened();

	assert_eq!(opened.len(), 1);
	assert_eq!(opened[0].url.as_str(), server.url("/consent/hubspot"));

	opened[0].signal.close();

	let settled = tokio::time::timeout(Duration::from_secs(5), coordinator.settled())
		.await
		.expect("Handshake should settle promptly.");

	credentials_mock.assert_async().await;

	assert_eq!(settled.status(), SessionStatus::Connected);

	let params = settled.integration_params().expect("Connected sessions expose params.");

	assert_eq!(params.kind, "HubSpot");
	assert_eq!(params.credentials.access_token(), Some("abc"));
}
