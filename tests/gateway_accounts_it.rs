// crates.io
use httpmock::prelude::*;
use josekit::{jwk::Jwk, jws, jwt};
use serde_json::json;
// self
use open_banking_gateway::{
	_preludet::*,
	auth::{AssertionMode, Credentials, InboundToken, Secret, SigningAlgorithm},
	error::UpstreamError,
	scheme::JWS_AUTHORIZATION_HEADER,
};

fn assertion_credentials(mode: AssertionMode) -> Credentials {
	Credentials::OAuth2Assertion {
		key_id: "kid-1".into(),
		private_key: Secret::new(TEST_P521_JWK),
		algorithm: SigningAlgorithm::Es512,
		mode,
	}
}

#[tokio::test]
async fn bearer_accounts_return_upstream_payload_verbatim() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url(), Credentials::BearerForward);
	let payload = json!({
		"accounts": [
			{ "id": "ACC-001", "balance": "1200.00", "currency": "GBP" },
			{ "id": "ACC-002", "balance": "-3.10", "currency": "GBP" },
		],
		"links": { "self": "/accounts" },
	});
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/accounts").header("Authorization", "Bearer caller-token");
			then.status(200).json_body(payload.clone());
		})
		.await;
	let token = InboundToken::new("caller-token");
	let accounts = gateway.get_accounts(Some(&token)).await.expect("Accounts should succeed.");

	assert_eq!(accounts, payload);

	mock.assert_async().await;
}

#[tokio::test]
async fn bearer_accounts_without_token_make_no_upstream_call() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url(), Credentials::BearerForward);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/accounts");
			then.status(200).json_body(json!([]));
		})
		.await;
	let err = gateway.get_accounts(None).await.expect_err("Missing token must be rejected.");

	assert!(matches!(err, Error::MissingCredential { .. }));
	assert_eq!(err.status_code(), 401);
	assert_eq!(err.summary(), "Missing access token");

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn oauth1_accounts_forward_the_caller_token() {
	let credentials = Credentials::OAuth1Signed {
		consumer_key: "consumer-key".into(),
		consumer_secret: Secret::new("consumer-secret"),
		callback_url: Url::parse("https://app.example/callback").expect("Callback should parse."),
	};
	let (gateway, client) = build_recording_gateway(credentials.clone(), 200, "[]");
	let token = InboundToken::new("oauth-access");

	gateway.get_accounts(Some(&token)).await.expect("Accounts should succeed.");

	let requests = client.requests();

	assert_eq!(requests[0].url.as_str(), "https://sandbox.bank.example/api/accounts");
	assert_eq!(requests[0].header("Authorization"), Some("Bearer oauth-access"));
	assert_eq!(requests[0].body, None);

	let (gateway, client) = build_recording_gateway(credentials, 200, "[]");

	assert!(matches!(gateway.get_accounts(None).await, Err(Error::MissingCredential { .. })));
	assert!(client.requests().is_empty());
}

#[tokio::test]
async fn api_key_accounts_ignore_the_caller_token() {
	let credentials = Credentials::ApiKeyHeaders {
		consumer_key: "consumer-key".into(),
		consumer_secret: Secret::new("consumer-secret"),
	};
	let (gateway, client) = build_recording_gateway(credentials, 200, "{\"accounts\":[]}");
	let token = InboundToken::new("ignored");

	gateway.get_accounts(Some(&token)).await.expect("Accounts should succeed.");

	let requests = client.requests();

	assert_eq!(requests[0].header("Consumer-Key"), Some("consumer-key"));
	assert_eq!(requests[0].header("Consumer-Secret"), Some("consumer-secret"));
	assert_eq!(requests[0].header("Authorization"), None);
}

#[tokio::test]
async fn self_signed_accounts_attach_a_verifiable_assertion() {
	let (gateway, client) =
		build_recording_gateway(assertion_credentials(AssertionMode::SelfSigned), 200, "[]");

	gateway.get_accounts(None).await.expect("Self-signed accounts need no caller token.");

	let requests = client.requests();
	let assertion =
		requests[0].header(JWS_AUTHORIZATION_HEADER).expect("Assertion header should be set.");
	let jwk = Jwk::from_bytes(TEST_P521_JWK.as_bytes()).expect("Fixture JWK should parse.");
	let verifier = jws::ES512.verifier_from_jwk(&jwk).expect("Verifier should build.");
	let (payload, header) =
		jwt::decode_with_verifier(assertion, &verifier).expect("Assertion should verify.");

	assert_eq!(header.key_id(), Some("kid-1"));
	assert_eq!(payload.issuer(), Some("kid-1"));
	assert!(payload.jwt_id().is_some());
}

#[tokio::test]
async fn forward_bearer_assertion_mode_requires_a_token() {
	let (gateway, client) =
		build_recording_gateway(assertion_credentials(AssertionMode::ForwardBearer), 200, "[]");
	let err = gateway.get_accounts(None).await.expect_err("Missing token must be rejected.");

	assert_eq!(err.status_code(), 401);
	assert!(client.requests().is_empty());

	let token = InboundToken::new("issued-access");

	gateway.get_accounts(Some(&token)).await.expect("Accounts should succeed with a token.");

	let requests = client.requests();

	assert_eq!(requests[0].header("Authorization"), Some("Bearer issued-access"));
	assert_eq!(requests[0].header(JWS_AUTHORIZATION_HEADER), None);
}

#[tokio::test]
async fn upstream_errors_map_to_accounts_retrieval_failed() {
	let (gateway, _client) =
		build_recording_gateway(Credentials::BearerForward, 403, "access revoked");
	let token = InboundToken::new("caller-token");
	let err = gateway.get_accounts(Some(&token)).await.expect_err("403 must fail.");

	assert!(matches!(err, Error::AccountsRetrievalFailed(UpstreamError::Status { status: 403, .. })));
	assert_eq!(err.summary(), "Failed to fetch accounts");
	assert_eq!(err.details(), Some(json!("access revoked")));
}

#[tokio::test]
async fn malformed_success_body_maps_to_accounts_retrieval_failed() {
	let (gateway, _client) = build_recording_gateway(Credentials::BearerForward, 200, "<html>");
	let token = InboundToken::new("caller-token");
	let err = gateway.get_accounts(Some(&token)).await.expect_err("Non-JSON must fail.");

	assert!(matches!(
		err,
		Error::AccountsRetrievalFailed(UpstreamError::MalformedResponse { status: 200, .. })
	));
}
