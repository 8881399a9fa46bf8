// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use open_banking_gateway::{
	_preludet::*,
	auth::{Credentials, InboundToken, Secret},
	error::{UpstreamError, ValidationError},
	gateway::TransferRequest,
};

fn api_key_credentials() -> Credentials {
	Credentials::ApiKeyHeaders {
		consumer_key: "consumer-key".into(),
		consumer_secret: Secret::new("consumer-secret"),
	}
}

#[tokio::test]
async fn transfer_forwards_values_unchanged_in_one_call() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url(), api_key_credentials());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/transfer")
				.header("Consumer-Key", "consumer-key")
				.header("Consumer-Secret", "consumer-secret")
				.json_body(json!({
					"routing_account": "ACC-001",
					"destination_account": "ACC-002",
					"amount": "-12.50",
				}));
			then.status(200).json_body(json!({ "transaction_id": "tx-42", "status": "booked" }));
		})
		.await;
	let response = gateway
		.transfer(None, TransferRequest::new("ACC-001", "ACC-002", "-12.50"))
		.await
		.expect("Transfer should succeed.");

	assert!(response.success);
	assert_eq!(response.transaction_id, json!("tx-42"));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn incomplete_transfer_never_reaches_upstream() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url(), Credentials::BearerForward);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/transfer");
			then.status(200).json_body(json!({ "transaction_id": "never" }));
		})
		.await;
	let request = TransferRequest { amount: None, ..TransferRequest::new("ACC-001", "ACC-002", 10) };
	let token = InboundToken::new("caller-token");
	let err = gateway
		.transfer(Some(&token), request)
		.await
		.expect_err("Missing amount must be rejected.");

	assert!(matches!(
		err,
		Error::Validation(ValidationError::MissingTransactionData { field: "amount" })
	));
	assert_eq!(err.status_code(), 400);

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn validation_runs_before_the_token_check() {
	let (gateway, client) =
		build_recording_gateway(Credentials::BearerForward, 200, "{\"transaction_id\":\"x\"}");
	let err = gateway
		.transfer(None, TransferRequest::new("", "ACC-002", 10))
		.await
		.expect_err("Empty routing account must be rejected.");

	assert_eq!(err.status_code(), 400);
	assert!(client.requests().is_empty());
}

#[tokio::test]
async fn bearer_transfer_without_token_is_unauthorized() {
	let (gateway, client) =
		build_recording_gateway(Credentials::BearerForward, 200, "{\"transaction_id\":\"x\"}");
	let err = gateway
		.transfer(None, TransferRequest::new("ACC-001", "ACC-002", 10))
		.await
		.expect_err("Bearer transfer without a token must fail.");

	assert!(matches!(err, Error::MissingCredential { .. }));
	assert_eq!(err.status_code(), 401);
	assert!(client.requests().is_empty());
}

#[tokio::test]
async fn bearer_transfer_forwards_the_caller_token() {
	let (gateway, client) =
		build_recording_gateway(Credentials::BearerForward, 201, "{\"transaction_id\":7}");
	let token = InboundToken::new("caller-token");
	let response = gateway
		.transfer(Some(&token), TransferRequest::new("ACC-001", "ACC-002", 10))
		.await
		.expect("Transfer should succeed.");
	let requests = client.requests();

	assert_eq!(response.transaction_id, json!(7));
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].header("Authorization"), Some("Bearer caller-token"));
	assert_eq!(
		requests[0].body,
		Some(json!({ "routing_account": "ACC-001", "destination_account": "ACC-002", "amount": 10 }))
	);
}

#[tokio::test]
async fn missing_transaction_id_becomes_null() {
	let (gateway, _client) = build_recording_gateway(api_key_credentials(), 200, "{}");
	let response = gateway
		.transfer(None, TransferRequest::new("ACC-001", "ACC-002", 10))
		.await
		.expect("Transfer should succeed.");

	assert_eq!(response.transaction_id, JsonValue::Null);
}

#[tokio::test]
async fn upstream_failure_maps_to_transfer_failed_with_details() {
	let server = MockServer::start_async().await;
	let gateway = build_reqwest_test_gateway(&server.base_url(), api_key_credentials());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/transfer");
			then.status(500).json_body(json!({ "error": "insufficient_funds" }));
		})
		.await;
	let err = gateway
		.transfer(None, TransferRequest::new("ACC-001", "ACC-002", 1_000_000))
		.await
		.expect_err("Upstream failure must surface.");

	assert!(matches!(err, Error::TransferFailed(UpstreamError::Status { status: 500, .. })));
	assert_eq!(err.status_code(), 500);
	assert_eq!(err.summary(), "Transfer failed");
	assert_eq!(err.details(), Some(json!({ "error": "insufficient_funds" })));

	mock.assert_calls_async(1).await;
}
