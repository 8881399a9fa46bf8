//! Open Banking gateway exposing authenticate, list accounts, and transfer funds while the
//! upstream credential scheme (OAuth 1.0a request signing, JWS client assertions, bearer
//! forwarding, or raw API-key headers) stays a deployment detail.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod obs;
pub mod scheme;
pub mod server;
pub mod signing;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports, key fixtures, and fake transports for tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use parking_lot::Mutex;
	// self
	use crate::{
		auth::Credentials,
		gateway::BankingGateway,
		http::{
			TransportError, UpstreamFuture, UpstreamHttpClient, UpstreamRequest, UpstreamResponse,
		},
	};
	#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

	/// P-521 private key in JWK form, usable with `ES512`.
	pub const TEST_P521_JWK: &str = r#"{"kty":"EC","crv":"P-521","x":"AZz4ORQAs-x4hew1y7Nng1gl2WSu-XfFRmSi1zUgXmcCA7j4yaztUnhXb1Rrf2_HQV1wIwv8IuRFKIh9PjeF4Ay_","y":"AG9bzklVZKVL6zaPOgcpTF14F4RIuNXmNcjrYdXKRRvhPXg01sQmpC0GmZ4SVYZ5XnWxR903xM9DcoKpltcrVAkX","d":"AXzOkqfGCo6HrqHEh7omZizrnBTAKL-SIYoYbtTTKqpkd2R0q2mTrArgvpWhBCOq0xGU1-FowQZyqVQHkUZ68rL0"}"#;
	/// P-256 private key in JWK form, usable with `ES256`.
	pub const TEST_P256_JWK: &str = r#"{"kty":"EC","crv":"P-256","x":"MLuAeAlK_IbaYT53Jky6ky2XFl6_SGvxT9d8-buS0yQ","y":"O1yFQTJjX8fYNJ5QnGdAFH3fTB3vmFgUwZos0ftxA8w","d":"h6w5bW_8sH4tN_AtcT4uuU526nG6rZeNLUSvoQBqhSk"}"#;

	/// Gateway type alias used by reqwest-backed integration tests.
	#[cfg(feature = "reqwest")]
	pub type ReqwestTestGateway = BankingGateway<ReqwestHttpClient>;

	/// Builds a reqwest-backed gateway pointed at `base_url` (typically an `httpmock` server).
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_gateway(base_url: &str, credentials: Credentials) -> ReqwestTestGateway {
		let base_url = Url::parse(base_url).expect("Failed to parse test upstream base URL.");
		let http_client = ReqwestHttpClient::with_timeout(Duration::seconds(5))
			.expect("Failed to build Reqwest client for tests.");

		BankingGateway::new(base_url, credentials, http_client)
			.expect("Failed to build gateway for tests.")
	}

	/// Builds a gateway backed by a [`RecordingHttpClient`] that answers every call with
	/// `status` + `body`.
	pub fn build_recording_gateway(
		credentials: Credentials,
		status: u16,
		body: &str,
	) -> (BankingGateway<RecordingHttpClient>, Arc<RecordingHttpClient>) {
		let base_url =
			Url::parse("https://sandbox.bank.example/api").expect("Failed to parse test base URL.");
		let client = Arc::new(RecordingHttpClient::answering(status, body));
		let gateway = BankingGateway::new(base_url, credentials, client.clone())
			.expect("Failed to build recording gateway for tests.");

		(gateway, client)
	}

	/// Fake transport that records every outbound request and replies with a canned response.
	#[derive(Debug, Default)]
	pub struct RecordingHttpClient {
		requests: Mutex<Vec<UpstreamRequest>>,
		reply: Option<UpstreamResponse>,
	}
	impl RecordingHttpClient {
		/// Replies to every request with `status` and `body`.
		pub fn answering(status: u16, body: &str) -> Self {
			Self {
				requests: Default::default(),
				reply: Some(UpstreamResponse { status, body: body.as_bytes().to_vec() }),
			}
		}

		/// Fails every request with a timeout.
		pub fn timing_out() -> Self {
			Self::default()
		}

		/// Returns every request dispatched so far.
		pub fn requests(&self) -> Vec<UpstreamRequest> {
			self.requests.lock().clone()
		}
	}
	impl UpstreamHttpClient for RecordingHttpClient {
		fn send(&self, request: UpstreamRequest) -> UpstreamFuture<'_> {
			self.requests.lock().push(request);

			let reply = self.reply.clone();

			Box::pin(async move { reply.ok_or(TransportError::Timeout) })
		}
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(not(feature = "reqwest"))] use tokio as _;
#[cfg(test)] use {http_body_util as _, httpmock as _, tower as _};
