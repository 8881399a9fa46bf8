//! Transport primitives for upstream banking calls.
//!
//! The gateway depends on the upstream HTTP stack only through [`UpstreamHttpClient`]:
//! send a method, URL, headers, and optional JSON body; receive a status plus raw body,
//! or a [`TransportError`]. Requests and responses are crate-owned types so schemes and
//! operations never see reqwest structures. No retries happen at this layer.

pub use crate::error::TransportError;

// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
	redirect::Policy,
};
// self
use crate::_prelude::*;

/// Boxed future returned by [`UpstreamHttpClient::send`].
pub type UpstreamFuture<'a> =
	Pin<Box<dyn Future<Output = Result<UpstreamResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports able to reach the upstream banking API.
///
/// Implementations must be `Send + Sync + 'static` so one instance can be shared by every
/// concurrent request, and the returned future must be `Send` so server handlers can hop
/// executors.
pub trait UpstreamHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Dispatches one request and resolves with whatever status upstream returned.
	fn send(&self, request: UpstreamRequest) -> UpstreamFuture<'_>;
}

/// HTTP methods used against the banking API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpstreamMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
}
impl UpstreamMethod {
	/// Returns the method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			UpstreamMethod::Get => "GET",
			UpstreamMethod::Post => "POST",
		}
	}
}
impl Display for UpstreamMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outbound request built by the gateway.
#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamRequest {
	/// HTTP method.
	pub method: UpstreamMethod,
	/// Absolute upstream URL.
	pub url: Url,
	/// Extra headers (authorization material included).
	pub headers: BTreeMap<String, String>,
	/// JSON body, if any.
	pub body: Option<JsonValue>,
}
impl UpstreamRequest {
	/// Returns the header value named `name` (case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
	}
}

/// Raw upstream response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl UpstreamResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Redirects are not followed and every call is bounded by the configured timeout.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that gives up on upstream calls after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.timeout(timeout.unsigned_abs())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl UpstreamHttpClient for ReqwestHttpClient {
	fn send(&self, request: UpstreamRequest) -> UpstreamFuture<'_> {
		Box::pin(async move {
			let method = match request.method {
				UpstreamMethod::Get => reqwest::Method::GET,
				UpstreamMethod::Post => reqwest::Method::POST,
			};
			let mut headers = HeaderMap::new();

			for (name, value) in &request.headers {
				let name = HeaderName::from_bytes(name.as_bytes()).map_err(TransportError::network)?;
				let value = HeaderValue::from_str(value).map_err(TransportError::network)?;

				headers.insert(name, value);
			}

			let mut builder = self.0.request(method, request.url).headers(headers);

			if let Some(body) = &request.body {
				let bytes = serde_json::to_vec(body).map_err(TransportError::network)?;

				builder = builder.header(CONTENT_TYPE, "application/json").body(bytes);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(UpstreamResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn header_lookup_ignores_case() {
		let request = UpstreamRequest {
			method: UpstreamMethod::Get,
			url: Url::parse("https://bank.example/accounts").expect("Test URL should parse."),
			headers: BTreeMap::from([("Authorization".into(), "Bearer t".into())]),
			body: None,
		};

		assert_eq!(request.header("authorization"), Some("Bearer t"));
		assert_eq!(request.header("Consumer-Key"), None);
	}

	#[test]
	fn only_2xx_counts_as_success() {
		let ok = UpstreamResponse { status: 204, body: Vec::new() };
		let redirect = UpstreamResponse { status: 302, body: Vec::new() };

		assert!(ok.is_success());
		assert!(!redirect.is_success());
	}
}
