//! Scheme-agnostic orchestration of the three banking operations.
//!
//! Every operation validates its input, asks the active [`CredentialScheme`] for
//! authorization material, performs exactly one upstream call, and folds the outcome into
//! either a response value or an operation-specific [`Error`]. Nothing is cached and
//! nothing is retried.

mod accounts;
mod authenticate;
mod transfer;

pub use authenticate::*;
pub use transfer::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, InboundToken},
	error::{ConfigError, UpstreamError},
	http::{UpstreamHttpClient, UpstreamMethod, UpstreamRequest, UpstreamResponse},
	obs::{self, OperationOutcome, OperationSpan},
	scheme::{self, CredentialScheme},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = BankingGateway<ReqwestHttpClient>;

/// Operations exposed by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Obtain upstream access.
	Authenticate,
	/// List accounts.
	Accounts,
	/// Move funds between accounts.
	Transfer,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Authenticate => "authenticate",
			Operation::Accounts => "accounts",
			Operation::Transfer => "transfer",
		}
	}

	/// HTTP method used for the upstream call.
	pub const fn method(self) -> UpstreamMethod {
		match self {
			Operation::Accounts => UpstreamMethod::Get,
			Operation::Authenticate | Operation::Transfer => UpstreamMethod::Post,
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved destination of one upstream call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamTarget {
	/// Operation being served.
	pub operation: Operation,
	/// HTTP method.
	pub method: UpstreamMethod,
	/// Absolute URL.
	pub url: Url,
}

/// Upstream URLs resolved once from the base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamEndpoints {
	/// Authenticate (or initiate) endpoint.
	pub authenticate: Url,
	/// Accounts endpoint.
	pub accounts: Url,
	/// Transfer endpoint.
	pub transfer: Url,
}
impl UpstreamEndpoints {
	/// Accounts path relative to the base URL.
	pub const ACCOUNTS_PATH: &str = "/accounts";
	/// Transfer path relative to the base URL.
	pub const TRANSFER_PATH: &str = "/transfer";

	/// Appends each path to `base`, keeping any path prefix the base already carries.
	pub fn resolve(base: &Url, authenticate_path: &str) -> Result<Self, ConfigError> {
		Ok(Self {
			authenticate: append_path(base, authenticate_path)?,
			accounts: append_path(base, Self::ACCOUNTS_PATH)?,
			transfer: append_path(base, Self::TRANSFER_PATH)?,
		})
	}

	/// Target for `operation`.
	pub fn target(&self, operation: Operation) -> UpstreamTarget {
		let url = match operation {
			Operation::Authenticate => &self.authenticate,
			Operation::Accounts => &self.accounts,
			Operation::Transfer => &self.transfer,
		};

		UpstreamTarget { operation, method: operation.method(), url: url.clone() }
	}
}

/// Coordinates banking operations against a single upstream with one credential scheme.
///
/// All fields are immutable after construction, so one gateway is shared by every
/// concurrent request without locking.
#[derive(Clone)]
pub struct BankingGateway<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// HTTP client used for every upstream call.
	pub http_client: Arc<C>,
	/// Active credential scheme.
	pub scheme: Arc<dyn CredentialScheme>,
	/// Resolved upstream endpoints.
	pub endpoints: UpstreamEndpoints,
}
impl<C> BankingGateway<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Builds the scheme matching `credentials` and resolves endpoints under `base_url`.
	pub fn new(
		base_url: Url,
		credentials: Credentials,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		let scheme = scheme::from_credentials(credentials, &base_url)?;

		Self::with_scheme(base_url, scheme, http_client)
	}

	/// Uses a caller-provided scheme.
	pub fn with_scheme(
		base_url: Url,
		scheme: Arc<dyn CredentialScheme>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		let endpoints = UpstreamEndpoints::resolve(&base_url, scheme.authenticate_path())?;

		Ok(Self { http_client: http_client.into(), scheme, endpoints })
	}

	/// Runs `fut` inside an operation span and records its outcome.
	async fn observe<T, Fut>(&self, operation: Operation, fut: Fut) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		let span = OperationSpan::new(operation, self.scheme.kind());

		obs::record_operation_outcome(operation, OperationOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_operation_outcome(operation, OperationOutcome::Success),
			Err(e) => {
				tracing::warn!(%operation, status = e.status_code(), error = %e, "Operation failed.");
				obs::record_operation_outcome(operation, OperationOutcome::Failure)
			},
		}

		result
	}

	/// Resolves authorization material, performs the single upstream call, and decodes it.
	async fn call_upstream(
		&self,
		operation: Operation,
		inbound: Option<&InboundToken>,
		mut body: JsonMap<String, JsonValue>,
	) -> Result<JsonValue> {
		let target = self.endpoints.target(operation);
		let artifact = self.scheme.prepare_auth(&target, inbound)?;

		body.extend(artifact.body);

		let body = match target.method {
			UpstreamMethod::Post => Some(JsonValue::Object(body)),
			UpstreamMethod::Get if body.is_empty() => None,
			UpstreamMethod::Get => Some(JsonValue::Object(body)),
		};
		let request = UpstreamRequest {
			method: target.method,
			url: target.url,
			headers: artifact.headers,
			body,
		};

		tracing::debug!(method = %request.method, url = %request.url, "Dispatching upstream call.");

		let response = self
			.http_client
			.send(request)
			.await
			.map_err(|e| Error::upstream(operation, e.into()))?;

		decode_response(response).map_err(|e| Error::upstream(operation, e))
	}
}
impl<C> Debug for BankingGateway<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BankingGateway")
			.field("scheme", &self.scheme.kind())
			.field("endpoints", &self.endpoints)
			.finish()
	}
}

/// Splits an upstream response into a JSON payload or an [`UpstreamError`].
///
/// Non-2xx bodies that are not JSON are kept as text so callers still see them.
pub fn decode_response(response: UpstreamResponse) -> Result<JsonValue, UpstreamError> {
	let status = response.status;

	if !response.is_success() {
		let body = serde_json::from_slice(&response.body).unwrap_or_else(|_| {
			JsonValue::String(String::from_utf8_lossy(&response.body).into_owned())
		});

		return Err(UpstreamError::Status { status, body });
	}
	if response.body.iter().all(u8::is_ascii_whitespace) {
		return Ok(JsonValue::Null);
	}

	let mut de = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| UpstreamError::MalformedResponse { status, source })
}

fn append_path(base: &Url, path: &str) -> Result<Url, ConfigError> {
	if base.cannot_be_a_base() {
		return Err(ConfigError::CannotBeABase { url: base.to_string() });
	}

	let mut url = base.clone();
	let joined = format!("{}{path}", base.path().trim_end_matches('/'));

	url.set_path(&joined);

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn endpoints_keep_base_path_prefix() {
		let base = Url::parse("https://sandbox.bank.example/api/v1/").expect("Base should parse.");
		let endpoints = UpstreamEndpoints::resolve(&base, scheme::INITIATE_PATH)
			.expect("Endpoints should resolve.");

		assert_eq!(endpoints.authenticate.as_str(), "https://sandbox.bank.example/api/v1/oauth/initiate");
		assert_eq!(endpoints.accounts.as_str(), "https://sandbox.bank.example/api/v1/accounts");
		assert_eq!(endpoints.transfer.as_str(), "https://sandbox.bank.example/api/v1/transfer");
		assert_eq!(endpoints.target(Operation::Accounts).method, UpstreamMethod::Get);
	}

	#[test]
	fn endpoints_reject_non_base_urls() {
		let base = Url::parse("mailto:ops@bank.example").expect("Mailto URL should parse.");

		assert!(matches!(
			UpstreamEndpoints::resolve(&base, scheme::AUTHENTICATE_PATH),
			Err(ConfigError::CannotBeABase { .. })
		));
	}

	#[test]
	fn failure_bodies_are_kept_as_json_or_text() {
		let json = decode_response(UpstreamResponse { status: 500, body: b"{\"error\":\"x\"}".to_vec() })
			.expect_err("500 must fail.");
		let text = decode_response(UpstreamResponse { status: 503, body: b"down".to_vec() })
			.expect_err("503 must fail.");

		assert!(matches!(json, UpstreamError::Status { status: 500, ref body } if body["error"] == "x"));
		assert!(matches!(text, UpstreamError::Status { status: 503, ref body } if body == "down"));
	}

	#[test]
	fn malformed_success_bodies_are_reported() {
		let err = decode_response(UpstreamResponse { status: 200, body: b"<html>".to_vec() })
			.expect_err("Non-JSON success must fail.");

		assert!(matches!(err, UpstreamError::MalformedResponse { status: 200, .. }));
		assert_eq!(
			decode_response(UpstreamResponse { status: 204, body: Vec::new() })
				.expect("Empty success is null."),
			JsonValue::Null
		);
	}
}
