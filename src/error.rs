//! Gateway-level error types shared across schemes, signers, operations, and the server.

// self
use crate::{_prelude::*, gateway::Operation};

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Caller input is malformed or incomplete.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// The active credential scheme needs an inbound bearer token that the caller omitted.
	#[error("Missing access token for the {operation} operation.")]
	MissingCredential {
		/// Operation that required the token.
		operation: Operation,
	},
	/// Local configuration or signing problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Upstream authenticate call failed.
	#[error("Authentication failed: {0}")]
	AuthenticationFailed(#[source] UpstreamError),
	/// Upstream accounts call failed.
	#[error("Failed to fetch accounts: {0}")]
	AccountsRetrievalFailed(#[source] UpstreamError),
	/// Upstream transfer call failed.
	#[error("Transfer failed: {0}")]
	TransferFailed(#[source] UpstreamError),
}
impl Error {
	/// Wraps an upstream failure in the variant owned by `operation`.
	pub fn upstream(operation: Operation, source: UpstreamError) -> Self {
		match operation {
			Operation::Authenticate => Self::AuthenticationFailed(source),
			Operation::Accounts => Self::AccountsRetrievalFailed(source),
			Operation::Transfer => Self::TransferFailed(source),
		}
	}

	/// HTTP status code presented to the gateway's caller.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::Validation(_) => 400,
			Self::MissingCredential { .. } => 401,
			Self::Config(_)
			| Self::AuthenticationFailed(_)
			| Self::AccountsRetrievalFailed(_)
			| Self::TransferFailed(_) => 500,
		}
	}

	/// Short human summary placed in the `error` field of error responses.
	pub fn summary(&self) -> &'static str {
		match self {
			Self::Validation(e) => e.summary(),
			Self::MissingCredential { .. } => "Missing access token",
			Self::Config(_) => "Gateway credential configuration error",
			Self::AuthenticationFailed(_) => "Authentication failed",
			Self::AccountsRetrievalFailed(_) => "Failed to fetch accounts",
			Self::TransferFailed(_) => "Transfer failed",
		}
	}

	/// Diagnostic payload placed in the `details` field of error responses, if any.
	pub fn details(&self) -> Option<JsonValue> {
		match self {
			Self::Validation(_) | Self::MissingCredential { .. } => None,
			Self::Config(e) => Some(JsonValue::String(e.to_string())),
			Self::AuthenticationFailed(e)
			| Self::AccountsRetrievalFailed(e)
			| Self::TransferFailed(e) => Some(e.details()),
		}
	}
}

/// Caller input failures detected before any upstream call.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// One of `routing_account`, `destination_account`, or `amount` is absent or empty.
	#[error("Transfer request is missing the `{field}` field.")]
	MissingTransactionData {
		/// First missing field.
		field: &'static str,
	},
	/// Transfer body is not a JSON object.
	#[error("Transfer request body is not valid JSON: {reason}.")]
	MalformedTransferBody {
		/// Parser-supplied reason string.
		reason: String,
	},
}
impl ValidationError {
	/// Short human summary placed in the `error` field of error responses.
	pub fn summary(&self) -> &'static str {
		"Missing required transaction data"
	}
}

/// Configuration failures; fatal at startup.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Upstream base URL or an endpoint derived from it is invalid.
	#[error("Upstream URL `{url}` is invalid.")]
	InvalidUpstreamUrl {
		/// Offending URL string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Upstream base URL cannot carry a path.
	#[error("Upstream base URL `{url}` cannot be used as a base.")]
	CannotBeABase {
		/// Offending URL string.
		url: String,
	},
	/// The selected scheme needs a field that is not configured.
	#[error("The {scheme} scheme requires `{field}` to be configured.")]
	MissingField {
		/// Scheme label.
		scheme: &'static str,
		/// Missing environment variable name.
		field: &'static str,
	},
	/// Fields belonging to different schemes are configured together.
	#[error("Credential fields for {first} and {second} are both configured.")]
	ConflictingCredentials {
		/// First scheme label.
		first: &'static str,
		/// Second scheme label.
		second: &'static str,
	},
	/// Upstream timeout is zero, which would fail every upstream call.
	#[error("UPSTREAM_TIMEOUT_SECS must be at least 1.")]
	ZeroUpstreamTimeout,
	/// Consumer secret cannot key the HMAC.
	#[error("Consumer secret cannot be used as an HMAC key: {reason}.")]
	InvalidHmacKey {
		/// Reason string.
		reason: String,
	},
	/// Private key material cannot be parsed as a JWK.
	#[error("Private key is not a valid JWK.")]
	MalformedPrivateKey {
		/// Underlying JOSE failure.
		#[source]
		source: josekit::JoseError,
	},
	/// Signing algorithm is unsupported or incompatible with the key.
	#[error("Signing algorithm `{algorithm}` cannot be used: {reason}.")]
	UnsupportedAlgorithm {
		/// Algorithm label.
		algorithm: String,
		/// Reason string.
		reason: String,
	},
	/// Assertion signing failed after the signer was built.
	#[error("Assertion signing failed.")]
	Signing {
		/// Underlying JOSE failure.
		#[source]
		source: josekit::JoseError,
	},
	/// Listening socket could not be bound.
	#[error("Failed to bind {address}.")]
	Bind {
		/// Address string.
		address: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failure outcome of one upstream call.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Upstream answered with a non-2xx status.
	#[error("upstream returned HTTP {status}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Upstream body (JSON when parseable, otherwise the raw text).
		body: JsonValue,
	},
	/// Upstream answered 2xx with a body that is not JSON.
	#[error("upstream returned malformed JSON (HTTP {status})")]
	MalformedResponse {
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Upstream could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl UpstreamError {
	/// HTTP status reported by upstream, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } | Self::MalformedResponse { status, .. } => Some(*status),
			Self::Transport(_) => None,
		}
	}

	/// Upstream payload or error message suitable for the `details` response field.
	pub fn details(&self) -> JsonValue {
		match self {
			Self::Status { body, .. } => body.clone(),
			Self::MalformedResponse { source, .. } => JsonValue::String(source.to_string()),
			Self::Transport(e) => JsonValue::String(e.to_string()),
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the banking API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The call exceeded the configured upstream timeout.
	#[error("Banking API did not respond before the timeout.")]
	Timeout,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}
