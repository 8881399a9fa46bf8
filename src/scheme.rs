//! Credential schemes: the pluggable piece that turns one gateway operation into the
//! authorization material the upstream banking API currently demands.
//!
//! Exactly one scheme is active per deployment. It is chosen once at startup from the
//! configured [`Credentials`] and shared behind `Arc<dyn CredentialScheme>`, so
//! [`BankingGateway`](crate::gateway::BankingGateway) never branches on the scheme itself.

pub mod api_key;
pub mod assertion;
pub mod bearer;
pub mod oauth1;

pub use api_key::*;
pub use assertion::*;
pub use bearer::*;
pub use oauth1::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, InboundToken, SchemeKind},
	error::ConfigError,
	gateway::{Operation, UpstreamTarget},
};

/// Upstream path of the OAuth 1.0a style initiate endpoint.
pub const INITIATE_PATH: &str = "/oauth/initiate";
/// Upstream path of the OAuth 2.0 style authenticate endpoint.
pub const AUTHENTICATE_PATH: &str = "/oauth2/authenticate";

/// Produces outbound authorization material for gateway operations.
///
/// Implementations must not mutate shared state; the only per-call values they may
/// generate are ephemeral nonces, timestamps, and assertions.
pub trait CredentialScheme
where
	Self: Debug + Send + Sync,
{
	/// Stable scheme label.
	fn kind(&self) -> SchemeKind;

	/// Upstream path used by the authenticate operation.
	fn authenticate_path(&self) -> &'static str {
		AUTHENTICATE_PATH
	}

	/// Whether `operation` fails with [`Error::MissingCredential`] when the caller sends no
	/// bearer token.
	fn requires_inbound_token(&self, operation: Operation) -> bool;

	/// Builds the headers and body fields that authorize a call to `target`.
	fn prepare_auth(
		&self,
		target: &UpstreamTarget,
		inbound: Option<&InboundToken>,
	) -> Result<AuthArtifact>;
}

/// Selects and builds the scheme matching `credentials`.
///
/// Key material is parsed here so malformed keys fail at startup.
pub fn from_credentials(
	credentials: Credentials,
	upstream_base_url: &Url,
) -> Result<Arc<dyn CredentialScheme>, ConfigError> {
	let scheme: Arc<dyn CredentialScheme> = match credentials {
		Credentials::OAuth1Signed { consumer_key, consumer_secret, callback_url } =>
			Arc::new(OAuth1Signed::new(consumer_key, consumer_secret, callback_url)),
		Credentials::OAuth2Assertion { key_id, private_key, algorithm, mode } =>
			Arc::new(OAuth2Assertion::new(key_id, &private_key, algorithm, mode, upstream_base_url)?),
		Credentials::BearerForward => Arc::new(BearerForward),
		Credentials::ApiKeyHeaders { consumer_key, consumer_secret } =>
			Arc::new(ApiKeyHeaders::new(consumer_key, consumer_secret)),
	};

	Ok(scheme)
}

/// Authorization material attached to one outbound request.
///
/// Built per call and never cached.
#[derive(Clone, Default, PartialEq)]
pub struct AuthArtifact {
	/// Headers to add to the request.
	pub headers: BTreeMap<String, String>,
	/// Fields to merge into the JSON request body.
	pub body: JsonMap<String, JsonValue>,
}
impl AuthArtifact {
	/// Adds a header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Adds a body field.
	pub fn with_body_field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.body.insert(name.into(), value.into());

		self
	}

	/// Whether the artifact carries nothing.
	pub fn is_empty(&self) -> bool {
		self.headers.is_empty() && self.body.is_empty()
	}
}
impl Debug for AuthArtifact {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthArtifact")
			.field("headers", &self.headers.keys().collect::<Vec<_>>())
			.field("body", &self.body.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Forwards the caller's bearer token, failing when `required` and absent.
pub(crate) fn forward_bearer(
	operation: Operation,
	inbound: Option<&InboundToken>,
	required: bool,
) -> Result<AuthArtifact> {
	match inbound {
		Some(token) => Ok(AuthArtifact::default().with_header("Authorization", token.bearer_header())),
		None if required => Err(Error::MissingCredential { operation }),
		None => Ok(AuthArtifact::default()),
	}
}
