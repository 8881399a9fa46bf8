//! OAuth 1.0a signed initiate call; bearer forwarding everywhere else.

// self
use crate::{
	_prelude::*,
	auth::{InboundToken, SchemeKind, Secret},
	error::ConfigError,
	gateway::{Operation, UpstreamTarget},
	scheme::{self, AuthArtifact, CredentialScheme, INITIATE_PATH},
	signing::{self, OAUTH1_SIGNATURE_METHOD, SignatureInput},
};

/// Signs the authenticate call with HMAC-SHA256 and forwards the caller's bearer token on
/// accounts and transfer calls (which are never signed).
#[derive(Debug)]
pub struct OAuth1Signed {
	consumer_key: String,
	consumer_secret: Secret,
	callback_url: Url,
}
impl OAuth1Signed {
	/// Creates the scheme from its consumer pair and callback URI.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: Secret, callback_url: Url) -> Self {
		Self { consumer_key: consumer_key.into(), consumer_secret, callback_url }
	}

	/// Builds the signed OAuth fields for `target` using a caller-chosen nonce and timestamp.
	pub fn signed_fields(
		&self,
		target: &UpstreamTarget,
		timestamp: i64,
		nonce: &str,
	) -> Result<AuthArtifact, ConfigError> {
		let input = SignatureInput {
			method: target.method.as_str(),
			url: target.url.as_str(),
			timestamp,
			nonce,
			consumer_key: &self.consumer_key,
			callback_url: self.callback_url.as_str(),
		};
		let signature = signing::sign(&input, self.consumer_secret.expose())?;

		Ok(AuthArtifact::default()
			.with_body_field("oauth_consumer_key", self.consumer_key.as_str())
			.with_body_field("oauth_nonce", nonce)
			.with_body_field("oauth_signature_method", OAUTH1_SIGNATURE_METHOD)
			.with_body_field("oauth_timestamp", timestamp.to_string())
			.with_body_field("oauth_callback", self.callback_url.as_str())
			.with_body_field("oauth_signature", signature))
	}
}
impl CredentialScheme for OAuth1Signed {
	fn kind(&self) -> SchemeKind {
		SchemeKind::OAuth1Signed
	}

	fn authenticate_path(&self) -> &'static str {
		INITIATE_PATH
	}

	fn requires_inbound_token(&self, operation: Operation) -> bool {
		operation != Operation::Authenticate
	}

	fn prepare_auth(
		&self,
		target: &UpstreamTarget,
		inbound: Option<&InboundToken>,
	) -> Result<AuthArtifact> {
		match target.operation {
			Operation::Authenticate => self
				.signed_fields(target, signing::current_timestamp(), &signing::generate_nonce())
				.map_err(Error::from),
			operation =>
				scheme::forward_bearer(operation, inbound, self.requires_inbound_token(operation)),
		}
	}
}
