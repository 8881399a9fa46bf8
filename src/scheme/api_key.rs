//! Static consumer key/secret credentials.

// self
use crate::{
	_prelude::*,
	auth::{InboundToken, SchemeKind, Secret},
	gateway::{Operation, UpstreamTarget},
	scheme::{AuthArtifact, CredentialScheme, INITIATE_PATH},
};

/// Header carrying the consumer key.
pub const CONSUMER_KEY_HEADER: &str = "Consumer-Key";
/// Header carrying the consumer secret.
pub const CONSUMER_SECRET_HEADER: &str = "Consumer-Secret";

/// Sends the consumer pair as body fields on the initiate call and as headers elsewhere.
#[derive(Debug)]
pub struct ApiKeyHeaders {
	consumer_key: String,
	consumer_secret: Secret,
}
impl ApiKeyHeaders {
	/// Creates the scheme from its consumer pair.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: Secret) -> Self {
		Self { consumer_key: consumer_key.into(), consumer_secret }
	}
}
impl CredentialScheme for ApiKeyHeaders {
	fn kind(&self) -> SchemeKind {
		SchemeKind::ApiKeyHeaders
	}

	fn authenticate_path(&self) -> &'static str {
		INITIATE_PATH
	}

	fn requires_inbound_token(&self, _operation: Operation) -> bool {
		false
	}

	fn prepare_auth(
		&self,
		target: &UpstreamTarget,
		_inbound: Option<&InboundToken>,
	) -> Result<AuthArtifact> {
		let artifact = match target.operation {
			Operation::Authenticate => AuthArtifact::default()
				.with_body_field("consumer_key", self.consumer_key.as_str())
				.with_body_field("consumer_secret", self.consumer_secret.expose()),
			Operation::Accounts | Operation::Transfer => AuthArtifact::default()
				.with_header(CONSUMER_KEY_HEADER, self.consumer_key.as_str())
				.with_header(CONSUMER_SECRET_HEADER, self.consumer_secret.expose()),
		};

		Ok(artifact)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::http::UpstreamMethod;

	fn target(operation: Operation) -> UpstreamTarget {
		UpstreamTarget {
			operation,
			method: UpstreamMethod::Get,
			url: Url::parse("https://sandbox.bank.example/accounts").expect("URL should parse."),
		}
	}

	#[test]
	fn initiate_carries_body_fields_and_other_calls_carry_headers() {
		let scheme = ApiKeyHeaders::new("key", Secret::new("secret"));
		let auth = scheme
			.prepare_auth(&target(Operation::Authenticate), None)
			.expect("Authenticate material should build.");
		let accounts = scheme
			.prepare_auth(&target(Operation::Accounts), None)
			.expect("Accounts material should build without a token.");

		assert!(auth.headers.is_empty());
		assert_eq!(auth.body.get("consumer_key"), Some(&JsonValue::from("key")));
		assert_eq!(auth.body.get("consumer_secret"), Some(&JsonValue::from("secret")));
		assert!(accounts.body.is_empty());
		assert_eq!(accounts.headers.get(CONSUMER_KEY_HEADER).map(String::as_str), Some("key"));
		assert_eq!(accounts.headers.get(CONSUMER_SECRET_HEADER).map(String::as_str), Some("secret"));
	}
}
