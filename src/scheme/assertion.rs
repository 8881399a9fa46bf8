//! OAuth 2.0 client credentials backed by a signed JWS assertion.

// self
use crate::{
	_prelude::*,
	auth::{AssertionMode, InboundToken, SchemeKind, Secret, SigningAlgorithm},
	error::ConfigError,
	gateway::{Operation, UpstreamTarget},
	scheme::{self, AuthArtifact, CredentialScheme},
	signing::AssertionSigner,
};

/// Header carrying a self-signed assertion on accounts and transfer calls.
pub const JWS_AUTHORIZATION_HEADER: &str = "JWS-Authorization";

/// Sends a fresh `assertion` body field to the authenticate endpoint.
///
/// Accounts and transfer depend on the [`AssertionMode`]: `SelfSigned` attaches a fresh
/// assertion in the [`JWS_AUTHORIZATION_HEADER`] header, `ForwardBearer` forwards the
/// caller's bearer token instead.
#[derive(Debug)]
pub struct OAuth2Assertion {
	signer: AssertionSigner,
	mode: AssertionMode,
}
impl OAuth2Assertion {
	/// Builds the scheme, parsing the private key immediately.
	pub fn new(
		key_id: impl Into<String>,
		private_key: &Secret,
		algorithm: SigningAlgorithm,
		mode: AssertionMode,
		audience: &Url,
	) -> Result<Self, ConfigError> {
		Ok(Self { signer: AssertionSigner::new(key_id, private_key, algorithm, audience)?, mode })
	}

	/// Active accounts/transfer mode.
	pub fn mode(&self) -> AssertionMode {
		self.mode
	}
}
impl CredentialScheme for OAuth2Assertion {
	fn kind(&self) -> SchemeKind {
		SchemeKind::OAuth2Assertion
	}

	fn requires_inbound_token(&self, operation: Operation) -> bool {
		self.mode == AssertionMode::ForwardBearer && operation != Operation::Authenticate
	}

	fn prepare_auth(
		&self,
		target: &UpstreamTarget,
		inbound: Option<&InboundToken>,
	) -> Result<AuthArtifact> {
		match (target.operation, self.mode) {
			(Operation::Authenticate, _) =>
				Ok(AuthArtifact::default().with_body_field("assertion", self.signer.issue()?)),
			(_, AssertionMode::SelfSigned) => Ok(AuthArtifact::default()
				.with_header(JWS_AUTHORIZATION_HEADER, self.signer.issue()?)),
			(operation, AssertionMode::ForwardBearer) => scheme::forward_bearer(operation, inbound, true),
		}
	}
}
