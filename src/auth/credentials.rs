//! Process-wide credential sets, one shape per credential scheme.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Credential scheme labels, used for selection, logging, and metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SchemeKind {
	/// OAuth 1.0a request signing (HMAC-SHA256).
	#[value(name = "oauth1")]
	OAuth1Signed,
	/// OAuth 2.0 client credentials with a signed JWS assertion.
	#[value(name = "oauth2-assertion")]
	OAuth2Assertion,
	/// Caller-supplied bearer token forwarded verbatim.
	#[value(name = "bearer-forward")]
	BearerForward,
	/// Static consumer key/secret headers.
	#[value(name = "api-key")]
	ApiKeyHeaders,
}
impl SchemeKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SchemeKind::OAuth1Signed => "oauth1",
			SchemeKind::OAuth2Assertion => "oauth2-assertion",
			SchemeKind::BearerForward => "bearer-forward",
			SchemeKind::ApiKeyHeaders => "api-key",
		}
	}
}
impl Display for SchemeKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// JWS algorithms accepted for client assertions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
	/// ECDSA over P-256 with SHA-256.
	Es256,
	/// ECDSA over P-384 with SHA-384.
	Es384,
	#[default]
	/// ECDSA over P-521 with SHA-512.
	Es512,
	/// Ed25519 signatures.
	EdDsa,
}
impl SigningAlgorithm {
	/// Returns the JOSE `alg` identifier.
	pub const fn as_str(self) -> &'static str {
		match self {
			SigningAlgorithm::Es256 => "ES256",
			SigningAlgorithm::Es384 => "ES384",
			SigningAlgorithm::Es512 => "ES512",
			SigningAlgorithm::EdDsa => "EdDSA",
		}
	}
}
impl Display for SigningAlgorithm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SigningAlgorithm {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			v if v.eq_ignore_ascii_case("ES256") => Ok(Self::Es256),
			v if v.eq_ignore_ascii_case("ES384") => Ok(Self::Es384),
			v if v.eq_ignore_ascii_case("ES512") => Ok(Self::Es512),
			v if v.eq_ignore_ascii_case("EdDSA") => Ok(Self::EdDsa),
			other => Err(ConfigError::UnsupportedAlgorithm {
				algorithm: other.to_owned(),
				reason: "expected one of ES256, ES384, ES512, EdDSA".into(),
			}),
		}
	}
}

/// How the assertion scheme authorizes accounts and transfer calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AssertionMode {
	/// Every outbound call carries a fresh `JWS-Authorization` assertion.
	#[default]
	SelfSigned,
	/// Accounts and transfer calls forward the caller's bearer token.
	ForwardBearer,
}

/// Immutable credential set loaded once at startup.
///
/// Each variant carries exactly the fields its scheme needs, so the active scheme and the
/// populated fields cannot disagree.
#[derive(Clone, Debug)]
pub enum Credentials {
	/// OAuth 1.0a consumer pair plus the callback announced on `/oauth/initiate`.
	OAuth1Signed {
		/// Consumer key.
		consumer_key: String,
		/// Consumer secret used as the HMAC key.
		consumer_secret: Secret,
		/// OAuth callback URI.
		callback_url: Url,
	},
	/// JWK private key used to sign client assertions.
	OAuth2Assertion {
		/// Key identifier used as issuer and `kid`.
		key_id: String,
		/// Private key as a JWK JSON document.
		private_key: Secret,
		/// Signing algorithm.
		algorithm: SigningAlgorithm,
		/// Accounts/transfer authorization mode.
		mode: AssertionMode,
	},
	/// No credentials; callers bring their own bearer token.
	BearerForward,
	/// Static consumer key/secret sent as headers or body fields.
	ApiKeyHeaders {
		/// Consumer key.
		consumer_key: String,
		/// Consumer secret.
		consumer_secret: Secret,
	},
}
impl Credentials {
	/// Scheme implied by this credential set.
	pub fn kind(&self) -> SchemeKind {
		match self {
			Credentials::OAuth1Signed { .. } => SchemeKind::OAuth1Signed,
			Credentials::OAuth2Assertion { .. } => SchemeKind::OAuth2Assertion,
			Credentials::BearerForward => SchemeKind::BearerForward,
			Credentials::ApiKeyHeaders { .. } => SchemeKind::ApiKeyHeaders,
		}
	}
}
