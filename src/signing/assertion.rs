//! Short-lived JWS client assertions.
//!
//! Every call to [`AssertionSigner::issue`] produces a brand-new assertion: the issued-at,
//! expiry, and `jti` claims are regenerated so an assertion can never be replayed past its
//! five-minute window or confused with a sibling minted in the same second. Assertions are
//! never cached.

// std
use std::time::SystemTime;
// crates.io
use josekit::{
	jwk::Jwk,
	jws::{self, JwsHeader, JwsSigner},
	jwt::{self, JwtPayload},
};
// self
use crate::{
	_prelude::*,
	auth::{Secret, SigningAlgorithm},
	error::ConfigError,
	signing::oauth1,
};

/// Lifetime of every issued assertion.
pub const ASSERTION_TTL: Duration = Duration::seconds(300);

/// Claim set carried by an assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Issuer (the configured key id).
	pub iss: String,
	/// Audience (the upstream base URL).
	pub aud: String,
	/// Issued-at, seconds since the Unix epoch.
	pub iat: i64,
	/// Expiry, seconds since the Unix epoch.
	pub exp: i64,
	/// Unique assertion identifier.
	pub jti: String,
}

/// Signs client assertions with a JWK private key loaded at startup.
pub struct AssertionSigner {
	key_id: String,
	audience: String,
	algorithm: SigningAlgorithm,
	signer: Box<dyn JwsSigner + Send + Sync>,
}
impl AssertionSigner {
	/// Parses `private_key` as a JWK and prepares a signer for `algorithm`.
	///
	/// Fails with [`ConfigError`] when the key is malformed or does not fit the algorithm,
	/// so misconfiguration surfaces at startup rather than on a request.
	pub fn new(
		key_id: impl Into<String>,
		private_key: &Secret,
		algorithm: SigningAlgorithm,
		audience: &Url,
	) -> Result<Self, ConfigError> {
		let jwk = Jwk::from_bytes(private_key.expose().as_bytes())
			.map_err(|source| ConfigError::MalformedPrivateKey { source })?;
		let incompatible = |e: josekit::JoseError| ConfigError::UnsupportedAlgorithm {
			algorithm: algorithm.to_string(),
			reason: e.to_string(),
		};
		let signer: Box<dyn JwsSigner + Send + Sync> = match algorithm {
			SigningAlgorithm::Es256 =>
				Box::new(jws::ES256.signer_from_jwk(&jwk).map_err(incompatible)?),
			SigningAlgorithm::Es384 =>
				Box::new(jws::ES384.signer_from_jwk(&jwk).map_err(incompatible)?),
			SigningAlgorithm::Es512 =>
				Box::new(jws::ES512.signer_from_jwk(&jwk).map_err(incompatible)?),
			SigningAlgorithm::EdDsa =>
				Box::new(jws::EdDSA.signer_from_jwk(&jwk).map_err(incompatible)?),
		};

		Ok(Self {
			key_id: key_id.into(),
			audience: audience.as_str().trim_end_matches('/').to_owned(),
			algorithm,
			signer,
		})
	}

	/// Algorithm used for every assertion.
	pub fn algorithm(&self) -> SigningAlgorithm {
		self.algorithm
	}

	/// Issues a fresh assertion valid for [`ASSERTION_TTL`] from now.
	pub fn issue(&self) -> Result<String, ConfigError> {
		self.issue_at(OffsetDateTime::now_utc())
	}

	/// Issues a fresh assertion whose validity window starts at `now`.
	pub fn issue_at(&self, now: OffsetDateTime) -> Result<String, ConfigError> {
		let claims = self.claims_at(now);
		let mut header = JwsHeader::new();
		let mut payload = JwtPayload::new();

		header.set_token_type("JWT");
		header.set_key_id(&self.key_id);
		payload.set_issuer(&claims.iss);
		payload.set_audience(vec![claims.aud.as_str()]);
		payload.set_issued_at(&unix_seconds(claims.iat));
		payload.set_expires_at(&unix_seconds(claims.exp));
		payload.set_jwt_id(&claims.jti);

		jwt::encode_with_signer(&payload, &header, &*self.signer)
			.map_err(|source| ConfigError::Signing { source })
	}

	/// Builds the claim set for an assertion issued at `now`.
	pub fn claims_at(&self, now: OffsetDateTime) -> AssertionClaims {
		let iat = now.unix_timestamp();

		AssertionClaims {
			iss: self.key_id.clone(),
			aud: self.audience.clone(),
			iat,
			exp: iat + ASSERTION_TTL.whole_seconds(),
			jti: oauth1::generate_nonce(),
		}
	}
}
impl Debug for AssertionSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssertionSigner")
			.field("key_id", &self.key_id)
			.field("audience", &self.audience)
			.field("algorithm", &self.algorithm)
			.finish()
	}
}

fn unix_seconds(secs: i64) -> SystemTime {
	SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(secs.max(0) as u64)
}
