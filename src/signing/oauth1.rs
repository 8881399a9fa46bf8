//! OAuth 1.0a HMAC-SHA256 signatures.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
// self
use crate::{_prelude::*, error::ConfigError};

type HmacSha256 = Hmac<Sha256>;

/// Signature method announced in `oauth_signature_method`.
pub const OAUTH1_SIGNATURE_METHOD: &str = "HMAC-SHA256";

const NONCE_BYTES: usize = 16;

/// Inputs covered by one OAuth 1.0a signature.
#[derive(Clone, Copy, Debug)]
pub struct SignatureInput<'a> {
	/// HTTP method, upper-cased in the base string.
	pub method: &'a str,
	/// Absolute request URL.
	pub url: &'a str,
	/// Seconds since the Unix epoch.
	pub timestamp: i64,
	/// Single-use nonce.
	pub nonce: &'a str,
	/// Consumer key.
	pub consumer_key: &'a str,
	/// Callback URI.
	pub callback_url: &'a str,
}
impl SignatureInput<'_> {
	/// Builds the canonical base string.
	pub fn base_string(&self) -> String {
		format!(
			"{method}&{url}&oauth_consumer_key={key}&oauth_nonce={nonce}&oauth_signature_method={OAUTH1_SIGNATURE_METHOD}&oauth_timestamp={timestamp}&oauth_callback={callback}",
			method = self.method.to_ascii_uppercase(),
			url = urlencoding::encode(self.url),
			key = self.consumer_key,
			nonce = self.nonce,
			timestamp = self.timestamp,
			callback = urlencoding::encode(self.callback_url),
		)
	}
}

/// Signs `input` with `consumer_secret`, returning the base64 HMAC-SHA256 digest.
///
/// Pure: identical inputs always produce identical output.
pub fn sign(input: &SignatureInput<'_>, consumer_secret: &str) -> Result<String, ConfigError> {
	let mut mac = HmacSha256::new_from_slice(consumer_secret.as_bytes())
		.map_err(|e| ConfigError::InvalidHmacKey { reason: e.to_string() })?;

	mac.update(input.base_string().as_bytes());

	Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Fresh hex nonce carrying 128 bits of entropy.
pub fn generate_nonce() -> String {
	let mut bytes = [0_u8; NONCE_BYTES];

	rand::rng().fill_bytes(&mut bytes);

	hex::encode(bytes)
}

/// Current time in whole seconds since the Unix epoch.
pub fn current_timestamp() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}
