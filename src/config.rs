//! Process configuration: command-line/environment parsing and fail-fast validation.
//!
//! [`GatewayArgs`] mirrors the deployment's environment variables. [`GatewayArgs::into_config`]
//! turns them into an immutable [`GatewayConfig`], selecting the credential scheme either
//! explicitly (`CREDENTIAL_SCHEME`) or from whichever credential fields are populated, and
//! rejects any mismatch before the server starts.

// std
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	auth::{AssertionMode, Credentials, SchemeKind, Secret, SigningAlgorithm},
	error::ConfigError,
};

/// Raw settings read from flags or the environment.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct GatewayArgs {
	/// Base URL of the upstream banking API.
	#[arg(long, env = "BANK_API_BASE_URL")]
	pub upstream_base_url: String,
	/// Address to listen on.
	#[arg(long, env = "GATEWAY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
	pub host: IpAddr,
	/// Port to listen on.
	#[arg(long, env = "PORT", default_value_t = 80)]
	pub port: u16,
	/// OAuth 1.0a or API-key consumer key.
	#[arg(long, env = "CONSUMER_KEY")]
	pub consumer_key: Option<String>,
	/// OAuth 1.0a or API-key consumer secret.
	#[arg(long, env = "CONSUMER_SECRET", hide_env_values = true)]
	pub consumer_secret: Option<Secret>,
	/// JWK private key (JSON) used to sign client assertions.
	#[arg(long, env = "JWK_PRIVATE_KEY", hide_env_values = true)]
	pub jwk_private_key: Option<Secret>,
	/// Key identifier used as the assertion issuer and `kid`.
	#[arg(long, env = "JWK_KEY_ID")]
	pub jwk_key_id: Option<String>,
	/// Assertion signing algorithm.
	#[arg(long, env = "SIGNING_ALGORITHM", default_value = "ES512")]
	pub signing_algorithm: SigningAlgorithm,
	/// OAuth callback/redirect URI announced on the initiate call.
	#[arg(long, env = "OAUTH_CALLBACK_URL")]
	pub oauth_callback_url: Option<String>,
	/// Explicit credential scheme; inferred from the populated fields when omitted.
	#[arg(long, env = "CREDENTIAL_SCHEME", value_enum)]
	pub credential_scheme: Option<SchemeKind>,
	/// How the assertion scheme authorizes accounts and transfer calls.
	#[arg(long, env = "ASSERTION_MODE", value_enum, default_value_t)]
	pub assertion_mode: AssertionMode,
	/// Upper bound, in seconds, on each upstream call.
	#[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
	pub upstream_timeout_secs: u64,
}
impl GatewayArgs {
	/// Minimal settings for `upstream_base_url`; every optional field unset.
	pub fn new(upstream_base_url: impl Into<String>) -> Self {
		Self {
			upstream_base_url: upstream_base_url.into(),
			host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
			port: 80,
			consumer_key: None,
			consumer_secret: None,
			jwk_private_key: None,
			jwk_key_id: None,
			signing_algorithm: SigningAlgorithm::default(),
			oauth_callback_url: None,
			credential_scheme: None,
			assertion_mode: AssertionMode::default(),
			upstream_timeout_secs: 30,
		}
	}

	/// Scheme selected explicitly or implied by the populated credential fields.
	pub fn selected_scheme(&self) -> Result<SchemeKind, ConfigError> {
		if let Some(kind) = self.credential_scheme {
			return Ok(kind);
		}

		match (has_jwk(self), has_consumer(self)) {
			(true, true) => Err(ConfigError::ConflictingCredentials {
				first: SchemeKind::OAuth2Assertion.as_str(),
				second: "consumer key/secret",
			}),
			(true, false) => Ok(SchemeKind::OAuth2Assertion),
			(false, true) if self.oauth_callback_url.is_some() => Ok(SchemeKind::OAuth1Signed),
			(false, true) => Ok(SchemeKind::ApiKeyHeaders),
			(false, false) => Ok(SchemeKind::BearerForward),
		}
	}

	/// Validates the settings and freezes them into a [`GatewayConfig`].
	pub fn into_config(self) -> Result<GatewayConfig, ConfigError> {
		let kind = self.selected_scheme()?;
		let upstream_base_url = parse_url(&self.upstream_base_url)?;
		let listen = SocketAddr::new(self.host, self.port);

		if self.upstream_timeout_secs == 0 {
			return Err(ConfigError::ZeroUpstreamTimeout);
		}

		let upstream_timeout =
			Duration::seconds(i64::try_from(self.upstream_timeout_secs).unwrap_or(i64::MAX));
		let scheme = kind.as_str();
		let credentials = match kind {
			SchemeKind::OAuth1Signed => {
				reject_jwk(&self, kind)?;

				Credentials::OAuth1Signed {
					consumer_key: require(self.consumer_key, scheme, "CONSUMER_KEY")?,
					consumer_secret: require(self.consumer_secret, scheme, "CONSUMER_SECRET")?,
					callback_url: parse_url(&require(
						self.oauth_callback_url,
						scheme,
						"OAUTH_CALLBACK_URL",
					)?)?,
				}
			},
			SchemeKind::OAuth2Assertion => {
				reject_consumer(&self, kind)?;
				reject_callback(&self, kind)?;

				Credentials::OAuth2Assertion {
					key_id: require(self.jwk_key_id, scheme, "JWK_KEY_ID")?,
					private_key: require(self.jwk_private_key, scheme, "JWK_PRIVATE_KEY")?,
					algorithm: self.signing_algorithm,
					mode: self.assertion_mode,
				}
			},
			SchemeKind::BearerForward => {
				reject_consumer(&self, kind)?;
				reject_jwk(&self, kind)?;
				reject_callback(&self, kind)?;

				Credentials::BearerForward
			},
			SchemeKind::ApiKeyHeaders => {
				reject_jwk(&self, kind)?;
				reject_callback(&self, kind)?;

				Credentials::ApiKeyHeaders {
					consumer_key: require(self.consumer_key, scheme, "CONSUMER_KEY")?,
					consumer_secret: require(self.consumer_secret, scheme, "CONSUMER_SECRET")?,
				}
			},
		};

		Ok(GatewayConfig { listen, upstream_base_url, credentials, upstream_timeout })
	}
}

/// Immutable, validated configuration shared for the process lifetime.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
	/// Socket address the server binds.
	pub listen: SocketAddr,
	/// Upstream banking API base URL.
	pub upstream_base_url: Url,
	/// Credential set for the active scheme.
	pub credentials: Credentials,
	/// Upper bound on each upstream call.
	pub upstream_timeout: Duration,
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
	Url::parse(value)
		.map_err(|source| ConfigError::InvalidUpstreamUrl { url: value.to_owned(), source })
}

fn require<T>(value: Option<T>, scheme: &'static str, field: &'static str) -> Result<T, ConfigError> {
	value.ok_or(ConfigError::MissingField { scheme, field })
}

fn has_jwk(args: &GatewayArgs) -> bool {
	args.jwk_private_key.is_some() || args.jwk_key_id.is_some()
}

fn has_consumer(args: &GatewayArgs) -> bool {
	args.consumer_key.is_some() || args.consumer_secret.is_some()
}

fn reject_jwk(args: &GatewayArgs, kind: SchemeKind) -> Result<(), ConfigError> {
	if has_jwk(args) {
		return Err(ConfigError::ConflictingCredentials {
			first: kind.as_str(),
			second: SchemeKind::OAuth2Assertion.as_str(),
		});
	}

	Ok(())
}

fn reject_consumer(args: &GatewayArgs, kind: SchemeKind) -> Result<(), ConfigError> {
	if has_consumer(args) {
		return Err(ConfigError::ConflictingCredentials {
			first: kind.as_str(),
			second: "consumer key/secret",
		});
	}

	Ok(())
}

// Only the OAuth1 initiate call announces a callback.
fn reject_callback(args: &GatewayArgs, kind: SchemeKind) -> Result<(), ConfigError> {
	if args.oauth_callback_url.is_some() {
		return Err(ConfigError::ConflictingCredentials {
			first: kind.as_str(),
			second: "OAUTH_CALLBACK_URL",
		});
	}

	Ok(())
}
