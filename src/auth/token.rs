//! Inbound bearer tokens lifted from the caller's `Authorization` header.

// self
use crate::{_prelude::*, auth::Secret};

/// Opaque token presented by the caller; forwarded upstream byte-for-byte and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundToken(Secret);
impl InboundToken {
	/// Wraps a raw token value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(Secret::new(value))
	}

	/// Extracts the token from an `Authorization: Bearer <token>` header value.
	///
	/// Returns `None` for other schemes or an empty token.
	pub fn from_authorization(header: &str) -> Option<Self> {
		let (scheme, token) = header.trim().split_once(' ')?;

		if !scheme.eq_ignore_ascii_case("bearer") {
			return None;
		}

		let token = token.trim_start();

		if token.is_empty() { None } else { Some(Self::new(token)) }
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.0.expose()
	}

	/// Formats the value of an outbound `Authorization` header.
	pub fn bearer_header(&self) -> String {
		format!("Bearer {}", self.expose())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bearer_header_is_parsed() {
		let token = InboundToken::from_authorization("Bearer abc.def-123")
			.expect("Bearer header should yield a token.");

		assert_eq!(token.expose(), "abc.def-123");
		assert_eq!(token.bearer_header(), "Bearer abc.def-123");
		assert!(InboundToken::from_authorization("bearer xyz").is_some());
	}

	#[test]
	fn other_schemes_and_empty_tokens_are_ignored() {
		assert!(InboundToken::from_authorization("Basic dXNlcjpwYXNz").is_none());
		assert!(InboundToken::from_authorization("Bearer ").is_none());
		assert!(InboundToken::from_authorization("Bearer").is_none());
		assert!(InboundToken::from_authorization("").is_none());
	}

	#[test]
	fn debug_output_redacts_token() {
		let token = InboundToken::new("very-secret");

		assert!(!format!("{token:?}").contains("very-secret"));
	}
}
