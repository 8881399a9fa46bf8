//! Signature primitives used by credential schemes.
//!
//! `oauth1` computes OAuth 1.0a HMAC-SHA256 signatures over a canonical base string and
//! mints the nonce/timestamp pair each signature needs. `assertion` issues short-lived JWS
//! client assertions from a JWK private key.

pub mod assertion;
pub mod oauth1;

pub use assertion::*;
pub use oauth1::*;
