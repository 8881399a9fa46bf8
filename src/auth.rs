//! Credential material: process-wide credentials, redacted secrets, and inbound bearer tokens.

pub mod credentials;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use secret::*;
pub use token::*;
