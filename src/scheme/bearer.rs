//! Caller-supplied bearer tokens forwarded verbatim.

// self
use crate::{
	_prelude::*,
	auth::{InboundToken, SchemeKind},
	gateway::{Operation, UpstreamTarget},
	scheme::{self, AuthArtifact, CredentialScheme},
};

/// Holds no credentials of its own; every call forwards the caller's token.
///
/// Accounts and transfer fail with [`Error::MissingCredential`] without a token; authenticate
/// forwards one when present and otherwise goes out bare.
#[derive(Debug, Default)]
pub struct BearerForward;
impl CredentialScheme for BearerForward {
	fn kind(&self) -> SchemeKind {
		SchemeKind::BearerForward
	}

	fn requires_inbound_token(&self, operation: Operation) -> bool {
		operation != Operation::Authenticate
	}

	fn prepare_auth(
		&self,
		target: &UpstreamTarget,
		inbound: Option<&InboundToken>,
	) -> Result<AuthArtifact> {
		scheme::forward_bearer(
			target.operation,
			inbound,
			self.requires_inbound_token(target.operation),
		)
	}
}
