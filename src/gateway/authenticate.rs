//! Authenticate operation: obtain upstream access with the deployment's credentials.

// self
use crate::{
	_prelude::*,
	auth::InboundToken,
	gateway::{BankingGateway, Operation},
	http::UpstreamHttpClient,
};

/// Successful authenticate response.
///
/// Carries `access_token` when upstream returned one, otherwise the whole upstream payload
/// under `data`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthenticateResponse {
	/// Always `true`.
	pub success: bool,
	/// Upstream access token, when present.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub access_token: Option<String>,
	/// Upstream payload, when it carries no access token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<JsonValue>,
}
impl AuthenticateResponse {
	/// Builds the caller-facing response from the upstream payload.
	pub fn from_payload(payload: JsonValue) -> Self {
		match payload.get("access_token").and_then(JsonValue::as_str) {
			Some(token) => Self { success: true, access_token: Some(token.to_owned()), data: None },
			None => Self { success: true, access_token: None, data: Some(payload) },
		}
	}
}

impl<C> BankingGateway<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Authenticates against upstream using the active scheme's credentials.
	///
	/// `inbound` is only consulted by schemes that forward caller tokens.
	pub async fn authenticate(
		&self,
		inbound: Option<&InboundToken>,
	) -> Result<AuthenticateResponse> {
		const OPERATION: Operation = Operation::Authenticate;

		self.observe(OPERATION, async move {
			let payload = self.call_upstream(OPERATION, inbound, JsonMap::new()).await?;

			Ok(AuthenticateResponse::from_payload(payload))
		})
		.await
	}
}
