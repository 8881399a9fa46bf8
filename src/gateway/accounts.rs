//! Accounts operation.

// self
use crate::{
	_prelude::*,
	auth::InboundToken,
	gateway::{BankingGateway, Operation},
	http::UpstreamHttpClient,
};

impl<C> BankingGateway<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Fetches accounts, returning the upstream JSON payload verbatim.
	pub async fn get_accounts(&self, inbound: Option<&InboundToken>) -> Result<JsonValue> {
		const OPERATION: Operation = Operation::Accounts;

		self.observe(OPERATION, self.call_upstream(OPERATION, inbound, JsonMap::new())).await
	}
}
