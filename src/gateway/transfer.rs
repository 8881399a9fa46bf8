//! Transfer operation: validation, forwarding, and the caller-facing receipt.

// self
use crate::{
	_prelude::*,
	auth::InboundToken,
	error::ValidationError,
	gateway::{BankingGateway, Operation},
	http::UpstreamHttpClient,
};

/// Transfer instruction received from the caller.
///
/// Values are kept as raw JSON and forwarded unchanged; only presence is checked. The
/// amount's sign, magnitude, and type are the upstream's business.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
	/// Source account.
	#[serde(default)]
	pub routing_account: Option<JsonValue>,
	/// Destination account.
	#[serde(default)]
	pub destination_account: Option<JsonValue>,
	/// Amount, forwarded verbatim.
	#[serde(default)]
	pub amount: Option<JsonValue>,
}
impl TransferRequest {
	/// Convenience constructor.
	pub fn new(
		routing_account: impl Into<JsonValue>,
		destination_account: impl Into<JsonValue>,
		amount: impl Into<JsonValue>,
	) -> Self {
		Self {
			routing_account: Some(routing_account.into()),
			destination_account: Some(destination_account.into()),
			amount: Some(amount.into()),
		}
	}

	/// Checks that every field is present and non-empty (`null`, `false`, `0`, and `""`
	/// count as missing).
	pub fn validate(&self) -> Result<(), ValidationError> {
		for (field, value) in [
			("routing_account", &self.routing_account),
			("destination_account", &self.destination_account),
			("amount", &self.amount),
		] {
			if !value.as_ref().is_some_and(is_present) {
				return Err(ValidationError::MissingTransactionData { field });
			}
		}

		Ok(())
	}

	fn into_body(self) -> JsonMap<String, JsonValue> {
		let mut body = JsonMap::new();

		for (field, value) in [
			("routing_account", self.routing_account),
			("destination_account", self.destination_account),
			("amount", self.amount),
		] {
			body.insert(field.into(), value.unwrap_or(JsonValue::Null));
		}

		body
	}
}

/// Successful transfer receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferResponse {
	/// Always `true`.
	pub success: bool,
	/// Upstream transaction identifier (`null` when upstream omitted it).
	pub transaction_id: JsonValue,
}

impl<C> BankingGateway<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Validates `request` and forwards it upstream.
	///
	/// Validation runs before credentials are resolved, so an incomplete request is a
	/// validation error under every scheme and never reaches upstream.
	pub async fn transfer(
		&self,
		inbound: Option<&InboundToken>,
		request: TransferRequest,
	) -> Result<TransferResponse> {
		const OPERATION: Operation = Operation::Transfer;

		self.observe(OPERATION, async move {
			request.validate()?;

			let payload = self.call_upstream(OPERATION, inbound, request.into_body()).await?;
			let transaction_id = payload.get("transaction_id").cloned().unwrap_or(JsonValue::Null);

			Ok(TransferResponse { success: true, transaction_id })
		})
		.await
	}
}

fn is_present(value: &JsonValue) -> bool {
	match value {
		JsonValue::Null => false,
		JsonValue::Bool(flag) => *flag,
		JsonValue::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
		JsonValue::String(s) => !s.is_empty(),
		JsonValue::Array(_) | JsonValue::Object(_) => true,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn complete_requests_validate() {
		assert!(TransferRequest::new("A", "B", 100).validate().is_ok());
		assert!(TransferRequest::new("A", "B", "-12.50").validate().is_ok());
		assert!(TransferRequest::new("A", "B", -5).validate().is_ok());
	}

	#[test]
	fn missing_or_empty_fields_are_rejected() {
		let missing_amount = TransferRequest { amount: None, ..TransferRequest::new("A", "B", 1) };
		let empty_routing = TransferRequest::new("", "B", 1);
		let zero_amount = TransferRequest::new("A", "B", 0);
		let null_destination =
			TransferRequest { destination_account: Some(JsonValue::Null), ..TransferRequest::new("A", "B", 1) };

		assert_eq!(
			missing_amount.validate(),
			Err(ValidationError::MissingTransactionData { field: "amount" })
		);
		assert_eq!(
			empty_routing.validate(),
			Err(ValidationError::MissingTransactionData { field: "routing_account" })
		);
		assert!(zero_amount.validate().is_err());
		assert_eq!(
			null_destination.validate(),
			Err(ValidationError::MissingTransactionData { field: "destination_account" })
		);
	}

	#[test]
	fn body_forwards_values_verbatim() {
		let body = TransferRequest::new("A", "B", "1e3").into_body();

		assert_eq!(
			JsonValue::Object(body),
			serde_json::json!({ "routing_account": "A", "destination_account": "B", "amount": "1e3" })
		);
	}
}
