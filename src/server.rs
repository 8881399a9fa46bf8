//! Inbound HTTP surface.
//!
//! | Route            | Success                               | Failure                              |
//! |------------------|---------------------------------------|--------------------------------------|
//! | `GET /`          | `{success, message}`                  | never fails                          |
//! | `POST /auth`     | `{success, access_token}` or `data`   | 500 `{error, details}`               |
//! | `GET /accounts`  | upstream payload verbatim             | 401 `{error}` / 500 `{error, details}` |
//! | `POST /transfer` | `{success, transaction_id}`           | 400 / 401 `{error}` / 500 `{error, details}` |

// crates.io
use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
// self
use crate::{
	_prelude::*,
	auth::InboundToken,
	error::ValidationError,
	gateway::{AuthenticateResponse, BankingGateway, TransferRequest, TransferResponse},
	http::UpstreamHttpClient,
};
#[cfg(feature = "reqwest")]
use crate::{config::GatewayConfig, error::ConfigError, http::ReqwestHttpClient};

/// Message returned by the liveness route.
pub const LIVENESS_MESSAGE: &str = "Open Banking gateway is running.";

/// Builds the router for `gateway`.
pub fn router<C>(gateway: Arc<BankingGateway<C>>) -> Router
where
	C: ?Sized + UpstreamHttpClient,
{
	Router::new()
		.route("/", get(liveness))
		.route("/auth", post(authenticate::<C>))
		.route("/accounts", get(accounts::<C>))
		.route("/transfer", post(transfer::<C>))
		.layer(TraceLayer::new_for_http())
		.with_state(gateway)
}

/// Builds the reqwest-backed gateway from `config` and serves it until Ctrl-C.
#[cfg(feature = "reqwest")]
pub async fn serve(config: GatewayConfig) -> Result<()> {
	let http_client = ReqwestHttpClient::with_timeout(config.upstream_timeout)?;
	let gateway = BankingGateway::new(config.upstream_base_url, config.credentials, http_client)?;

	tracing::info!(
		scheme = %gateway.scheme.kind(),
		authenticate = %gateway.endpoints.authenticate,
		"Gateway configured."
	);

	let listener = tokio::net::TcpListener::bind(config.listen).await.map_err(|source| {
		ConfigError::Bind { address: config.listen.to_string(), source }
	})?;

	tracing::info!(address = %config.listen, "Listening.");

	axum::serve(listener, router(Arc::new(gateway)))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.map_err(|source| ConfigError::Bind { address: config.listen.to_string(), source })?;

	Ok(())
}

#[cfg(feature = "reqwest")]
async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::warn!(error = %e, "Failed to listen for shutdown signal.");

		std::future::pending::<()>().await;
	}

	tracing::info!("Shutting down.");
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status =
			StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = match self.details() {
			Some(details) => json!({ "error": self.summary(), "details": details }),
			None => json!({ "error": self.summary() }),
		};

		(status, Json(body)).into_response()
	}
}

async fn liveness() -> Json<JsonValue> {
	Json(json!({ "success": true, "message": LIVENESS_MESSAGE }))
}

async fn authenticate<C>(
	State(gateway): State<Arc<BankingGateway<C>>>,
	headers: HeaderMap,
) -> Result<Json<AuthenticateResponse>>
where
	C: ?Sized + UpstreamHttpClient,
{
	let inbound = inbound_token(&headers);

	gateway.authenticate(inbound.as_ref()).await.map(Json)
}

async fn accounts<C>(
	State(gateway): State<Arc<BankingGateway<C>>>,
	headers: HeaderMap,
) -> Result<Json<JsonValue>>
where
	C: ?Sized + UpstreamHttpClient,
{
	let inbound = inbound_token(&headers);

	gateway.get_accounts(inbound.as_ref()).await.map(Json)
}

async fn transfer<C>(
	State(gateway): State<Arc<BankingGateway<C>>>,
	headers: HeaderMap,
	body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>>
where
	C: ?Sized + UpstreamHttpClient,
{
	let Json(request) = body
		.map_err(|e| ValidationError::MalformedTransferBody { reason: e.body_text() })?;
	let inbound = inbound_token(&headers);

	gateway.transfer(inbound.as_ref(), request).await.map(Json)
}

fn inbound_token(headers: &HeaderMap) -> Option<InboundToken> {
	headers
		.get(AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(InboundToken::from_authorization)
}
