//! Open Banking gateway server.

// crates.io
use clap::Parser;
// self
use open_banking_gateway::{config::GatewayArgs, obs, server};

#[tokio::main]
async fn main() -> open_banking_gateway::error::Result<()> {
	obs::install_subscriber();

	let config = GatewayArgs::parse().into_config()?;

	server::serve(config).await
}
