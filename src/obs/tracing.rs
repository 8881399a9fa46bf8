// crates.io
use tracing::instrument::Instrumented;
use tracing_subscriber::{EnvFilter, fmt};
// self
use crate::{_prelude::*, auth::SchemeKind, gateway::Operation};

/// Span wrapper used by gateway operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the operation and active scheme.
	pub fn new(operation: Operation, scheme: SchemeKind) -> Self {
		let span = tracing::info_span!(
			"banking_gateway.operation",
			operation = operation.as_str(),
			scheme = scheme.as_str()
		);

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}

/// Installs the global `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` when a subscriber was already installed.
pub fn install_subscriber() -> bool {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
}
