use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::{Config, Loom};

/// Serves `loom` on `addr` until the process is stopped.
#[instrument(skip(loom))]
pub async fn serve<T: Config>(loom: Arc<Loom<T>>, addr: SocketAddr) -> std::io::Result<()> {
	let listener = TcpListener::bind(addr).await?;

	info!(
		task = "api_service",
		addr = %listener.local_addr()?,
		model = %loom.defaults().model,
		"roadmap service listening"
	);

	axum::serve(listener, super::router(loom)).await
}
