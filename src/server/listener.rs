use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionError};

pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("failed to listen on {}", cfg.server.listen_addr))?;
    info!("Listening on {}", cfg.server.listen_addr);

    serve(listener, cfg).await
}

/// Accepts connections forever, one task per connection. A failing
/// connection is logged and dropped; the loop keeps going.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "accept failed");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let cfg = Arc::clone(&cfg);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, cfg);
            match conn.run().await {
                Ok(served) => info!(
                    %peer,
                    method = %served.method,
                    path = %served.path,
                    status = served.status.as_u16(),
                    bytes = served.body_bytes,
                    "Response sent"
                ),
                Err(e @ (ConnectionError::Parse(_) | ConnectionError::Timeout(_))) => {
                    warn!(%peer, error = %e, "Dropping connection")
                }
                Err(e) => error!(%peer, error = %e, "Connection error"),
            }
        });
    }
}
