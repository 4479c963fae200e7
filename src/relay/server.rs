//! warp WebSocket endpoint for the rendering client.
//!
//! `GET /`       upgrades to a WebSocket carrying the relay protocol
//! `GET /health` liveness probe

use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;
use warp::ws::{Message, WebSocket};
use warp::Filter;

use crate::relay::session::RelaySession;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to bind relay server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: warp::Error,
    },
}

pub fn routes(
    session: Arc<RelaySession>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| {
            warp::reply::json(&json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION")
            }))
        });

    let relay = warp::path::end()
        .and(warp::ws())
        .and(warp::any().map(move || session.clone()))
        .map(|ws: warp::ws::Ws, session: Arc<RelaySession>| {
            ws.on_upgrade(move |socket| handle_connection(socket, session))
        });

    health.or(relay)
}

/// One connection: read a frame, finish its turn, reply, repeat.
pub async fn handle_connection(socket: WebSocket, session: Arc<RelaySession>) {
    let connection_id = Uuid::new_v4();
    let span = tracing::info_span!("connection", id = %connection_id);

    async move {
        tracing::info!("[Relay] Client connected");
        let (mut tx, mut rx) = socket.split();

        while let Some(result) = rx.next().await {
            let message = match result {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("[Relay] Transport error: {}", e);
                    break;
                }
            };
            if message.is_close() {
                break;
            }
            let Ok(frame) = message.to_str() else {
                tracing::debug!("[Relay] Ignoring non-text frame");
                continue;
            };

            let Some(reply) = session.handle_frame(frame).await else {
                continue;
            };
            let json = match reply.to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("[Relay] Could not encode reply: {}", e);
                    continue;
                }
            };
            if let Err(e) = tx.send(Message::text(json)).await {
                tracing::warn!("[Relay] Send failed: {}", e);
                break;
            }
        }

        tracing::info!("[Relay] Client disconnected");
    }
    .instrument(span)
    .await
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve<F>(
    addr: SocketAddr,
    session: Arc<RelaySession>,
    shutdown: F,
) -> Result<(), RelayError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (bound, server) = warp::serve(routes(session))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|source| RelayError::Bind { addr, source })?;

    tracing::info!("[Relay] Listening on ws://{}", bound);
    server.await;
    tracing::info!("[Relay] Server shut down");
    Ok(())
}
