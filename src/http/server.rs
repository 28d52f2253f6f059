//! HTTP server: accept loop and per-connection worker.
//!
//! # Responsibilities
//! - Accept connections from the bounded listener
//! - Spawn one detached task per connection
//! - Per connection: parse → decode → route → render → write → close
//! - Answer protocol errors with an error page; drop the connection on I/O errors
//!
//! # Design Decisions
//! - Accept errors are logged and never stop the loop
//! - Read and write phases each have a deadline
//! - The worker never holds a store lock across an await point

use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::Instrument;

use crate::chat::ConversationStore;
use crate::config::ChatConfig;
use crate::http::query;
use crate::http::request::{read_request, ParseError};
use crate::http::response::{self, Response};
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::net::connection::ConnectionTracker;
use crate::net::listener::{Listener, ListenerError};
use crate::observability::metrics;
use crate::resilience::timeouts::{deadline, with_timeout};
use crate::routing::Route;
use crate::security::limits::RequestLimits;

/// State shared by every connection worker.
#[derive(Debug)]
struct ServerState {
    config: ChatConfig,
    limits: RequestLimits,
    store: ConversationStore,
    tracker: ConnectionTracker,
}

/// The chat server.
#[derive(Debug, Clone)]
pub struct ChatServer {
    state: Arc<ServerState>,
}

impl ChatServer {
    /// Create a server over `store` with the given configuration.
    pub fn new(config: ChatConfig, store: ConversationStore) -> Self {
        let limits = RequestLimits::from(&config.limits);
        Self {
            state: Arc::new(ServerState {
                config,
                limits,
                store,
                tracker: ConnectionTracker::new(),
            }),
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.state.store
    }

    /// Number of connections currently being served.
    pub fn active_connections(&self) -> u64 {
        self.state.tracker.active_count()
    }

    /// Accept connections until `shutdown` fires.
    pub async fn run(self, listener: Listener, mut shutdown: ShutdownSignal) -> Result<(), ListenerError> {
        tracing::info!(
            address = ?listener.local_addr().ok(),
            "TinyChat server starting"
        );

        loop {
            let accepted = tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
                accepted = listener.accept() => accepted,
            };

            let (stream, peer_addr, permit) = match accepted {
                Ok(accepted) => accepted,
                Err(ListenerError::Accept(e)) => {
                    tracing::error!(error = %e, "Accept failed");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let guard = self.state.tracker.track();
            let span = tracing::info_span!("connection", id = %guard.id(), peer = %peer_addr);
            let server = self.clone();
            tokio::spawn(
                async move {
                    let _permit = permit;
                    let _guard = guard;
                    server.serve_connection(stream).await;
                }
                .instrument(span),
            );
        }

        tracing::info!("TinyChat server stopped");
        Ok(())
    }

    /// Handle exactly one request on `stream`, then close it.
    pub async fn serve_connection<S>(&self, stream: S)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let start = Instant::now();
        let state = &self.state;
        let (read_half, mut write_half) = tokio::io::split(stream);
        let mut reader = BufReader::new(read_half);

        let read_deadline = deadline(state.config.timeouts.read_secs);
        let parsed = match with_timeout("read", read_deadline, read_request(&mut reader, &state.limits)).await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping connection");
                metrics::record_timeout(e.phase);
                return;
            }
        };

        let (method, route, response) = match parsed {
            Ok(request) => {
                let params = query::decode(&request);
                let route = Route::resolve(request.path(), &params);
                tracing::debug!(
                    method = %request.method,
                    path = request.path(),
                    route = route.name(),
                    params = params.len(),
                    "Routing request"
                );
                let response = route.handle(&state.store);
                (request.method.as_str(), route.name(), response)
            }
            Err(e) => match e.rejection() {
                Some(rejection) => {
                    tracing::warn!(error = %e, status = rejection.status.code, "Rejecting request");
                    metrics::record_parse_error(e.kind());
                    let page = response::client_error(rejection.status, rejection.message, &rejection.cause);
                    ("-", "rejected", page)
                }
                None => {
                    tracing::debug!(error = %e, "Connection closed before a full request");
                    if !matches!(e, ParseError::Closed) {
                        metrics::record_parse_error(e.kind());
                    }
                    return;
                }
            },
        };

        let status = response.status.code;
        write_response(&mut write_half, response, deadline(state.config.timeouts.write_secs)).await;
        metrics::record_request(method, route, status, start);
    }
}

async fn write_response<W>(writer: &mut W, response: Response, limit: Option<std::time::Duration>)
where
    W: AsyncWrite + Unpin,
{
    let status = response.status;
    let bytes = response.into_bytes();
    let write = async {
        writer.write_all(&bytes).await?;
        writer.shutdown().await
    };
    match with_timeout("write", limit, write).await {
        Ok(Ok(())) => tracing::debug!(status = %status, bytes = bytes.len(), "Response sent"),
        Ok(Err(e)) => tracing::error!(error = %e, "Failed to write response"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to write response");
            metrics::record_timeout(e.phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    async fn exchange(server: &ChatServer, raw: &str) -> String {
        let (mut client, conn) = tokio::io::duplex(64 * 1024);
        client.write_all(raw.as_bytes()).await.unwrap();
        client.shutdown().await.unwrap();
        server.serve_connection(conn).await;
        let mut out = String::new();
        client.read_to_string(&mut out).await.unwrap();
        out
    }

    fn server() -> ChatServer {
        ChatServer::new(ChatConfig::default(), ConversationStore::new())
    }

    #[tokio::test]
    async fn serves_join_form() {
        let out = exchange(&server(), "GET / HTTP/1.0\r\n\r\n").await;
        assert!(out.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(out.contains("name=\"user\""));
    }

    #[tokio::test]
    async fn say_then_poll() {
        let server = server();
        let body = "user=Alice&topic=CS&content=Hello";
        let raw = format!(
            "POST /say HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let out = exchange(&server, &raw).await;
        assert!(out.contains("<p>Alice: Hello</p>"));

        let out = exchange(&server, "GET /conversation?topic=CS HTTP/1.0\r\n\r\n").await;
        assert!(out.ends_with("\r\n\r\nAlice: Hello\r\n"));
    }

    #[tokio::test]
    async fn rejects_bad_requests() {
        let server = server();
        let out = exchange(&server, "DELETE / HTTP/1.0\r\n\r\n").await;
        assert!(out.starts_with("HTTP/1.0 501 Not Implemented\r\n"));

        let out = exchange(&server, "\r\n").await;
        assert!(out.starts_with("HTTP/1.0 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn silent_close_gets_no_response() {
        let out = exchange(&server(), "").await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn stalled_client_times_out() {
        let mut config = ChatConfig::default();
        config.timeouts.read_secs = 1;
        let server = ChatServer::new(config, ConversationStore::new());

        let (mut client, conn) = tokio::io::duplex(1024);
        client.write_all(b"GET / HTTP/1.0\r\n").await.unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(5), server.serve_connection(conn))
            .await
            .unwrap();
        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        assert!(out.is_empty());
    }
}
