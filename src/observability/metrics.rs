//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tinychat_requests_total` (counter): requests by method, route, status
//! - `tinychat_request_duration_seconds` (histogram): time from accept to response written
//! - `tinychat_active_connections` (gauge): current connection count
//! - `tinychat_messages_total` (counter): non-empty messages appended
//! - `tinychat_parse_errors_total` (counter): rejected requests by kind
//! - `tinychat_timeouts_total` (counter): connections dropped at a deadline, by phase

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "tinychat_requests_total",
        "method" => method.to_string(),
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("tinychat_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the current number of in-flight connections.
pub fn record_active_connections(count: u64) {
    metrics::gauge!("tinychat_active_connections").set(count as f64);
}

/// Record a message appended to a topic.
pub fn record_message() {
    metrics::counter!("tinychat_messages_total").increment(1);
}

/// Record a connection dropped because `phase` ran past its deadline.
pub fn record_timeout(phase: &'static str) {
    metrics::counter!("tinychat_timeouts_total", "phase" => phase).increment(1);
}

/// Record a rejected request.
pub fn record_parse_error(kind: &'static str) {
    metrics::counter!("tinychat_parse_errors_total", "kind" => kind).increment(1);
}

#[cfg(test)]
mod tests {
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use crate::config::ChatConfig;
    use crate::net::connection::ConnectionTracker;
    use crate::{ChatServer, ConversationStore};

    type Entry = (String, Vec<(String, String)>, DebugValue);

    async fn exchange(server: &ChatServer, raw: &str) {
        let (mut client, conn) = tokio::io::duplex(64 * 1024);
        client.write_all(raw.as_bytes()).await.unwrap();
        client.shutdown().await.unwrap();
        server.serve_connection(conn).await;
        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
    }

    fn find(entries: &[Entry], name: &str, labels: &[(&str, &str)]) -> Option<DebugValue> {
        entries
            .iter()
            .find(|(n, l, _)| {
                n == name
                    && labels
                        .iter()
                        .all(|(k, v)| l.iter().any(|(lk, lv)| lk == k && lv == v))
            })
            .map(|(_, _, value)| match value {
                DebugValue::Counter(c) => DebugValue::Counter(*c),
                DebugValue::Gauge(g) => DebugValue::Gauge(*g),
                DebugValue::Histogram(h) => DebugValue::Histogram(h.clone()),
            })
    }

    #[test]
    fn server_activity_is_recorded() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        ::metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let mut config = ChatConfig::default();
                config.timeouts.read_secs = 1;
                let server = ChatServer::new(config, ConversationStore::new());

                let body = "user=Alice&topic=CS&content=Hello";
                let post = format!(
                    "POST /say HTTP/1.0\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{body}",
                    body.len()
                );
                exchange(&server, &post).await;
                exchange(&server, "GET /say?user=Bob&topic=CS HTTP/1.0\r\n\r\n").await;
                exchange(&server, "\r\n").await;
                exchange(&server, "FETCH / HTTP/1.0\r\n\r\n").await;

                // Partial request line that never completes.
                let (mut client, conn) = tokio::io::duplex(1024);
                client.write_all(b"GET / HT").await.unwrap();
                server.serve_connection(conn).await;
                drop(client);

                let tracker = ConnectionTracker::new();
                let _open = tracker.track();
                drop(tracker.track());
            });
        });

        let entries: Vec<Entry> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(key, _, _, value)| {
                let key = key.key();
                let labels = key
                    .labels()
                    .map(|l| (l.key().to_string(), l.value().to_string()))
                    .collect();
                (key.name().to_string(), labels, value)
            })
            .collect();

        assert_eq!(
            find(&entries, "tinychat_messages_total", &[]),
            Some(DebugValue::Counter(1))
        );
        assert_eq!(
            find(
                &entries,
                "tinychat_requests_total",
                &[("method", "POST"), ("route", "say"), ("status", "200")]
            ),
            Some(DebugValue::Counter(1))
        );
        assert_eq!(
            find(
                &entries,
                "tinychat_parse_errors_total",
                &[("kind", "malformed_request_line")]
            ),
            Some(DebugValue::Counter(1))
        );
        assert_eq!(
            find(
                &entries,
                "tinychat_parse_errors_total",
                &[("kind", "unsupported_method")]
            ),
            Some(DebugValue::Counter(1))
        );
        assert_eq!(
            find(&entries, "tinychat_timeouts_total", &[("phase", "read")]),
            Some(DebugValue::Counter(1))
        );
        match find(&entries, "tinychat_active_connections", &[]) {
            Some(DebugValue::Gauge(value)) => assert_eq!(value.into_inner(), 1.0),
            other => panic!("unexpected gauge: {other:?}"),
        }
        assert!(matches!(
            find(&entries, "tinychat_request_duration_seconds", &[]),
            Some(DebugValue::Histogram(ref samples)) if samples.len() == 4
        ));
    }
}
