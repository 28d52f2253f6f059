//! Shared utilities for integration and load testing.

use std::net::SocketAddr;

use tinychat::config::ChatConfig;
use tinychat::net::listener::Listener;
use tinychat::{ChatServer, ConversationStore, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub server: ChatServer,
    pub store: ConversationStore,
    pub shutdown: Shutdown,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with `config` on 127.0.0.1 and an OS-assigned port.
pub async fn start_server_with(config: ChatConfig) -> TestServer {
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let listener = Listener::from_tcp(tcp, config.listener.max_connections);

    let server = ChatServer::new(config, ConversationStore::new());
    let store = server.store().clone();
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();

    let running = server.clone();
    tokio::spawn(async move {
        let _ = running.run(listener, signal).await;
    });

    TestServer {
        addr,
        server,
        store,
        shutdown,
    }
}

#[allow(dead_code)]
pub async fn start_server() -> TestServer {
    start_server_with(ChatConfig::default()).await
}

/// Send raw bytes and read until the server closes the connection.
#[allow(dead_code)]
pub async fn send_raw(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

/// Form-encoded POST, returning the full response text.
#[allow(dead_code)]
pub async fn post_form(addr: SocketAddr, path: &str, body: &str) -> String {
    let raw = format!(
        "POST {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    send_raw(addr, raw.as_bytes()).await
}

/// Split a response into (status line, headers, body).
#[allow(dead_code)]
pub fn parse_response(text: &str) -> (String, Vec<String>, String) {
    let (head, body) = text.split_once("\r\n\r\n").expect("response has no blank line");
    let mut lines = head.split("\r\n").map(str::to_string);
    let status = lines.next().unwrap_or_default();
    (status, lines.collect(), body.to_string())
}

/// Poll until the server reports `expected` in-flight connections.
#[allow(dead_code)]
pub async fn wait_for_active(server: &ChatServer, expected: u64) -> bool {
    for _ in 0..100 {
        if server.active_connections() == expected {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    false
}
