//! TinyChat: topic-based chat over a minimal HTTP/1.0 server.

pub mod chat;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;

pub use chat::ConversationStore;
pub use config::schema::ChatConfig;
pub use http::ChatServer;
pub use lifecycle::Shutdown;
