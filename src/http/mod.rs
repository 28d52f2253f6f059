//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, one worker per connection)
//!     → request.rs (request line, headers, body)
//!     → query.rs (target query + form body → QueryMap)
//!     → [routing layer picks the action]
//!     → response.rs (render page, serialize)
//!     → Send to client, close
//! ```

pub mod query;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ParseError, Request};
pub use response::Response;
pub use server::ChatServer;
