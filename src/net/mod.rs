//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (ID assignment, in-flight tracking)
//!     → Hand off to HTTP layer (one task per connection)
//! ```
//!
//! # Design Decisions
//! - Bounded accept prevents resource exhaustion
//! - Every connection handles exactly one request, then closes

pub mod connection;
pub mod listener;
