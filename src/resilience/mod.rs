//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Connection worker:
//!     → timeouts.rs (deadline on reading the request)
//!     → timeouts.rs (deadline on writing the response)
//! ```
//!
//! # Design Decisions
//! - A stalled client only ever holds its own connection slot until the deadline
//! - Timed-out connections are closed without a response

pub mod timeouts;
