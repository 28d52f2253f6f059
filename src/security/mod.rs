//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (line length, header count, body size)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Fail closed: a request over any limit is rejected with an error response
//! - No trust in client input; everything placed in HTML is escaped

pub mod limits;
