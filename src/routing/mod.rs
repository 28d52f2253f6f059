//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! path + QueryMap
//!     → router.rs (Route::resolve)
//!     → Route::handle (store append/get)
//!     → http::response renderer
//! ```
//!
//! # Design Decisions
//! - Paths match exactly; the query component never takes part
//! - GET and POST share one table

pub mod router;

pub use router::Route;
