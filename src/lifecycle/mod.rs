//! Lifecycle management subsystem.
//!
//! The binary serves until the process is killed. `Shutdown` exists so that an
//! embedding program (or a test) can stop the accept loop.

pub mod shutdown;

pub use shutdown::Shutdown;
