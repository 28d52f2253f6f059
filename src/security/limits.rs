//! Request limits.
//!
//! # Responsibilities
//! - Enforce maximum request/header line length
//! - Enforce maximum header count
//! - Enforce maximum request body size
//!
//! # Design Decisions
//! - Limits checked while reading (early rejection, bounded buffers)
//! - Over-limit requests get 413 Payload Too Large or 431 Request Header Fields Too Large

use crate::config::LimitsConfig;

/// Limits applied while reading a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    pub max_line_length: usize,
    pub max_headers: usize,
    pub max_body_size: usize,
}

impl RequestLimits {
    /// Whether a declared body length is acceptable.
    pub fn allows_body(&self, len: usize) -> bool {
        len <= self.max_body_size
    }
}

impl From<&LimitsConfig> for RequestLimits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            max_line_length: config.max_line_length,
            max_headers: config.max_headers,
            max_body_size: config.max_body_size,
        }
    }
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}
