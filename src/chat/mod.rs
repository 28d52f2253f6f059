//! Conversation state shared by every connection.
//!
//! # Data Flow
//! ```text
//! /say worker ──append(topic, user, content)──▶ ConversationStore ──▶ Transcript { html, plain }
//! /conversation worker ──get_plain(topic)─────▶ ConversationStore
//! ```
//!
//! # Design Decisions
//! - Both renderings of a topic live in one entry, so one lock covers the pair
//! - Topics are created lazily and never removed
//! - Topic names are used verbatim as keys (no normalization)

pub mod store;
pub mod transcript;

pub use store::ConversationStore;
pub use transcript::{escape_html, Transcript};
