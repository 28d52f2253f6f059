//! Process-wide conversation store.
//!
//! # Responsibilities
//! - Map topic → transcript pair
//! - Append a message to both renderings as one step
//! - Serve consistent reads while other workers append
//!
//! # Design Decisions
//! - `DashMap` shards give per-topic locking; unrelated topics don't contend
//! - `append` holds the entry's write lock across both renderings, and reads
//!   hold the read lock while copying, so a half-updated pair is never visible

use std::sync::Arc;

use dashmap::DashMap;

use crate::chat::transcript::Transcript;
use crate::observability::metrics;

/// Shared, thread-safe store of every topic's transcript.
///
/// Cloning is cheap and yields a handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    topics: Arc<DashMap<String, Transcript>>,
}

impl ConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `user: content` to `topic` and return the updated HTML transcript.
    ///
    /// Missing or empty content adds nothing but still creates the topic.
    pub fn append(&self, topic: &str, user: &str, content: Option<&str>) -> String {
        let mut entry = self.topics.entry(topic.to_string()).or_default();
        if entry.push(user, content.unwrap_or_default()) {
            metrics::record_message();
            tracing::debug!(topic, user, "Message appended");
        }
        entry.html().to_string()
    }

    /// A consistent copy of both renderings for `topic` (empty if never posted to).
    pub fn snapshot(&self, topic: &str) -> Transcript {
        self.topics
            .get(topic)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// HTML transcript for `topic`, or an empty string.
    pub fn get_html(&self, topic: &str) -> String {
        self.topics
            .get(topic)
            .map(|entry| entry.html().to_string())
            .unwrap_or_default()
    }

    /// Plain transcript for `topic`, or an empty string.
    pub fn get_plain(&self, topic: &str) -> String {
        self.topics
            .get(topic)
            .map(|entry| entry.plain().to_string())
            .unwrap_or_default()
    }

    /// Whether `topic` has an entry (possibly empty).
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.contains_key(topic)
    }

    /// Number of topics created so far.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_topic_is_empty() {
        let store = ConversationStore::new();
        assert_eq!(store.get_html("nope"), "");
        assert_eq!(store.get_plain("nope"), "");
        assert_eq!(store.snapshot("nope"), Transcript::default());
        assert!(!store.contains("nope"));
    }

    #[test]
    fn append_then_get() {
        let store = ConversationStore::new();
        store.append("CS", "Alice", Some("Hello"));
        let html = store.append("CS", "Bob", Some("Hi"));

        assert_eq!(html, "<p>Alice: Hello</p><p>Bob: Hi</p>");
        assert_eq!(store.get_plain("CS"), "Alice: Hello\r\nBob: Hi\r\n");
        assert!(store.get_html("CS").ends_with("<p>Bob: Hi</p>"));
    }

    #[test]
    fn empty_content_creates_topic_without_text() {
        let store = ConversationStore::new();
        store.append("CS", "Alice", Some("Hello"));
        let before = store.snapshot("CS");

        store.append("CS", "Alice", Some(""));
        store.append("CS", "Alice", None);
        assert_eq!(store.snapshot("CS"), before);

        store.append("new", "Bob", None);
        assert!(store.contains("new"));
        assert_eq!(store.get_plain("new"), "");
        assert_eq!(store.topic_count(), 2);
    }

    #[test]
    fn topics_are_case_sensitive() {
        let store = ConversationStore::new();
        store.append("cs", "a", Some("x"));
        assert_eq!(store.get_plain("CS"), "");
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let store = ConversationStore::new();
        let threads = 8;
        let per_thread = 250;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..per_thread {
                        store.append("race", &format!("u{t}"), Some(format!("m{i}").as_str()));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot("race");
        let plain_lines = snapshot.plain().matches("\r\n").count();
        let html_lines = snapshot.html().matches("<p>").count();
        assert_eq!(plain_lines, threads * per_thread);
        assert_eq!(html_lines, threads * per_thread);

        // Per-writer order is preserved.
        for t in 0..threads {
            let prefix = format!("u{t}: ");
            let seen: Vec<_> = snapshot
                .plain()
                .split("\r\n")
                .filter_map(|line| line.strip_prefix(prefix.as_str()))
                .collect();
            let expected: Vec<_> = (0..per_thread).map(|i| format!("m{i}")).collect();
            assert_eq!(seen, expected);
        }
    }
}
