//! Route table.
//!
//! | path            | parameters              | action                               |
//! |-----------------|-------------------------|--------------------------------------|
//! | `/say`          | `user`, `topic`, `content` | append, then conversation view    |
//! | `/conversation` | `topic`                 | plain transcript poll (read-only)    |
//! | anything else   |                         | join form                            |

use crate::chat::ConversationStore;
use crate::http::query::QueryMap;
use crate::http::response::{self, Response};

/// A resolved request, borrowing its parameters from the query map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Say {
        user: &'a str,
        topic: &'a str,
        content: Option<&'a str>,
    },
    Poll {
        topic: &'a str,
    },
    Join,
}

impl<'a> Route<'a> {
    /// Pick the route for `path`. Missing `user`/`topic` on `/say` are empty strings.
    pub fn resolve(path: &str, query: &'a QueryMap) -> Self {
        match path {
            "/say" => Route::Say {
                user: query.get("user").unwrap_or_default(),
                topic: query.get("topic").unwrap_or_default(),
                content: query.get("content"),
            },
            "/conversation" => match query.get("topic") {
                Some(topic) => Route::Poll { topic },
                None => Route::Join,
            },
            _ => Route::Join,
        }
    }

    /// Label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Say { .. } => "say",
            Route::Poll { .. } => "conversation",
            Route::Join => "join",
        }
    }

    /// Run the route against the store and render its response.
    pub fn handle(&self, store: &ConversationStore) -> Response {
        match *self {
            Route::Say {
                user,
                topic,
                content,
            } => {
                let html = store.append(topic, user, content);
                response::conversation_view(user, topic, &html)
            }
            Route::Poll { topic } => response::transcript_poll(store.get_plain(topic)),
            Route::Join => response::join_form(),
        }
    }
}
