//! Response rendering.
//!
//! # Responsibilities
//! - Render the join form, the conversation view and the transcript poll
//! - Render error pages for rejected requests
//! - Serialize status line, headers and body into one buffer
//!
//! # Design Decisions
//! - Every response is HTTP/1.0 with `Connection: close`; one request per connection
//! - Each body is built in a single owned `String` and measured once for `Content-length`
//! - User-supplied text is HTML-escaped wherever it lands in markup

use std::fmt::Write;

use url::form_urlencoded;

use crate::chat::escape_html;

const SERVER_NAME: &str = "TinyChat Web Server";
const HTML: &str = "text/html; charset=utf-8";
const PLAIN: &str = "text/plain; charset=utf-8";

/// Status code and reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub code: u16,
    pub reason: &'static str,
}

impl Status {
    pub const OK: Status = Status { code: 200, reason: "OK" };
    pub const BAD_REQUEST: Status = Status { code: 400, reason: "Bad Request" };
    pub const PAYLOAD_TOO_LARGE: Status = Status { code: 413, reason: "Payload Too Large" };
    pub const URI_TOO_LONG: Status = Status { code: 414, reason: "URI Too Long" };
    pub const HEADER_FIELDS_TOO_LARGE: Status = Status {
        code: 431,
        reason: "Request Header Fields Too Large",
    };
    pub const NOT_IMPLEMENTED: Status = Status { code: 501, reason: "Not Implemented" };
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.reason)
    }
}

/// A complete response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    pub fn html(status: Status, body: String) -> Self {
        Self { status, content_type: HTML, body }
    }

    pub fn plain(status: Status, body: String) -> Self {
        Self { status, content_type: PLAIN, body }
    }

    /// Status line, headers, blank line, body.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut head = String::with_capacity(128);
        let _ = write!(
            head,
            "HTTP/1.0 {}\r\n\
             Server: {SERVER_NAME}\r\n\
             Connection: close\r\n\
             Content-length: {}\r\n\
             Content-type: {}\r\n\r\n",
            self.status,
            self.body.len(),
            self.content_type,
        );
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

/// Page asking for a user name and a topic.
pub fn join_form() -> Response {
    let body = String::from(
        "<html><body>\r\n\
         <div align=\"center\"><p>Welcome to TinyChat</p>\r\n\
         <form action=\"conversation\" method=\"post\" \
         enctype=\"application/x-www-form-urlencoded\" accept-charset=\"UTF-8\">\r\n\
         Name: <input type=\"text\" name=\"user\"><br>\r\n\
         Topic: <input type=\"text\" name=\"topic\"><br><br>\r\n\
         <input type=\"submit\" value=\"Join Conversation\">\r\n\
         </form></div></body></html>\r\n",
    );
    Response::html(Status::OK, body)
}

/// The topic's HTML transcript followed by a form for the next message.
pub fn conversation_view(user: &str, topic: &str, transcript_html: &str) -> Response {
    let user = escape_html(user);
    let topic_text = escape_html(topic);
    let topic_param: String = form_urlencoded::byte_serialize(topic.as_bytes()).collect();

    let mut body = String::with_capacity(transcript_html.len() + 512);
    let _ = write!(
        body,
        "<html><body>\r\n\
         <div align=\"center\"><h1>TinyChat - {topic_text}</h1></div>\r\n\
         <form action=\"say?topic={topic_param}\" method=\"post\" \
         enctype=\"application/x-www-form-urlencoded\" accept-charset=\"UTF-8\">\r\n\
         {transcript_html}<br>{user}: <input type=\"text\" name=\"content\">\r\n\
         <input type=\"hidden\" name=\"user\" value=\"{user}\">\
         <input type=\"hidden\" name=\"topic\" value=\"{topic_text}\">\
         <input type=\"submit\" value=\"Send\">\r\n\
         </form></body></html>\r\n"
    );
    Response::html(Status::OK, body)
}

/// The topic's plain transcript, verbatim.
pub fn transcript_poll(transcript_plain: String) -> Response {
    Response::plain(Status::OK, transcript_plain)
}

/// Error page naming the status, a message and the offending input.
pub fn client_error(status: Status, message: &str, cause: &str) -> Response {
    let mut body = String::with_capacity(256);
    let _ = write!(
        body,
        "<html><title>Tiny Error</title><body bgcolor=\"ffffff\">\r\n\
         {status}<p>{}: {}\r\n\
         <hr><em>The Tiny Web server</em>\r\n\
         </body></html>\r\n",
        escape_html(message),
        escape_html(cause),
    );
    Response::html(status, body)
}
