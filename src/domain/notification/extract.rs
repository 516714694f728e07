//! Field-extraction policy for displayed notifications
//!
//! The displayed title and body come from an ordered chain of extractors:
//! the content block first, then the remote origin's nested data payload,
//! then a fixed placeholder. Empty strings fall through to the next
//! extractor.

use super::event::NotificationEvent;

/// Placeholder when no title can be extracted.
pub const NO_TITLE: &str = "No title";

/// Placeholder when no body can be extracted.
pub const NO_BODY: &str = "No message";

type Extractor = fn(&NotificationEvent) -> Option<&str>;

/// Title extractors in priority order.
const TITLE_CHAIN: &[Extractor] = &[content_title, origin_title];

/// Body extractors in priority order.
const BODY_CHAIN: &[Extractor] = &[content_body, origin_message];

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn content_title(event: &NotificationEvent) -> Option<&str> {
    non_empty(event.content.title.as_ref())
}

fn content_body(event: &NotificationEvent) -> Option<&str> {
    non_empty(event.content.body.as_ref())
}

fn origin_title(event: &NotificationEvent) -> Option<&str> {
    non_empty(event.origin_data().and_then(|d| d.title.as_ref()))
}

fn origin_message(event: &NotificationEvent) -> Option<&str> {
    non_empty(event.origin_data().and_then(|d| d.message.as_ref()))
}

fn run_chain<'a>(chain: &[Extractor], event: &'a NotificationEvent, fallback: &'a str) -> &'a str {
    chain.iter().find_map(|f| f(event)).unwrap_or(fallback)
}

/// Derive the displayed title for a notification.
pub fn derive_title(event: Option<&NotificationEvent>) -> &str {
    match event {
        Some(event) => run_chain(TITLE_CHAIN, event, NO_TITLE),
        None => NO_TITLE,
    }
}

/// Derive the displayed body for a notification.
pub fn derive_body(event: Option<&NotificationEvent>) -> &str {
    match event {
        Some(event) => run_chain(BODY_CHAIN, event, NO_BODY),
        None => NO_BODY,
    }
}

/// Serialize the current notification as indented JSON for display.
/// Renders "null" when no notification has arrived yet.
pub fn render_payload(event: Option<&NotificationEvent>) -> String {
    serde_json::to_string_pretty(&event).unwrap_or_else(|_| "null".to_string())
}
