//! The reaction seam.
//!
//! What the agent says back is deliberately pluggable: the router owns the
//! receive/dispatch mechanics, an [`EventHandler`] owns the content. The
//! default [`MarkdownEcho`] mirrors received text back as markdown.

use room_protocol::Event;

/// Decides the reaction to a decoded inbound event.
///
/// Implementations must be cheap and CPU-bound; the router calls `react`
/// on its receive loop and only the publish of the returned event is
/// dispatched concurrently.
pub trait EventHandler: Send + Sync + 'static {
    /// Return the event to publish in reaction to `event`, or `None` to
    /// stay silent. `sender` is the transport-attached participant
    /// identity, or the `"unknown"` sentinel.
    fn react(&self, sender: &str, event: &Event) -> Option<Event>;
}

/// Default handler: echo `user_text` back as quoted markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownEcho;

impl EventHandler for MarkdownEcho {
    fn react(&self, sender: &str, event: &Event) -> Option<Event> {
        match event {
            Event::UserText { text } => Some(Event::AssistantMarkdown {
                markdown: format!("Received from **{sender}**:\n\n> {text}\n"),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_quotes_sender_and_text() {
        let reaction = MarkdownEcho
            .react("user-42", &Event::UserText { text: "hi".to_string() })
            .unwrap();

        match reaction {
            Event::AssistantMarkdown { markdown } => {
                assert!(markdown.contains("user-42"));
                assert!(markdown.contains("hi"));
            }
            other => panic!("expected AssistantMarkdown, got {other:?}"),
        }
    }

    #[test]
    fn test_echo_ignores_other_events() {
        assert_eq!(
            MarkdownEcho.react("user-42", &Event::AssistantMarkdown { markdown: "x".to_string() }),
            None
        );

        let unknown = Event::Unknown {
            event_type: "ping".to_string(),
            payload: serde_json::Map::new(),
        };
        assert_eq!(MarkdownEcho.react("user-42", &unknown), None);
    }

    #[test]
    fn test_echo_handles_empty_text() {
        let reaction = MarkdownEcho
            .react("unknown", &Event::UserText { text: String::new() })
            .unwrap();
        assert!(matches!(reaction, Event::AssistantMarkdown { .. }));
    }
}
