//! WebSocket wire events.
//!
//! Text frames carry JSON objects tagged by a `type` field. The event
//! names (`message`, `previousMessages`) are the protocol the clients
//! already speak, so they are preserved verbatim, camelCase included.
//!
//! Voice payloads are NOT events in this module: they travel as raw
//! binary WebSocket frames with no envelope, since the hub never
//! inspects them.

use serde::{Deserialize, Serialize};

use crate::message::ChatMessage;

/// An inbound text frame from a client.
///
/// Frames that fail to deserialize into this enum (bad JSON, unknown
/// tag, missing field) are dropped by the hub; there is no
/// negative-acknowledgement path back to the sender.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// A new chat message to persist and fan out.
    Message(ChatMessage),
}

/// An outbound text frame pushed from the hub to a client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// One live message, fanned out to every connection after it has
    /// been durably recorded.
    Message(ChatMessage),
    /// The full backlog, sent exactly once per connection right after
    /// it opens and before any live message reaches it.
    PreviousMessages { messages: Vec<ChatMessage> },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ChatMessage {
        ChatMessage {
            username: "alice".to_string(),
            timestamp: "3:00 PM".to_string(),
            content: "hi".to_string(),
        }
    }

    #[test]
    fn test_client_event_message_tag() {
        let json = r#"{"type":"message","username":"alice","timestamp":"3:00 PM","content":"hi"}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        let ClientEvent::Message(msg) = event;
        assert_eq!(msg, sample());
    }

    #[test]
    fn test_client_event_unknown_tag_rejected() {
        let json = r#"{"type":"voice","data":"zzz"}"#;
        let result: Result<ClientEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_event_missing_field_rejected() {
        let json = r#"{"type":"message","username":"alice","content":"hi"}"#;
        let result: Result<ClientEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_message_shape() {
        let json = serde_json::to_value(ServerEvent::Message(sample())).unwrap();
        assert_eq!(json["type"], "message");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_server_event_previous_messages_shape() {
        let event = ServerEvent::PreviousMessages {
            messages: vec![sample()],
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["type"], "previousMessages");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_backlog_serializes_to_empty_array() {
        let event = ServerEvent::PreviousMessages { messages: vec![] };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["messages"].as_array().unwrap().len(), 0);
    }
}
