use serde::{Deserialize, Serialize};

use crate::models::Message;

/// Events pushed by the server over the realtime channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RealtimeEvent {
    /// A new chat message was posted in a joined room
    #[serde(rename = "message:new")]
    MessageNew(Message),
}

/// Commands sent FROM client TO server over the realtime channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RealtimeCommand {
    /// Start receiving events for a match room
    #[serde(rename = "room:join")]
    RoomJoin(String),

    /// Stop receiving events for a match room
    #[serde(rename = "room:leave")]
    RoomLeave(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commands_use_room_event_names() {
        let join = serde_json::to_value(RealtimeCommand::RoomJoin("m1".into())).unwrap();
        assert_eq!(join, json!({ "type": "room:join", "data": "m1" }));
        let leave = serde_json::to_value(RealtimeCommand::RoomLeave("m1".into())).unwrap();
        assert_eq!(leave, json!({ "type": "room:leave", "data": "m1" }));
    }

    #[test]
    fn message_new_carries_message() {
        let event: RealtimeEvent = serde_json::from_value(json!({
            "type": "message:new",
            "data": { "id": "x", "content": "yo", "createdAt": "2025-03-01T10:00:00Z", "senderId": "u2" }
        }))
        .unwrap();
        let RealtimeEvent::MessageNew(msg) = event;
        assert_eq!(msg.content, "yo");
    }

    #[test]
    fn unknown_event_is_rejected() {
        let result = serde_json::from_value::<RealtimeEvent>(json!({ "type": "typing", "data": {} }));
        assert!(result.is_err());
    }
}
