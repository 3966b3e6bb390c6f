use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speaker role for a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript as displayed by the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Reduce to the wire representation sent to the completion endpoint
    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Wire-level turn: exactly `{role, content}`, nothing else is transmitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_turn_has_only_role_and_content() {
        let turn = ChatTurn::user("hi");
        let value = serde_json::to_value(&turn).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["role"], "user");
        assert_eq!(obj["content"], "hi");
    }

    #[test]
    fn test_message_reduction_strips_metadata() {
        let msg = Message::new(Role::Assistant, "hello");
        let turn = msg.to_turn();
        let value = serde_json::to_value(&turn).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("timestamp").is_none());
        assert_eq!(turn.content, "hello");
    }

    #[test]
    fn test_typed_and_spoken_turns_are_identical() {
        // A transcribed "hi" and a typed "hi" must serialize byte-identically
        let spoken = Message::new(Role::User, "hi").to_turn();
        let typed = ChatTurn::user("hi");
        assert_eq!(
            serde_json::to_string(&spoken).unwrap(),
            serde_json::to_string(&typed).unwrap()
        );
    }
}
