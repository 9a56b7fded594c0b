use super::tickets::SimpleAccount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderType {
    User,
    Agent,
}

impl SenderType {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SenderType::User),
            1 => Some(SenderType::Agent),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            SenderType::User => 0,
            SenderType::Agent => 1,
        }
    }
}

/// A question for the release assistant. Without `session_id` a new
/// session is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    pub user_query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub agent_response: String,
    pub session_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAllChat {
    pub session_id: Uuid,
    pub title_truncated: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: SimpleAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAllChatSessionsResponse {
    pub chat_session_list: Vec<SimpleAllChat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleChatMessage {
    pub sender_type: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl SimpleChatMessage {
    pub fn sender(&self) -> Option<SenderType> {
        SenderType::from_code(self.sender_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleGetChat {
    pub session_id: Uuid,
    pub messages: Vec<SimpleChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetChatResponse {
    pub chat_data: SimpleGetChat,
}

/// Body of the calls addressing one chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatSessionRequest {
    pub session_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteChatResponse {
    pub session_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_transcript_decodes() {
        let response: GetChatResponse = serde_json::from_value(json!({
            "chat_data": {
                "session_id": "6f9619ff-8b86-d011-b42d-00c04fc964ff",
                "messages": [
                    {"sender_type": 0, "text": "Is 2.1 approved?", "created_at": "2024-05-01T10:00:00Z"},
                    {"sender_type": 1, "text": "Not yet.", "created_at": "2024-05-01T10:00:02Z"}
                ]
            }
        }))
        .unwrap();

        let senders: Vec<_> = response.chat_data.messages.iter().map(SimpleChatMessage::sender).collect();
        assert_eq!(senders, vec![Some(SenderType::User), Some(SenderType::Agent)]);
    }

    #[test]
    fn test_new_session_omits_session_id() {
        let request = ChatRequest {
            session_id: None,
            user_query: "hello".to_string(),
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"user_query": "hello"}));
    }
}
