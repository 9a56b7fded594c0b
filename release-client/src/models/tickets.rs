use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ticket impact and priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Importance::Low),
            2 => Some(Importance::Medium),
            3 => Some(Importance::High),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Importance::Low => 1,
            Importance::Medium => 2,
            Importance::High => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub impact: i32,
    pub priority: i32,
    pub name: String,
    pub assigned_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketResponse {
    #[serde(default)]
    pub uuid: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTicket {
    pub impact: i32,
    pub priority: i32,
    pub opened_by: SimpleAccount,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub name: String,
    pub assigned_to: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllTicketsResponse {
    pub tickets: Vec<SimpleTicket>,
}
