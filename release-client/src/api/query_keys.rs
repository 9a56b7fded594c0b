//! Cache keys: the operation name followed by the query parameters.

use crate::models::chat::ChatSessionRequest;
use crate::models::releases::ReleaseQuery;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) => write!(f, "{}", s),
            KeyPart::Int(i) => write!(f, "{}", i),
            KeyPart::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl From<bool> for KeyPart {
    fn from(value: bool) -> Self {
        KeyPart::Bool(value)
    }
}

impl From<Uuid> for KeyPart {
    fn from(value: Uuid) -> Self {
        KeyPart::Str(value.to_string())
    }
}

/// Ordered tuple compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(Vec<KeyPart>);

impl CacheKey {
    pub fn new(operation: &str) -> Self {
        CacheKey(vec![KeyPart::from(operation)])
    }

    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn for_operation<P: KeyParams + ?Sized>(operation: &str, params: &P) -> Self {
        let mut key = CacheKey::new(operation);
        key.0.extend(params.key_parts());
        key
    }

    pub fn operation(&self) -> Option<&KeyPart> {
        self.0.first()
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Parameters that take part in a query's cache key.
pub trait KeyParams {
    fn key_parts(&self) -> Vec<KeyPart>;
}

impl KeyParams for () {
    fn key_parts(&self) -> Vec<KeyPart> {
        Vec::new()
    }
}

impl KeyParams for ChatSessionRequest {
    fn key_parts(&self) -> Vec<KeyPart> {
        vec![KeyPart::from(self.session_id)]
    }
}

impl KeyParams for ReleaseQuery {
    fn key_parts(&self) -> Vec<KeyPart> {
        vec![KeyPart::from(self.uuid)]
    }
}

pub fn accounts_api_me() -> CacheKey {
    CacheKey::new("accountsApiMe")
}

pub fn accounts_api_all_pending() -> CacheKey {
    CacheKey::new("accountsApiAllPending")
}

pub fn app_api_public_ping_details() -> CacheKey {
    CacheKey::new("appApiPublicPingDetails")
}

pub fn app_api_private_ping_details() -> CacheKey {
    CacheKey::new("appApiPrivatePingDetails")
}

pub fn tickets_api_get_all_tickets() -> CacheKey {
    CacheKey::new("ticketsApiGetAllTickets")
}

pub fn releases_api_get_constant_and_users() -> CacheKey {
    CacheKey::new("releasesApiGetConstantAndUsers")
}

pub fn releases_api_get_all_releases() -> CacheKey {
    CacheKey::new("releasesApiGetAllReleases")
}

pub fn releases_api_get_release_with_uuid(uuid: Uuid) -> CacheKey {
    CacheKey::new("releasesApiGetReleaseWithUuid").with(uuid)
}

pub fn releases_api_deployment_snapshot() -> CacheKey {
    CacheKey::new("releasesApiDeploymentSnapshot")
}

pub fn chat_api_get_all_chat_sessions() -> CacheKey {
    CacheKey::new("chatApiGetAllChatSessions")
}

pub fn chat_api_get_chat(session_id: Uuid) -> CacheKey {
    CacheKey::new("chatApiGetChat").with(session_id)
}
