use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, Serializer};

/// Account roles as numbered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    ReleaseAdmin,
    User,
}

impl Role {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Role::Admin),
            2 => Some(Role::ReleaseAdmin),
            3 => Some(Role::User),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Role::Admin => 1,
            Role::ReleaseAdmin => 2,
            Role::User => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRoles {
    pub role: i32,
}

impl SimpleRoles {
    pub fn kind(&self) -> Option<Role> {
        Role::from_code(self.role)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: Secret<String>,
}

/// Result of a successful login, persisted as the auth session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(serialize_with = "expose")]
    pub token: Secret<String>,
    /// Unix timestamp (seconds) after which the token is rejected.
    pub valid_until: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<SimpleRoles>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountResponse {}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: Secret<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePendingRoles {
    pub requested_role: i32,
    pub account: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub roles: Vec<SimpleRoles>,
    #[serde(default)]
    pub requested_roles: Vec<SimplePendingRoles>,
    pub email: String,
    pub msid: String,
    pub team_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePendingResponse {
    pub role: i32,
    pub account: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResponse {
    pub requested_roles: Vec<SimplePendingResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub msid: String,
    pub team_name: String,
}

/// Body of the profile update call: the form plus the roles being requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAccountPayload {
    pub form: UpdateAccountRequest,
    pub roles: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManageApprovalRequest {
    pub role: i32,
    pub account: String,
    pub status: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {}

pub(crate) fn expose<S: Serializer>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_request_sends_password() {
        let request = LoginRequest {
            email: "dev@example.com".to_string(),
            password: Secret::new("hunter2".to_string()),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"email": "dev@example.com", "password": "hunter2"}));
    }

    #[test]
    fn test_role_codes() {
        let roles: Vec<SimpleRoles> = serde_json::from_value(json!([{"role": 2}, {"role": 9}])).unwrap();
        assert_eq!(roles[0].kind(), Some(Role::ReleaseAdmin));
        assert_eq!(roles[1].kind(), None);
        assert_eq!(Role::Admin.code(), 1);
    }
}
