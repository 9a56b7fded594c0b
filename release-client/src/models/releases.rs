use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::accounts::SimpleRoles;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleConstant {
    pub repo: String,
    pub service: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantResponse {
    pub constants: Vec<SimpleConstant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleReleaseItem {
    pub repo: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devops_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAllConstantRelease {
    pub items: Vec<SimpleReleaseItem>,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantUserResponse {
    pub constants: Vec<SimpleConstant>,
    pub users: Vec<SimpleUser>,
    pub release_list: Vec<SimpleAllConstantRelease>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTalendReleaseItem {
    pub job_name: String,
    pub package_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleRelease {
    pub items: Vec<SimpleReleaseItem>,
    pub talend_items: Vec<SimpleTalendReleaseItem>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_window: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReleaseRequest {
    pub release: SimpleRelease,
    /// Role codes of the approver groups.
    pub approvers: Vec<i32>,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleUpdateRelease {
    pub items: Vec<SimpleReleaseItem>,
    pub talend_items: Vec<SimpleTalendReleaseItem>,
    pub deployment_status: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReleaseRequest {
    pub release: SimpleUpdateRelease,
    pub targets: Vec<String>,
    pub uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReleaseRequest {
    pub uuid: Uuid,
}

/// Query string of the calls addressing a single release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseQuery {
    pub uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeApprovalQuery {
    pub uuid: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleApprover {
    /// Role code of the approving group.
    pub group: i32,
    #[serde(default)]
    pub approved: Option<bool>,
}

impl SimpleApprover {
    pub fn role(&self) -> SimpleRoles {
        SimpleRoles { role: self.group }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTarget {
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAllRelease {
    pub approvers: Vec<SimpleApprover>,
    pub created_by: SimpleUser,
    pub updated_by: SimpleUser,
    pub targets: Vec<SimpleTarget>,
    pub deployment_status: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub start_window: Option<String>,
    #[serde(default)]
    pub end_window: Option<String>,
    #[serde(default)]
    pub deployment_comment: Option<String>,
}

impl SimpleAllRelease {
    /// A release is fully approved once every approver group signed off.
    pub fn is_approved(&self) -> bool {
        !self.approvers.is_empty() && self.approvers.iter().all(|a| a.approved == Some(true))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllReleaseResponse {
    pub release_list: Vec<SimpleAllRelease>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleGetRelease {
    pub items: Vec<SimpleReleaseItem>,
    pub talend_items: Vec<SimpleTalendReleaseItem>,
    pub approvers: Vec<SimpleApprover>,
    pub targets: Vec<SimpleTarget>,
    pub deployment_status: i32,
    pub name: String,
    #[serde(default)]
    pub start_window: Option<String>,
    #[serde(default)]
    pub end_window: Option<String>,
    #[serde(default)]
    pub deployment_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetReleaseResponse {
    pub release_data: SimpleGetRelease,
    pub constants: Vec<SimpleConstant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleDeploymentSnapshot {
    pub azure_repo: String,
    pub commit_hash: String,
    pub deployed_by: String,
    pub deployment_date: String,
    pub docker_tag: String,
    pub repo_name: String,
    pub target_env: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDeploymentSnapshotResponse {
    pub snapshot_data: Vec<SimpleDeploymentSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSnapshotRequest {
    pub docker_tag: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> serde_json::Value {
        json!({"first_name": "Ada", "last_name": "L", "email": "ada@example.com"})
    }

    #[test]
    fn test_release_listing_decodes() {
        let value = json!({
            "release_list": [{
                "approvers": [{"group": 1, "approved": true}, {"group": 2}],
                "created_by": user(),
                "updated_by": user(),
                "targets": [{"target": "prod"}],
                "deployment_status": 0,
                "created_at": "2024-03-01T10:00:00Z",
                "updated_at": "2024-03-02T10:00:00Z",
                "uuid": "6f9619ff-8b86-d011-b42d-00c04fc964ff",
                "name": "March train"
            }]
        });

        let listing: AllReleaseResponse = serde_json::from_value(value).unwrap();
        let release = &listing.release_list[0];
        assert_eq!(release.name, "March train");
        assert_eq!(release.targets[0].target, "prod");
        assert!(!release.is_approved());
        assert_eq!(release.approvers[0].role().role, 1);
    }

    #[test]
    fn test_release_query_serializes_uuid() {
        let uuid = Uuid::parse_str("6f9619ff-8b86-d011-b42d-00c04fc964ff").unwrap();
        let query = serde_urlencoded::to_string(ReleaseQuery { uuid }).unwrap();
        assert_eq!(query, "uuid=6f9619ff-8b86-d011-b42d-00c04fc964ff");
    }
}
