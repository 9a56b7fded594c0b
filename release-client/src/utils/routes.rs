//! Reverse routing for dashboard pages.

/// Join URL segments with exactly one slash between them.
pub fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Absolute URL of `path` on the canonical dashboard URL.
pub fn absolute(app_url: &str, path: &str) -> String {
    join(app_url, path)
}

pub fn root() -> String {
    join("/dashboard", "/")
}

pub fn login() -> String {
    join(&root(), "/login")
}

pub fn create_account() -> String {
    join(&root(), "/create-account")
}

pub fn home() -> String {
    root()
}

pub fn profile() -> String {
    join(&root(), "profile")
}

pub fn approvals() -> String {
    join(&root(), "approvals")
}

pub fn releases() -> String {
    join(&root(), "/releases")
}

pub fn create_release() -> String {
    join(&releases(), "/create")
}

pub fn manage_release(uuid: &uuid::Uuid) -> String {
    join(&releases(), &uuid.to_string())
}

pub fn deployment_snapshot() -> String {
    join(&root(), "/deployment-snapshot")
}

pub fn chat() -> String {
    join(&root(), "/chat")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_routes() {
        assert_eq!(root(), "/dashboard/");
        assert_eq!(login(), "/dashboard/login");
        assert_eq!(profile(), "/dashboard/profile");
        assert_eq!(create_release(), "/dashboard/releases/create");
        assert_eq!(deployment_snapshot(), "/dashboard/deployment-snapshot");
    }

    #[test]
    fn test_manage_release_route() {
        let uuid = uuid::Uuid::parse_str("6f9619ff-8b86-d011-b42d-00c04fc964ff").unwrap();
        assert_eq!(
            manage_release(&uuid),
            "/dashboard/releases/6f9619ff-8b86-d011-b42d-00c04fc964ff"
        );
    }

    #[test]
    fn test_absolute_joins_app_url() {
        assert_eq!(
            absolute("https://release.example.com/", &login()),
            "https://release.example.com/dashboard/login"
        );
    }
}
