use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub app: AppSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Base URL of the RelEase backend (e.g., https://release.example.com).
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppSettings {
    /// Canonical URL of the dashboard, used to build absolute links.
    pub url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StorageSettings {
    /// Directory holding persisted client state.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
    /// Key the auth session is stored under.
    #[serde(default = "default_auth_key")]
    pub auth_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            auth_key: default_auth_key(),
        }
    }
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".release")
}

fn default_auth_key() -> String {
    "$auth".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// OTLP collector endpoint; spans are only exported when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Settings pointing at `base_url`, everything else defaulted.
    pub fn for_api(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiSettings {
                base_url: base_url.into(),
                timeout_secs: default_timeout_secs(),
            },
            app: AppSettings {
                url: "http://localhost:3000".to_string(),
            },
            storage: StorageSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Load `release-client/config/base.yaml` overlaid with `RELEASE_*` variables,
/// e.g. `RELEASE_API__BASE_URL` or `RELEASE_APP__URL`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    release_core::config::load_settings("release-client", "RELEASE")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_base_configuration_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
        let settings: Settings =
            release_core::config::load_settings_from(&dir, "RELEASE_TEST_UNUSED").unwrap();

        assert_eq!(settings.api.base_url, "http://localhost:8000");
        assert_eq!(settings.api.timeout(), Duration::from_secs(30));
        assert_eq!(settings.storage.auth_key, "$auth");
        assert!(settings.logging.otlp_endpoint.is_none());
    }
}
