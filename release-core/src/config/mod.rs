use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Locate the `config/` directory of a workspace member.
///
/// Works both when the process is started from the workspace root and from
/// inside the member directory.
pub fn configuration_directory(base_path: &Path, member: &str) -> PathBuf {
    if base_path.ends_with(member) {
        base_path.join("config")
    } else {
        base_path.join(member).join("config")
    }
}

/// Load layered settings for `member`.
///
/// Sources, later ones winning:
/// 1. `<member>/config/base.yaml` (required)
/// 2. environment variables `<PREFIX>_<SECTION>__<KEY>`, after `.env` is read
pub fn load_settings<T: DeserializeOwned>(member: &str, env_prefix: &str) -> Result<T, ConfigError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("cannot determine current directory: {}", e)))?;

    load_settings_from(&configuration_directory(&base_path, member), env_prefix)
}

/// Same as [`load_settings`] with an explicit configuration directory.
pub fn load_settings_from<T: DeserializeOwned>(
    configuration_directory: &Path,
    env_prefix: &str,
) -> Result<T, ConfigError> {
    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_directory_from_member() {
        let dir = configuration_directory(Path::new("/work/release-client"), "release-client");
        assert_eq!(dir, PathBuf::from("/work/release-client/config"));
    }

    #[test]
    fn test_configuration_directory_from_workspace_root() {
        let dir = configuration_directory(Path::new("/work"), "release-client");
        assert_eq!(dir, PathBuf::from("/work/release-client/config"));
    }
}
