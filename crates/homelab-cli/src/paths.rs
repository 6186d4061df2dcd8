//! Inventory path resolution

use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.yaml";
const APP_DIR: &str = "homelab-cli";

/// Pick the inventory file to load
///
/// An explicit path always wins. Otherwise `config.yaml` next to the
/// executable is used, then the per-user config directory if a file exists
/// there. When neither exists the executable-relative path is returned so the
/// not-found error names it.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    match explicit {
        Some(path) => path,
        None => select(&installed_config_path(), user_config_path().as_deref()),
    }
}

fn select(installed: &Path, user: Option<&Path>) -> PathBuf {
    if installed.exists() {
        return installed.to_path_buf();
    }

    match user {
        Some(user) if user.exists() => user.to_path_buf(),
        _ => installed.to_path_buf(),
    }
}

fn installed_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = PathBuf::from("/nonexistent/lab.yaml");
        assert_eq!(resolve_config_path(Some(path.clone())), path);
    }

    #[test]
    fn test_installed_preferred_over_user() {
        let dir = tempfile::tempdir().unwrap();
        let installed = dir.path().join("config.yaml");
        let user = dir.path().join("user.yaml");
        std::fs::write(&installed, "x").unwrap();
        std::fs::write(&user, "x").unwrap();

        assert_eq!(select(&installed, Some(&user)), installed);
    }

    #[test]
    fn test_user_config_used_when_installed_missing() {
        let dir = tempfile::tempdir().unwrap();
        let installed = dir.path().join("config.yaml");
        let user = dir.path().join("user.yaml");
        std::fs::write(&user, "x").unwrap();

        assert_eq!(select(&installed, Some(&user)), user);
    }

    #[test]
    fn test_falls_back_to_installed_path() {
        let dir = tempfile::tempdir().unwrap();
        let installed = dir.path().join("config.yaml");
        let user = dir.path().join("missing.yaml");

        assert_eq!(select(&installed, Some(&user)), installed);
        assert_eq!(select(&installed, None), installed);
    }
}
