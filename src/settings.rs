use crate::identity::ClaimPolicy;
use crate::session::navigation::LOGIN_ROUTE;
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Environment variable naming a directory whose `Settings.toml` overrides
/// the one in the working directory
pub const CONFIG_DIR_ENV: &str = "SHOPEASE_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Toml(#[from] basic_toml::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopeaseSettings {
    pub storage: StorageSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Location of the JSON file used by the file backend
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// How to treat tokens whose claims lack `sub` or `role`
    pub claim_policy: ClaimPolicy,
    /// Route requested from the host navigator after logout
    pub login_route: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: "shopease_storage.json".to_string(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            claim_policy: ClaimPolicy::Lenient,
            login_route: LOGIN_ROUTE.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl StorageSettings {
    /// Instantiate the configured persistence medium
    #[must_use]
    pub fn build_store(&self) -> Arc<dyn KeyValueStore> {
        match self.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => Arc::new(FileStore::new(&self.path)),
        }
    }
}

impl ShopeaseSettings {
    /// Load settings from configuration files and environment variables, then
    /// initialize logging
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A settings file exists but cannot be read
    /// - TOML parsing fails
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        settings.apply_env_overrides();
        settings.init_logging();

        Ok(settings)
    }

    /// Parse settings from TOML text; missing sections fall back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for these settings.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        Ok(basic_toml::from_str(contents)?)
    }

    /// Load base settings from TOML file(s) or use defaults
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (applied separately afterwards)
    /// 2. Settings.toml in `SHOPEASE_CONFIG_DIR` (if set and present)
    /// 3. Settings.toml in the current directory (if present)
    /// 4. Defaults
    fn load_base_settings() -> Result<Self, SettingsError> {
        Self::load_base_settings_from(Path::new("Settings.toml"))
    }

    fn load_base_settings_from(local_path: &Path) -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        if let Some(local) = Self::read_settings_file(local_path)? {
            settings = local;
        }

        if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
            let config_path = Path::new(&config_dir).join("Settings.toml");
            match Self::read_settings_file(&config_path)? {
                Some(overriding) => settings = overriding,
                None => println!(
                    "ℹ {CONFIG_DIR_ENV} set but no Settings.toml found at: {}",
                    config_path.display()
                ),
            }
        }

        Ok(settings)
    }

    fn read_settings_file(path: &Path) -> Result<Option<Self>, SettingsError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&contents)?;
        println!("✓ Loaded settings from {}", path.display());
        Ok(Some(settings))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(backend) = std::env::var("SHOPEASE_STORAGE_BACKEND") {
            match backend.trim().to_ascii_lowercase().as_str() {
                "memory" => self.storage.backend = StorageBackend::Memory,
                "file" => self.storage.backend = StorageBackend::File,
                other => eprintln!("⚠️  Ignoring unknown SHOPEASE_STORAGE_BACKEND '{other}'"),
            }
        }
        if let Ok(path) = std::env::var("SHOPEASE_STORAGE_PATH") {
            self.storage.path = path;
        }
        if let Ok(policy) = std::env::var("SHOPEASE_CLAIM_POLICY") {
            match policy.parse::<ClaimPolicy>() {
                Ok(policy) => self.session.claim_policy = policy,
                Err(e) => eprintln!("⚠️  Ignoring SHOPEASE_CLAIM_POLICY: {e}"),
            }
        }
        if let Ok(route) = std::env::var("SHOPEASE_LOGIN_ROUTE") {
            self.session.login_route = route;
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Initialize `env_logger` with the configured level
    ///
    /// A logger that is already installed is left in place.
    fn init_logging(&self) {
        if env_logger::Builder::new()
            .parse_filters(&self.logging.level)
            .try_init()
            .is_err()
        {
            log::debug!("Logger already initialized; keeping existing configuration");
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        Self::load_env_from(Path::new(".env"));
    }

    fn load_env_from(path: &Path) {
        if let Ok(contents) = fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write_settings(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("Settings.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    const ENV_VARS: &[&str] = &[
        "SHOPEASE_STORAGE_BACKEND",
        "SHOPEASE_STORAGE_PATH",
        "SHOPEASE_CLAIM_POLICY",
        "SHOPEASE_LOGIN_ROUTE",
        "RUST_LOG",
        CONFIG_DIR_ENV,
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let settings = ShopeaseSettings::default();
        assert_eq!(settings.storage.backend, StorageBackend::File);
        assert_eq!(settings.storage.path, "shopease_storage.json");
        assert_eq!(settings.session.claim_policy, ClaimPolicy::Lenient);
        assert_eq!(settings.session.login_route, "/login");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = ShopeaseSettings::from_toml_str(
            r#"
            [session]
            claim_policy = "strict"

            [storage]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(settings.session.claim_policy, ClaimPolicy::Strict);
        assert_eq!(settings.session.login_route, "/login");
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.storage.path, "shopease_storage.json");
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        assert!(ShopeaseSettings::from_toml_str("[session]\nclaim_policy = \"maybe\"").is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("SHOPEASE_STORAGE_BACKEND", "memory");
        std::env::set_var("SHOPEASE_STORAGE_PATH", "/tmp/other.json");
        std::env::set_var("SHOPEASE_CLAIM_POLICY", "strict");
        std::env::set_var("SHOPEASE_LOGIN_ROUTE", "/connexion");
        std::env::set_var("RUST_LOG", "debug");

        let mut settings = ShopeaseSettings::default();
        settings.apply_env_overrides();
        clear_env();

        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.storage.path, "/tmp/other.json");
        assert_eq!(settings.session.claim_policy, ClaimPolicy::Strict);
        assert_eq!(settings.session.login_route, "/connexion");
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    #[serial]
    fn test_invalid_env_values_are_ignored() {
        clear_env();
        std::env::set_var("SHOPEASE_STORAGE_BACKEND", "cloud");
        std::env::set_var("SHOPEASE_CLAIM_POLICY", "paranoid");

        let mut settings = ShopeaseSettings::default();
        settings.apply_env_overrides();
        clear_env();

        assert_eq!(settings.storage.backend, StorageBackend::File);
        assert_eq!(settings.session.claim_policy, ClaimPolicy::Lenient);
    }

    #[test]
    #[serial]
    fn test_local_file_overrides_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let local = write_settings(&dir, "[session]\nclaim_policy = \"strict\"\n");

        let settings = ShopeaseSettings::load_base_settings_from(&local).unwrap();

        assert_eq!(settings.session.claim_policy, ClaimPolicy::Strict);
        assert_eq!(settings.session.login_route, "/login");
    }

    #[test]
    #[serial]
    fn test_config_dir_file_overrides_local_file() {
        clear_env();
        let local_dir = TempDir::new().unwrap();
        let local = write_settings(&local_dir, "[session]\nlogin_route = \"/local\"\n");
        let config_dir = TempDir::new().unwrap();
        write_settings(&config_dir, "[storage]\nbackend = \"memory\"\n");
        std::env::set_var(CONFIG_DIR_ENV, config_dir.path());

        let settings = ShopeaseSettings::load_base_settings_from(&local).unwrap();
        clear_env();

        // The config-dir file replaces the local one wholesale
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.session.login_route, "/login");
    }

    #[test]
    #[serial]
    fn test_config_dir_without_file_keeps_local_settings() {
        clear_env();
        let local_dir = TempDir::new().unwrap();
        let local = write_settings(&local_dir, "[session]\nlogin_route = \"/local\"\n");
        let empty_dir = TempDir::new().unwrap();
        std::env::set_var(CONFIG_DIR_ENV, empty_dir.path());

        let settings = ShopeaseSettings::load_base_settings_from(&local).unwrap();
        clear_env();

        assert_eq!(settings.session.login_route, "/local");
    }

    #[test]
    #[serial]
    fn test_invalid_config_dir_file_is_reported() {
        clear_env();
        let config_dir = TempDir::new().unwrap();
        write_settings(&config_dir, "[storage\n");
        std::env::set_var(CONFIG_DIR_ENV, config_dir.path());

        let result = ShopeaseSettings::load_base_settings_from(Path::new("missing/Settings.toml"));
        clear_env();

        assert!(matches!(result, Err(SettingsError::Toml(_))));
    }

    #[test]
    #[serial]
    fn test_load_applies_env_over_config_file() {
        clear_env();
        let config_dir = TempDir::new().unwrap();
        write_settings(
            &config_dir,
            "[storage]\nbackend = \"memory\"\n\n[session]\nclaim_policy = \"strict\"\nlogin_route = \"/from-file\"\n",
        );
        std::env::set_var(CONFIG_DIR_ENV, config_dir.path());
        std::env::set_var("SHOPEASE_LOGIN_ROUTE", "/from-env");

        let settings = ShopeaseSettings::load().unwrap();
        clear_env();

        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.session.claim_policy, ClaimPolicy::Strict);
        assert_eq!(settings.session.login_route, "/from-env");
    }

    #[test]
    #[serial]
    fn test_env_file_sets_variables() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let env_path = dir.path().join(".env");
        fs::write(
            &env_path,
            "# local overrides\n\nSHOPEASE_CLAIM_POLICY = strict\nSHOPEASE_LOGIN_ROUTE=/anmelden\nnot a pair\n",
        )
        .unwrap();

        ShopeaseSettings::load_env_from(&env_path);
        let mut settings = ShopeaseSettings::default();
        settings.apply_env_overrides();
        clear_env();

        assert_eq!(settings.session.claim_policy, ClaimPolicy::Strict);
        assert_eq!(settings.session.login_route, "/anmelden");
    }
}
