use anyhow::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the biodiesel lab
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LabConfig {
    /// Simulation settings
    pub lab: LabSettings,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LabSettings {
    /// How long the reaction runs before the mixture separates
    pub reaction_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON lines instead of human-readable logs
    pub json_logs: bool,
}

impl Default for LabSettings {
    fn default() -> Self {
        Self {
            reaction_delay_ms: 3000,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl LabSettings {
    pub fn reaction_delay(&self) -> Duration {
        Duration::from_millis(self.reaction_delay_ms)
    }
}

pub const CONFIG_FILE: &str = "biodiesel-lab.toml";
pub const RC_FILE: &str = ".biodiesel-lab-rc";
pub const ENV_PREFIX: &str = "BIODIESEL_LAB";

impl LabConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (biodiesel-lab.toml, .biodiesel-lab-rc)
    /// 3. Environment variables (e.g. BIODIESEL_LAB_LAB__REACTION_DELAY_MS)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`LabConfig::load`] but looks for config files in `dir`
    pub fn load_from(dir: &Path) -> Result<Self> {
        let builder = Config::builder()
            .add_source(Config::try_from(&LabConfig::default())?)
            .add_source(File::new(&dir.join(CONFIG_FILE).to_string_lossy(), FileFormat::Toml).required(false))
            .add_source(File::new(&dir.join(RC_FILE).to_string_lossy(), FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<LabConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = LabConfig::load_env_file();
        LabConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static LabConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serialise env-sensitive tests and strip any BIODIESEL_LAB_* overrides
    fn isolated_env() -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let prefix = format!("{ENV_PREFIX}_");
        let inherited: Vec<String> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(&prefix))
            .collect();
        for key in inherited {
            std::env::remove_var(key);
        }
        guard
    }

    fn scratch_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("biodiesel-lab-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults_when_no_files() {
        let _env = isolated_env();
        let dir = scratch_dir();
        let config = LabConfig::load_from(&dir).unwrap();

        assert_eq!(config.lab.reaction_delay_ms, 3000);
        assert_eq!(config.lab.reaction_delay(), Duration::from_secs(3));
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let _env = isolated_env();
        let dir = scratch_dir();
        std::fs::write(
            dir.join(CONFIG_FILE),
            "[lab]\nreaction_delay_ms = 500\n\n[observability]\njson_logs = true\n",
        )
        .unwrap();

        let config = LabConfig::load_from(&dir).unwrap();

        assert_eq!(config.lab.reaction_delay_ms, 500);
        assert!(config.observability.json_logs);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_rc_file_takes_precedence_over_config_file() {
        let _env = isolated_env();
        let dir = scratch_dir();
        std::fs::write(dir.join(CONFIG_FILE), "[lab]\nreaction_delay_ms = 500\n").unwrap();
        std::fs::write(dir.join(RC_FILE), "[lab]\nreaction_delay_ms = 750\n").unwrap();

        let config = LabConfig::load_from(&dir).unwrap();

        assert_eq!(config.lab.reaction_delay_ms, 750);
    }

    #[test]
    fn test_save_then_load() {
        let _env = isolated_env();
        let dir = scratch_dir();
        let mut config = LabConfig::default();
        config.lab.reaction_delay_ms = 1200;
        config.observability.log_level = "debug".to_string();

        config.save_to_file(dir.join(CONFIG_FILE)).unwrap();

        assert_eq!(LabConfig::load_from(&dir).unwrap(), config);
    }

    #[test]
    fn test_env_overrides_files() {
        let _env = isolated_env();
        let dir = scratch_dir();
        std::fs::write(dir.join(RC_FILE), "[lab]\nreaction_delay_ms = 750\n").unwrap();

        std::env::set_var("BIODIESEL_LAB_LAB__REACTION_DELAY_MS", "250");
        std::env::set_var("BIODIESEL_LAB_OBSERVABILITY__LOG_LEVEL", "trace");
        let config = LabConfig::load_from(&dir);
        std::env::remove_var("BIODIESEL_LAB_LAB__REACTION_DELAY_MS");
        std::env::remove_var("BIODIESEL_LAB_OBSERVABILITY__LOG_LEVEL");

        let config = config.unwrap();
        assert_eq!(config.lab.reaction_delay_ms, 250);
        assert_eq!(config.observability.log_level, "trace");
    }
}
