use super::types::{Config, ConfigError};
use crate::cli::Cli;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_PROFILE: &str = "BUCKETBILL_PROFILE";
pub const ENV_REGION: &str = "BUCKETBILL_REGION";
pub const ENV_CONCURRENCY: &str = "BUCKETBILL_CONCURRENCY";

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config file path (~/.bucketbill/config.toml)
    pub fn get_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            home.join(".bucketbill").join("config.toml")
        } else {
            PathBuf::from(".bucketbill/config.toml")
        }
    }

    /// Resolve the effective configuration: defaults < file < environment < CLI
    pub fn resolve(cli: &Cli) -> Result<Config, ConfigError> {
        let mut config = match &cli.config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Config::load()?,
        };
        config.apply_env();
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Config, ConfigError> {
        let config_path = ConfigLoader::get_config_path();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        ConfigLoader::load_from_path(config_path)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Create the default config file unless one already exists
    pub fn init() -> Result<(), ConfigError> {
        let config_path = ConfigLoader::get_config_path();

        if !config_path.exists() {
            Config::default().save_to(&config_path)?;
            println!("Created config at {}", config_path.display());
        } else {
            println!("Config already exists at {}", config_path.display());
        }

        Ok(())
    }

    /// Print configuration as TOML
    pub fn print(&self) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        println!("{}", content);
        Ok(())
    }

    /// Apply `BUCKETBILL_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(profile) = lookup(ENV_PROFILE).filter(|v| !v.trim().is_empty()) {
            self.profile = profile;
        }

        if let Some(region) = lookup(ENV_REGION).filter(|v| !v.trim().is_empty()) {
            self.region = region;
        }

        if let Some(raw) = lookup(ENV_CONCURRENCY) {
            match raw.trim().parse::<usize>() {
                Ok(value) => self.concurrency = value,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_CONCURRENCY),
            }
        }
    }

    /// Command line flags win over every other source
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(profile) = &cli.profile {
            self.profile = profile.clone();
        }
        if let Some(region) = &cli.region {
            self.region = region.clone();
        }
        if let Some(concurrency) = cli.concurrency {
            self.concurrency = concurrency;
        }
        if cli.verbose {
            self.verbose = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
profile = "billing"
concurrency = 5

[prices]
StandardStorage = 0.023
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.profile, "billing");
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.region, "ap-northeast-1");
        assert_eq!(config.prices.get("StandardStorage"), Some(&0.023));
    }

    #[test]
    fn test_load_empty_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "\n").unwrap();

        assert_eq!(ConfigLoader::load_from_path(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_load_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "concurrency = \"many\"").unwrap();

        assert!(matches!(
            ConfigLoader::load_from_path(&path),
            Err(ConfigError::Corrupted(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.verbose = true;
        config.prices.insert("GlacierStorage".to_string(), 0.0045);
        config.save_to(&path).unwrap();

        assert_eq!(ConfigLoader::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_PROFILE, "ops"),
            (ENV_REGION, "us-west-2"),
            (ENV_CONCURRENCY, "8"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.profile, "ops");
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.concurrency, 8);
    }

    #[test]
    fn test_invalid_env_concurrency_is_ignored() {
        let mut config = Config::default();
        config.apply_env_with(|key| (key == ENV_CONCURRENCY).then(|| "lots".to_string()));
        assert_eq!(config.concurrency, 20);
    }

    #[test]
    fn test_cli_wins_over_env() {
        let cli = Cli::parse_from(["bucketbill", "-p", "prod", "-v", "-j", "4"]);

        let mut config = Config::default();
        config.apply_env_with(|key| (key == ENV_PROFILE).then(|| "ops".to_string()));
        config.apply_cli(&cli);

        assert_eq!(config.profile, "prod");
        assert_eq!(config.concurrency, 4);
        assert!(config.verbose);
        assert_eq!(config.region, "ap-northeast-1");
    }

    #[test]
    fn test_resolve_rejects_zero_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "concurrency = 0").unwrap();

        let cli = Cli::parse_from(["bucketbill", "--config", path.to_str().unwrap()]);
        assert!(matches!(
            ConfigLoader::resolve(&cli),
            Err(ConfigError::ZeroConcurrency)
        ));
    }
}
