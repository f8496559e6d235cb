use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::*;
use crate::error::{LookupError, Result};
use crate::pipeline::ingestion::pacer::PacingLimits;
use crate::types::ContributorFormat;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub matching: MatchingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub delay_ms: u64,
    pub user_agent: String,
    pub concurrency: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            delay_ms: DEFAULT_DELAY_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn pacing(&self) -> PacingLimits {
        PacingLimits {
            delay: Duration::from_millis(self.delay_ms),
            concurrency: self.concurrency,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub similarity_threshold: f64,
    pub contributor_format: ContributorFormat,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            contributor_format: ContributorFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub report_file: String,
    pub donors_csv: String,
    pub donations_csv: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            report_file: DEFAULT_REPORT_FILE.to_string(),
            donors_csv: DEFAULT_DONORS_CSV.to_string(),
            donations_csv: DEFAULT_DONATIONS_CSV.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.report_file)
    }

    pub fn donors_csv_path(&self) -> PathBuf {
        self.dir.join(&self.donors_csv)
    }

    pub fn donations_csv_path(&self) -> PathBuf {
        self.dir.join(&self.donations_csv)
    }
}

impl Config {
    /// Loads `path` if given, else `donor_lookup.toml` when present, else defaults.
    /// Environment overrides are applied afterwards and the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LookupError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            if !base_url.trim().is_empty() {
                self.lookup.base_url = base_url.trim().to_string();
            }
        }
        if let Ok(delay) = std::env::var(ENV_DELAY_MS) {
            self.lookup.delay_ms = delay.trim().parse().map_err(|_| {
                LookupError::Config(format!("{} must be a whole number of milliseconds, got '{}'", ENV_DELAY_MS, delay))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.matching.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(LookupError::Config(format!(
                "matching.similarity_threshold must be in (0, 1], got {}",
                threshold
            )));
        }
        if self.lookup.concurrency == 0 {
            return Err(LookupError::Config("lookup.concurrency must be at least 1".into()));
        }
        if self.lookup.timeout_seconds == 0 {
            return Err(LookupError::Config("lookup.timeout_seconds must be positive".into()));
        }
        if self.lookup.base_url.trim().is_empty() {
            return Err(LookupError::Config("lookup.base_url must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.lookup.timeout_seconds, 30);
        assert_eq!(config.lookup.delay_ms, 1000);
        assert_eq!(config.matching.similarity_threshold, 0.80);
        assert_eq!(config.matching.contributor_format, ContributorFormat::Inline);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [lookup]
            delay_ms = 250
            concurrency = 3

            [matching]
            contributor_format = "multiline"
            "#,
        )
        .unwrap();
        assert_eq!(config.lookup.delay_ms, 250);
        assert_eq!(config.lookup.concurrency, 3);
        assert_eq!(config.lookup.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.matching.contributor_format, ContributorFormat::Multiline);
        assert_eq!(config.output.report_path(), PathBuf::from("output/donor_lookup_results.json"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let config = Config::from_toml("[matching]\nsimilarity_threshold = 1.5").unwrap();
        assert!(matches!(config.validate(), Err(LookupError::Config(_))));

        let config = Config::from_toml("[lookup]\nconcurrency = 0").unwrap();
        assert!(matches!(config.validate(), Err(LookupError::Config(_))));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(Config::from_toml("[lookup\n"), Err(LookupError::Toml(_))));
    }
}
