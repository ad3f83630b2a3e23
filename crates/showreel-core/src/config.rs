//! Configuration module
//!
//! Runtime configuration for the API server and the admin CLI: where the
//! portfolio document and uploaded media live, upload limits, and how the
//! public listing reacts to storage failures.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_FILE: &str = "data/db.json";
const DEFAULT_MEDIA_ROOT: &str = "public";
const MAX_VIDEO_SIZE_MB: usize = 500;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;

/// What `list` does when the backing document cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFailurePolicy {
    /// Log the failure and serve an empty list.
    #[default]
    Degrade,
    /// Surface `StorageUnavailable` to the caller.
    Propagate,
}

impl FromStr for ListFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "degrade" | "empty" => Ok(ListFailurePolicy::Degrade),
            "propagate" | "error" => Ok(ListFailurePolicy::Propagate),
            _ => Err(anyhow::anyhow!(
                "Invalid list failure policy: {} (expected 'degrade' or 'propagate')",
                s
            )),
        }
    }
}

impl Display for ListFailurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ListFailurePolicy::Degrade => write!(f, "degrade"),
            ListFailurePolicy::Propagate => write!(f, "propagate"),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// JSON document holding the portfolio entries.
    pub data_file: PathBuf,
    /// Directory uploaded media is written under (served at `/uploads`).
    pub media_root: PathBuf,
    /// Prefix prepended to stored media paths; empty keeps them site-relative.
    pub media_base_url: String,
    pub list_failure_policy: ListFailurePolicy,
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
            media_base_url: String::new(),
            list_failure_policy: ListFailurePolicy::default(),
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            max_thumbnail_size_bytes: MAX_THUMBNAIL_SIZE_MB * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let list_failure_policy = match env::var("LIST_FAILURE_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => ListFailurePolicy::default(),
        };

        let max_video_size_bytes = size_limit_bytes(
            "MAX_VIDEO_SIZE_MB",
            env::var("MAX_VIDEO_SIZE_MB").ok(),
            MAX_VIDEO_SIZE_MB,
        )?;

        let max_thumbnail_size_bytes = size_limit_bytes(
            "MAX_THUMBNAIL_SIZE_MB",
            env::var("MAX_THUMBNAIL_SIZE_MB").ok(),
            MAX_THUMBNAIL_SIZE_MB,
        )?;

        let config = Config {
            server_port,
            environment,
            cors_origins,
            data_file: env::var("PORTFOLIO_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE)),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MEDIA_ROOT)),
            media_base_url: env::var("MEDIA_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            list_failure_policy,
            max_video_size_bytes,
            max_thumbnail_size_bytes,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("PORTFOLIO_DATA_FILE must not be empty"));
        }

        if self.media_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("MEDIA_ROOT must not be empty"));
        }

        if self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_VIDEO_SIZE_MB must be greater than 0"));
        }

        if self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_THUMBNAIL_SIZE_MB must be greater than 0"
            ));
        }

        if self.cors_origins.is_empty() {
            return Err(anyhow::anyhow!("CORS_ORIGINS must list at least one origin"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Largest request body any route accepts (one video plus one thumbnail).
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_video_size_bytes
            .saturating_add(self.max_thumbnail_size_bytes)
            .saturating_add(1024 * 1024)
    }
}

/// Parse a megabyte limit from `raw` (the value of env var `name`) into bytes.
fn size_limit_bytes(
    name: &str,
    raw: Option<String>,
    default_mb: usize,
) -> Result<usize, anyhow::Error> {
    let mb = match raw {
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", name))?,
        None => default_mb,
    };

    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {}", name, mb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_failure_policy_parses_aliases() {
        assert_eq!(
            "degrade".parse::<ListFailurePolicy>().unwrap(),
            ListFailurePolicy::Degrade
        );
        assert_eq!(
            " Propagate ".parse::<ListFailurePolicy>().unwrap(),
            ListFailurePolicy::Propagate
        );
        assert!("sometimes".parse::<ListFailurePolicy>().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
        assert_eq!(config.list_failure_policy, ListFailurePolicy::Degrade);
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let config = Config {
            max_video_size_bytes: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn size_limit_uses_default_when_unset() {
        assert_eq!(
            size_limit_bytes("MAX_VIDEO_SIZE_MB", None, 500).unwrap(),
            500 * 1024 * 1024
        );
        assert_eq!(
            size_limit_bytes("MAX_VIDEO_SIZE_MB", Some(" 2 ".to_string()), 500).unwrap(),
            2 * 1024 * 1024
        );
    }

    #[test]
    fn size_limit_rejects_non_numeric_values() {
        let err = size_limit_bytes("MAX_VIDEO_SIZE_MB", Some("lots".to_string()), 500)
            .unwrap_err();
        assert!(err.to_string().contains("MAX_VIDEO_SIZE_MB"));
        assert!(size_limit_bytes("MAX_THUMBNAIL_SIZE_MB", Some("-1".to_string()), 10).is_err());
    }

    #[test]
    fn size_limit_rejects_overflowing_values() {
        let err = size_limit_bytes(
            "MAX_THUMBNAIL_SIZE_MB",
            Some(usize::MAX.to_string()),
            10,
        )
        .unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn request_body_limit_covers_both_files() {
        let config = Config::default();
        assert!(config.max_request_body_bytes() > config.max_video_size_bytes);
        assert!(config.max_request_body_bytes() > config.max_thumbnail_size_bytes);
    }
}
