use crate::error::{AppError, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_PANEL_TITLE: &str = "Easy Agile Planning Poker";
const DEFAULT_DATABASE_URL: &str = "sqlite:poker_tally.db";
const DEFAULT_ESTIMATE_FIELD: &str = "customfield_10002";

#[derive(Debug, Clone)]
pub struct Config {
    pub panel_title: String,
    pub database_url: String,
    pub watch_interval_seconds: u64,
    pub discovery_retries: u32,
    pub issue: Option<IssueConfig>,
}

/// Connection details for the issue tracker's REST API.
#[derive(Debug, Clone)]
pub struct IssueConfig {
    pub base_url: String,
    pub api_token: String,
    pub estimate_field: String,
}

impl Config {
    /// Reads configuration from the environment. Call `dotenvy::dotenv()` first
    /// if a `.env` file should be honored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Issue tracker settings are optional, but only as a pair
        let issue = match (lookup("ISSUE_BASE_URL"), lookup("ISSUE_API_TOKEN")) {
            (Some(base_url), Some(api_token)) => Some(IssueConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_token,
                estimate_field: lookup("ISSUE_ESTIMATE_FIELD")
                    .unwrap_or_else(|| DEFAULT_ESTIMATE_FIELD.to_string()),
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::Config(
                    "ISSUE_BASE_URL and ISSUE_API_TOKEN must be set together".to_string(),
                ));
            }
        };

        // Everything else falls back to defaults
        Ok(Self {
            panel_title: lookup("POKER_PANEL_TITLE")
                .unwrap_or_else(|| DEFAULT_PANEL_TITLE.to_string()),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            watch_interval_seconds: parse_or(&lookup, "WATCH_INTERVAL_SECONDS", 2)?,
            discovery_retries: parse_or(&lookup, "DISCOVERY_RETRIES", 5)?,
            issue,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} is not a valid number: {}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.panel_title, DEFAULT_PANEL_TITLE);
        assert_eq!(config.database_url, "sqlite:poker_tally.db");
        assert_eq!(config.watch_interval_seconds, 2);
        assert_eq!(config.discovery_retries, 5);
        assert!(config.issue.is_none());
    }

    #[test]
    fn test_issue_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("ISSUE_BASE_URL", "https://tracker.example.com/jira/"),
            ("ISSUE_API_TOKEN", "secret"),
        ]))
        .unwrap();
        let issue = config.issue.unwrap();
        assert_eq!(issue.base_url, "https://tracker.example.com/jira");
        assert_eq!(issue.estimate_field, "customfield_10002");
    }

    #[test]
    fn test_partial_issue_settings_rejected() {
        let result = Config::from_lookup(lookup_from(&[("ISSUE_BASE_URL", "https://x")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_bad_number_rejected() {
        let result = Config::from_lookup(lookup_from(&[("DISCOVERY_RETRIES", "many")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
