use std::time::Duration;

use chatgpt::config::ChatGPTEngine;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported CHATGPT_ENGINE {0:?}, expected gpt-3.5-turbo or gpt-4")]
    UnknownEngine(String),
    #[error("CHATGPT_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` keeps the bot running, but every generation fails.
    pub api_key: Option<String>,
    pub engine: ChatGPTEngine,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("CHATGPT_API_KEY").filter(|key| !key.trim().is_empty());

        let engine = match lookup("CHATGPT_ENGINE").as_deref().map(str::trim) {
            None | Some("") | Some("gpt-3.5-turbo") => ChatGPTEngine::Gpt35Turbo,
            Some("gpt-4") => ChatGPTEngine::Gpt4,
            Some(other) => return Err(ConfigError::UnknownEngine(other.to_string())),
        };

        let timeout = match lookup("CHATGPT_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        Ok(Self {
            api_key,
            engine,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_any_variables() {
        let config = load(&[]).unwrap();
        assert!(config.api_key.is_none());
        assert!(matches!(config.engine, ChatGPTEngine::Gpt35Turbo));
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn reads_key_engine_and_timeout() {
        let config = load(&[
            ("CHATGPT_API_KEY", "sk-test"),
            ("CHATGPT_ENGINE", "gpt-4"),
            ("CHATGPT_TIMEOUT_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert!(matches!(config.engine, ChatGPTEngine::Gpt4));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = load(&[("CHATGPT_API_KEY", "  ")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("CHATGPT_ENGINE", "gemini-1.5-flash")]),
            Err(ConfigError::UnknownEngine(_))
        ));
        assert!(matches!(
            load(&[("CHATGPT_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidTimeout(_))
        ));
        assert!(matches!(
            load(&[("CHATGPT_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }
}
