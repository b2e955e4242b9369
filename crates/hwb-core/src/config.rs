use std::{env, fs, path::Path, time::Duration};

use crate::{domain::ChatTarget, errors::Error, logging::LogSettings, Result};

pub const DEFAULT_API_URL: &str = "https://praktikum.yandex.ru/api/user_api/homework_statuses/";

/// Typed configuration, read once at startup and passed into the adapters.
#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub praktikum_token: String,
    pub telegram_token: String,
    pub chat: ChatTarget,

    // Review API
    pub api_url: String,
    pub request_timeout: Duration,

    // Poll loop
    pub poll_interval: Duration,
    pub retry_interval: Duration,

    pub log: LogSettings,
}

impl Config {
    /// Read the process environment. `.env` merging is the caller's job.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source (the environment in production).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let praktikum_token = required(&get, "PRAKTIKUM_TOKEN")?;
        let telegram_token = required(&get, "TELEGRAM_TOKEN")?;
        let chat = required(&get, "TELEGRAM_CHAT_ID")?.parse::<ChatTarget>()?;

        let api_url = get("PRAKTIKUM_API_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let request_timeout = secs(&get, "REQUEST_TIMEOUT_SECS", 30);

        let poll_interval = secs(&get, "POLL_INTERVAL_SECS", 300);
        let retry_interval = secs(&get, "RETRY_INTERVAL_SECS", 5);

        Ok(Self {
            praktikum_token,
            telegram_token,
            chat,
            api_url,
            request_timeout,
            poll_interval,
            retry_interval,
            log: LogSettings::from_lookup(&get),
        })
    }
}

/// Merge `KEY=value` lines from `path` into the environment.
///
/// Existing variables win; a missing file is not an error.
pub fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn required(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    get(key)
        .and_then(non_empty)
        .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
}

fn secs(get: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Duration {
    Duration::from_secs(env_u64(get, key).unwrap_or(default))
}

pub(crate) fn env_u64(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    get(key).and_then(|s| s.trim().parse::<u64>().ok())
}

pub(crate) fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
