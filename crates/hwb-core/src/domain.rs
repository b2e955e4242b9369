use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};

use crate::{errors::Error, Result};

/// Telegram chat the notifications go to: a numeric id or a public `@channel`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChatTarget {
    Id(i64),
    Channel(String),
}

impl FromStr for ChatTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() > 1 && s.starts_with('@') {
            return Ok(ChatTarget::Channel(s.to_string()));
        }
        s.parse::<i64>()
            .map(ChatTarget::Id)
            .map_err(|_| Error::Config(format!("invalid chat id: {s:?}")))
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTarget::Id(id) => write!(f, "{id}"),
            ChatTarget::Channel(name) => f.write_str(name),
        }
    }
}

/// Start of the next query window, as a UNIX timestamp in seconds.
///
/// Only moves forward; it is reset to "now" on every process start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(pub i64);

impl Cursor {
    pub fn now() -> Self {
        Cursor(chrono::Utc::now().timestamp())
    }

    /// Move to the server-provided `current_date`, if any. Older values are ignored.
    pub fn advance(&mut self, next: Option<i64>) {
        if let Some(next) = next {
            if next > self.0 {
                self.0 = next;
            }
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One submission's review state. Other fields sent by the API are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct HomeworkRecord {
    #[serde(default, rename = "homework_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
impl HomeworkRecord {
    pub(crate) fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            status: Some(status.into()),
        }
    }
}

/// Successful response of the review API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StatusPage {
    /// Most recent first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub homeworks: Vec<HomeworkRecord>,
    #[serde(default)]
    pub current_date: Option<i64>,
}

impl StatusPage {
    pub fn latest(&self) -> Option<&HomeworkRecord> {
        self.homeworks.first()
    }
}

fn null_as_empty<'de, D>(de: D) -> std::result::Result<Vec<HomeworkRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<HomeworkRecord>>::deserialize(de)?.unwrap_or_default())
}
