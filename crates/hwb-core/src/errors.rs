/// Core error type.
///
/// Adapter crates map their transport errors into this type so the poll loop
/// can decide between "send it to the user" and "back off and retry".
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("Server connection error: {0}")]
    Connection(String),

    #[error("JSON decoding error: {0}")]
    Decode(String),

    #[error("Homework_name or status are not available")]
    MissingData,

    #[error("Unknown homework status error: {0}")]
    UnknownStatus(String),

    #[error("Bot sending message error: {0}")]
    Send(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// True for failures reaching or reading the review API.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::Connection(_) | Error::Decode(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
