use async_trait::async_trait;

use crate::{
    domain::{ChatTarget, Cursor, StatusPage},
    Result,
};

/// Hexagonal port for the homework review API.
///
/// One call is one request; retry policy belongs to the poll loop.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Statuses changed since `cursor`.
    ///
    /// Transport failures map to `Error::Connection`, unreadable bodies to
    /// `Error::Decode`.
    async fn fetch(&self, cursor: Cursor) -> Result<StatusPage>;
}

/// Hexagonal port for the messenger delivering notifications.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send plain text. Transport failures map to `Error::Send`.
    async fn send_text(&self, chat: &ChatTarget, text: &str) -> Result<()>;
}
