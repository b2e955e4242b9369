//! The poll loop: fetch → format → notify, forever.
//!
//! Two delays drive the loop: the long poll interval after a successful cycle
//! and the short retry interval after a failed one. The cursor only advances
//! on successful fetches.

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    domain::{ChatTarget, Cursor, StatusPage},
    formatting::format_status,
    ports::{MessagingPort, StatusSource},
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollIntervals {
    /// Between successful cycles.
    pub poll: Duration,
    /// After a failed cycle.
    pub retry: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            poll: Duration::from_secs(300),
            retry: Duration::from_secs(5),
        }
    }
}

impl PollIntervals {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            poll: cfg.poll_interval,
            retry: cfg.retry_interval,
        }
    }

    pub fn duration(&self, delay: Delay) -> Duration {
        match delay {
            Delay::Poll => self.poll,
            Delay::Retry => self.retry,
        }
    }
}

/// What to wait before the next cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delay {
    Poll,
    Retry,
}

pub struct PollLoop {
    source: Arc<dyn StatusSource>,
    messenger: Arc<dyn MessagingPort>,
    chat: ChatTarget,
    intervals: PollIntervals,
    cursor: Cursor,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn StatusSource>,
        messenger: Arc<dyn MessagingPort>,
        chat: ChatTarget,
        intervals: PollIntervals,
        cursor: Cursor,
    ) -> Self {
        Self {
            source,
            messenger,
            chat,
            intervals,
            cursor,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Run cycles forever, sleeping the delay each cycle asks for.
    pub async fn run(&mut self) {
        self.run_until(CancellationToken::new()).await
    }

    /// Run cycles until `shutdown` fires. Errors never end the loop.
    pub async fn run_until(&mut self, shutdown: CancellationToken) {
        loop {
            let delay = self.cycle().await;
            let wait = self.intervals.duration(delay);
            tracing::debug!(?delay, wait_secs = wait.as_secs(), cursor = %self.cursor, "cycle done");

            tokio::select! {
              _ = shutdown.cancelled() => break,
              _ = sleep(wait) => {}
            }
        }
        tracing::info!(cursor = %self.cursor, "poll loop stopped");
    }

    /// One fetch/notify cycle. Every failure is handled here.
    pub async fn cycle(&mut self) -> Delay {
        match self.step().await {
            Ok(()) => Delay::Poll,
            Err(e) => {
                let report = if e.is_fetch_failure() {
                    tracing::error!(error = %e, cursor = %self.cursor, "failed to fetch homework statuses");
                    format!("Function execution error: {e}")
                } else {
                    tracing::error!(error = %e, "poll cycle failed");
                    format!("Bot error: {e}")
                };
                self.notify(&report).await;
                Delay::Retry
            }
        }
    }

    async fn step(&mut self) -> Result<()> {
        let page = self.source.fetch(self.cursor).await?;
        self.process(page).await;
        Ok(())
    }

    async fn process(&mut self, page: StatusPage) {
        match page.latest() {
            Some(record) => {
                let text = format_status(record).unwrap_or_else(|e| {
                    tracing::error!(error = %e, ?record, "cannot format homework status");
                    e.to_string()
                });
                if self.notify(&text).await {
                    tracing::info!(message = %text, "status message sent");
                }
            }
            None => tracing::debug!(cursor = %self.cursor, "no status changes"),
        }
        self.cursor.advance(page.current_date);
    }

    /// Best-effort send; failures are logged and swallowed.
    async fn notify(&self, text: &str) -> bool {
        match self.messenger.send_text(&self.chat, text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to send notification");
                false
            }
        }
    }
}
