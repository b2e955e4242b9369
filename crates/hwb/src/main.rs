use std::{path::Path, sync::Arc};

use hwb_core::{
    config::{self, Config},
    domain::Cursor,
    logging::{self, LogSettings},
    poll::{PollIntervals, PollLoop},
};
use hwb_praktikum::PraktikumClient;
use hwb_telegram::TelegramMessenger;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), hwb_core::Error> {
    config::load_dotenv_if_present(Path::new(".env"));
    logging::init("hwb", &LogSettings::from_env())?;

    let cfg = Config::from_env().inspect_err(|e| tracing::error!(error = %e, "invalid configuration"))?;

    let source = Arc::new(PraktikumClient::from_config(&cfg)?);
    let messenger = Arc::new(TelegramMessenger::from_token(cfg.telegram_token.clone()));

    match messenger.username().await {
        Ok(name) => tracing::info!(bot = %name, chat = %cfg.chat, "bot started"),
        Err(e) => tracing::warn!(error = %e, "bot started, but get_me failed"),
    }

    let cursor = Cursor::now();
    tracing::debug!(%cursor, endpoint = source.endpoint(), "polling homework statuses");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_shutdown().await;
            shutdown.cancel();
        }
    });

    let mut poll = PollLoop::new(
        source,
        messenger,
        cfg.chat.clone(),
        PollIntervals::from_config(&cfg),
        cursor,
    );
    poll.run_until(shutdown).await;

    Ok(())
}

async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) else {
            tracing::warn!("cannot install signal handlers");
            std::future::pending::<()>().await;
            return;
        };

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received Ctrl+C, shutting down");
        }
    }
}
