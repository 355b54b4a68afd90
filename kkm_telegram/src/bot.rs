use crate::{Command, Error, Result};
use kkm_core::{CardLookup, PageFetcher};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

/// Lookup pipeline shared by every handler invocation.
pub type SharedLookup = Arc<CardLookup<Arc<dyn PageFetcher>>>;

/// Telegram front end for card lookups
#[derive(Clone)]
pub struct TelegramBot {
    /// Teloxide bot instance
    pub bot: Bot,
    /// Parse, fetch and extract pipeline
    pub lookup: SharedLookup,
}

impl TelegramBot {
    /// Create a new Telegram bot
    #[must_use]
    pub fn new(token: String, lookup: SharedLookup) -> Self {
        Self {
            bot: Bot::new(token),
            lookup,
        }
    }

    /// Verify the token against the Telegram API. A failure here is fatal.
    async fn test_connection(&self) -> Result<()> {
        match self.bot.get_me().await {
            Ok(bot_user) => {
                info!(
                    "Authorized on account @{} (id: {})",
                    bot_user
                        .user
                        .username
                        .clone()
                        .unwrap_or_else(|| "no username".to_string()),
                    bot_user.user.id
                );
                Ok(())
            }
            Err(e) => {
                warn!("Bot initialization failed: {e}");
                warn!("This may be due to:");
                warn!("  - Network connectivity issues");
                warn!("  - Firewall blocking api.telegram.org");
                warn!("  - Invalid bot token");
                Err(Error::Telegram(e))
            }
        }
    }

    async fn register_commands(&self) {
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!("Failed to register bot commands: {e}");
        }
    }

    /// Run the bot until Ctrl+C.
    ///
    /// Every update shares one distribution key, so messages are handled one
    /// at a time in arrival order.
    pub async fn run(self) -> Result<()> {
        use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
        use teloxide::dptree;
        use teloxide::types::Update;

        self.test_connection().await?;
        self.register_commands().await;

        let bot = self.bot.clone();

        let schema = dptree::entry().branch(Update::filter_message().endpoint({
            let bot_clone = self.clone();
            move |msg: teloxide::types::Message| {
                let bot_clone = bot_clone.clone();
                async move {
                    if let Err(e) = crate::handler::handle_message(bot_clone, msg).await {
                        error!("Failed to reply: {e}");
                    }
                    Ok::<(), Error>(())
                }
            }
        }));

        Dispatcher::builder(bot, schema)
            .distribution_function(|_: &Update| Some(()))
            .default_handler(|update| async move {
                debug!("Ignoring non-message update {:?}", update.id);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
