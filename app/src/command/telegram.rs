use crate::command::CommandStrategy;
use kkm_config::Config;
use kkm_telegram::TelegramBot;
use tracing::info;

/// Input for Telegram bot command.
pub struct TelegramInput {
    /// Optional bot token (overrides environment and config)
    pub token: Option<String>,
}

/// Strategy for running Telegram bot.
pub struct TelegramStrategy;

impl CommandStrategy for TelegramStrategy {
    type Input = TelegramInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let token = config.resolve_token(input.token)?;
        let lookup = super::build_lookup(&config)?;

        info!("Starting Telegram bot...");

        let bot = TelegramBot::new(token, lookup);

        info!("Telegram bot is running. Press Ctrl+C to stop.");
        bot.run().await?;

        Ok(())
    }
}
