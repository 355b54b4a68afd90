use kkm_config::Config;
use kkm_core::COMMAND_SEPARATOR;

/// Input for a one-shot card lookup.
#[derive(Debug, Clone)]
pub struct CheckInput {
    pub client_id: String,
    pub card_id: String,
    pub date: Option<String>,
}

impl CheckInput {
    /// Render as the chat command the bot would receive.
    fn command_text(&self) -> String {
        ["/card", self.client_id.as_str(), self.card_id.as_str()]
            .into_iter()
            .chain(self.date.as_deref())
            .collect::<Vec<_>>()
            .join(COMMAND_SEPARATOR)
    }
}

/// Strategy for looking up a card from the command line.
///
/// Prints the same text the bot would reply with; failures exit non-zero.
#[derive(Debug, Clone, Copy)]
pub struct CheckStrategy;

impl super::CommandStrategy for CheckStrategy {
    type Input = CheckInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let lookup = super::build_lookup(&config)?;

        let reply = lookup.run_command(&input.command_text()).await?;
        println!("{reply}");

        Ok(())
    }
}
