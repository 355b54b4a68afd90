//! Static strategy pattern for CLI commands.
//!
//! Each subcommand is a separate strategy type with its own input, dispatched
//! statically from `main`.

use kkm_config::Config;
use kkm_core::{CardLookup, PageFetcher};
use kkm_fetch::MpkFetcher;
use kkm_telegram::SharedLookup;
use std::sync::Arc;
use tracing::info;

mod check;
mod info;
mod init;
mod telegram;
mod version;

pub use check::{CheckInput, CheckStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use telegram::{TelegramInput, TelegramStrategy};
pub use version::VersionStrategy;

/// Build the lookup pipeline from configuration.
///
/// Field patterns are compiled here, so a bad pattern stops startup.
fn build_lookup(config: &Config) -> anyhow::Result<SharedLookup> {
    let rules = config.field_rules()?;
    let fetcher: Arc<dyn PageFetcher> = Arc::new(MpkFetcher::new(&config.upstream)?);

    info!(
        "Upstream: {} ({} field rules)",
        config.upstream.endpoint,
        rules.len()
    );

    Ok(Arc::new(CardLookup::new(fetcher, rules)))
}

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
