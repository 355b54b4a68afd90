use regex::Regex;
use std::sync::OnceLock;
use teloxide::types::BotCommand;

static CARD_PATTERN: OnceLock<Regex> = OnceLock::new();

/// `/card <digits> <digits>` with an optional `<d>sep<d>sep<d>` date.
#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn card_pattern() -> &'static Regex {
    CARD_PATTERN.get_or_init(|| {
        Regex::new(r"^/card [0-9]+ [0-9]+( [0-9]+[-/\\.][0-9]+[-/\\.][0-9]+)?$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// The three routes a message can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Card,
    Unknown,
}

impl Command {
    fn all() -> Vec<BotCommand> {
        vec![
            BotCommand {
                command: "card".to_string(),
                description: "Check KKM card: <clientID> <cardID> [dd/mm/yyyy]".to_string(),
            },
            BotCommand {
                command: "help".to_string(),
                description: "Show available commands".to_string(),
            },
        ]
    }

    #[must_use]
    pub fn bot_commands() -> Vec<BotCommand> {
        Self::all()
    }

    /// Match the full message text; no trimming or case folding.
    #[must_use]
    pub fn parse_from_text(text: &str) -> Self {
        if text == "/help" {
            Self::Help
        } else if card_pattern().is_match(text) {
            Self::Card
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn help_text() -> &'static str {
        "Available commands:\n\
         /card <clientID> <cardID> <date dd/mm/yyyy> — this will provide details about your KKM card. \
         Argument 'date' isn't mandatory (default value - sysdate)."
    }

    #[must_use]
    pub const fn not_found_text() -> &'static str {
        "Command not found :(\nTo get a list of available commands enter: '/help'"
    }
}
