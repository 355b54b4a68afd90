use crate::{Command, Result, TelegramBot};
use kkm_core::{CardLookup, Extractor, PageFetcher};
use teloxide::{
    payloads::SendMessageSetters,
    requests::Requester,
    types::{Message, ReplyParameters},
};
use tracing::{debug, info};

/// Reply text for one inbound message.
pub async fn respond<F, E>(lookup: &CardLookup<F, E>, text: &str) -> String
where
    F: PageFetcher,
    E: Extractor,
{
    match Command::parse_from_text(text) {
        Command::Help => Command::help_text().to_string(),
        Command::Card => lookup.reply_for(text).await,
        Command::Unknown => Command::not_found_text().to_string(),
    }
}

/// Answer a message in its chat, threaded under the original.
pub async fn handle_message(bot: TelegramBot, msg: Message) -> Result<()> {
    let text = msg.text().unwrap_or_default();
    let username = msg
        .from
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    debug!("Update in chat {} message {}: {msg:?}", msg.chat.id, msg.id.0);
    info!("[@{username}] Message: {text}");

    let reply = respond(&*bot.lookup, text).await;

    info!("[@{username}] Response: {reply}");

    bot.bot
        .send_message(msg.chat.id, reply)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
