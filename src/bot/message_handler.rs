//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info_span, Instrument};

use super::{send_outbound, BotContext};
use crate::booking::InboundEvent;

/// Handle text messages: menu commands and reply-keyboard presses
pub async fn message_handler(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    let chat_id = msg.chat.id.0;
    let Some(text) = msg.text() else {
        debug!(identity = %ctx.identity, chat_id, "Ignoring non-text message");
        return Ok(());
    };

    // Profiles are keyed by the sender's account, which equals the chat in private chats
    let user_id = msg
        .from
        .as_ref()
        .and_then(|user| i64::try_from(user.id.0).ok())
        .unwrap_or(chat_id);
    let event = InboundEvent::Command {
        text: text.to_string(),
        user_id,
        chat_id,
    };

    let span = info_span!("dispatch", identity = %ctx.identity, chat_id, user_id);
    async {
        debug!("Received text message");
        let reply = ctx.flow.handle(event).await;
        send_outbound(&bot, reply).await
    }
    .instrument(span)
    .await
}
