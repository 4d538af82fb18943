//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info_span, warn, Instrument};

use super::{send_outbound, BotContext};
use crate::booking::InboundEvent;

/// Handle callback queries from the booking inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    ctx: Arc<BotContext>,
) -> Result<()> {
    let Some(msg) = &q.message else {
        warn!(identity = %ctx.identity, user_id = %q.from.id, "Callback query without a message, ignoring");
        answer_query(&bot, &q, &ctx).await;
        return Ok(());
    };
    let chat_id = msg.chat().id.0;
    let payload = q.data.clone().unwrap_or_default();

    let span = info_span!("dispatch", identity = %ctx.identity, chat_id);
    let sent = async {
        debug!(payload = %payload, "Received callback query");
        let reply = ctx.flow.handle(InboundEvent::Callback { payload, chat_id }).await;
        send_outbound(&bot, reply).await
    }
    .instrument(span)
    .await;

    // Answer the callback query to remove the loading state
    answer_query(&bot, &q, &ctx).await;
    sent
}

/// Expired queries (updates queued while the bot was down) cannot be answered
async fn answer_query(bot: &Bot, q: &teloxide::types::CallbackQuery, ctx: &BotContext) {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!(identity = %ctx.identity, error = %e, "Failed to answer callback query");
    }
}
