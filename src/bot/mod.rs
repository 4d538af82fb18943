//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles typed commands and reply-keyboard presses
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Converts booking replies into Telegram keyboards

pub mod callback_handler;
pub mod message_handler;
pub mod ui_builder;

use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;

use crate::booking::{BookingFlow, OutboundMessage};
use crate::tokens::BotIdentity;
use crate::upstream::HttpClinicApi;

pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

/// The booking flow as wired in production
pub type ClinicBookingFlow = BookingFlow<HttpClinicApi>;

/// Per-identity handler dependencies
pub struct BotContext {
    /// Log-safe identity label
    pub identity: String,
    pub flow: Arc<ClinicBookingFlow>,
}

/// Send a booking reply to its chat
pub async fn send_outbound(bot: &Bot, message: OutboundMessage) -> Result<()> {
    let mut request = bot.send_message(ChatId(message.chat_id), message.text);
    if let Some(keyboard) = &message.keyboard {
        request = request.reply_markup(ui_builder::reply_markup(keyboard));
    }
    request.await?;
    Ok(())
}

// Every update of one identity shares a key, so they are handled one at a time
fn single_queue(_update: &Update) -> Option<()> {
    Some(())
}

/// Run the update loop of one bot identity until shutdown
pub async fn run_identity(identity: BotIdentity, flow: Arc<ClinicBookingFlow>) -> Result<()> {
    let label = identity.label();
    let bot = Bot::new(identity.token());

    let me = bot
        .get_me()
        .await
        .with_context(|| format!("failed to authorize {label}"))?;
    info!(identity = %label, username = %me.username(), "Authorized, starting dispatcher");

    let context = Arc::new(BotContext {
        identity: label,
        flow,
    });

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![context])
        .distribution_function(single_queue)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
