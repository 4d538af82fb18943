//! UI Builder module for turning booking replies into Telegram markup

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};
use tracing::warn;

use crate::booking::callback::fits_callback_data;
use crate::booking::{InlineButton, Keyboard};

/// Create the Telegram markup for a reply keyboard
pub fn reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Menu(rows) => ReplyMarkup::Keyboard(menu_keyboard(rows)),
        Keyboard::Inline(rows) => ReplyMarkup::InlineKeyboard(inline_keyboard(rows)),
    }
}

/// Create a persistent reply keyboard from button labels
pub fn menu_keyboard(rows: &[Vec<String>]) -> KeyboardMarkup {
    let keyboard: Vec<Vec<KeyboardButton>> = rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect())
        .collect();
    KeyboardMarkup::new(keyboard)
}

/// Create an inline keyboard, dropping buttons the platform would reject
pub fn inline_keyboard(rows: &[Vec<InlineButton>]) -> InlineKeyboardMarkup {
    let keyboard: Vec<Vec<InlineKeyboardButton>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .filter(|button| {
                    let fits = fits_callback_data(&button.payload);
                    if !fits {
                        warn!(
                            label = %button.label,
                            payload_len = button.payload.len(),
                            "Dropping button with oversized callback data"
                        );
                    }
                    fits
                })
                .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.payload.clone()))
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect();
    InlineKeyboardMarkup::new(keyboard)
}
