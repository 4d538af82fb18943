//! Booking flow: turns one inbound chat event into exactly one reply.
//!
//! - `callback`: parsing of the callback payloads carrying booking progress
//! - `flow`: the stateless dispatcher that consults the clinic API

pub mod callback;
pub mod flow;

pub use callback::{CategorySelector, CorrelationToken, Stage};
pub use flow::BookingFlow;

use crate::localization::t_lang;

/// Menu actions a user can type or pick from the reply keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Start,
    Book,
    ClinicInfo,
    MyProfile,
    Unknown,
}

impl MenuCommand {
    /// Recognize slash commands and the localized reply-keyboard labels
    pub fn parse(text: &str, language: &str) -> Self {
        let text = text.trim();
        if let Some(command) = text.strip_prefix('/') {
            // `/start@clinic_bot` in group chats
            let command = command.split('@').next().unwrap_or_default();
            return match command.to_ascii_lowercase().as_str() {
                "start" => MenuCommand::Start,
                "book" => MenuCommand::Book,
                "clinic" | "clinic_info" => MenuCommand::ClinicInfo,
                "profile" | "my_profile" => MenuCommand::MyProfile,
                _ => MenuCommand::Unknown,
            };
        }

        if text == t_lang("menu-book", language) {
            MenuCommand::Book
        } else if text == t_lang("menu-clinic-info", language) {
            MenuCommand::ClinicInfo
        } else if text == t_lang("menu-profile", language) {
            MenuCommand::MyProfile
        } else {
            MenuCommand::Unknown
        }
    }
}

/// Something the chat platform delivered to one bot identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Typed text, usually a menu command
    Command {
        text: String,
        user_id: i64,
        chat_id: i64,
    },
    /// A pressed inline button
    Callback { payload: String, chat_id: i64 },
}

/// Inline button carrying a callback payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub payload: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Button grid attached to a reply; rows in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent reply keyboard whose labels are sent back as text
    Menu(Vec<Vec<String>>),
    Inline(Vec<Vec<InlineButton>>),
}

impl Keyboard {
    pub fn button_count(&self) -> usize {
        match self {
            Keyboard::Menu(rows) => rows.iter().map(Vec::len).sum(),
            Keyboard::Inline(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    /// Inline buttons in display order, empty for a reply keyboard
    pub fn inline_buttons(&self) -> Vec<&InlineButton> {
        match self {
            Keyboard::Menu(_) => Vec::new(),
            Keyboard::Inline(rows) => rows.iter().flatten().collect(),
        }
    }
}

/// The single reply produced for an inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(chat_id: i64, text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}
