//! # Care360 Clinic Bots
//!
//! Telegram bots that let clinic patients pick a doctor category, a date and
//! a time slot, and look up clinic branches or their stored profile. Several
//! bot identities run side by side against the same clinic REST API.

pub mod booking;
pub mod bot;
pub mod config;
pub mod errors;
pub mod localization;
pub mod supervisor;
pub mod tokens;
pub mod upstream;
pub mod userdata;
