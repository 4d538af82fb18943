//! Booking flow dispatcher.
//!
//! Stateless: every event re-fetches what it needs from the clinic API and the
//! callback payload alone says how far the user got. Upstream failures are
//! logged and answered with a per-step error text; nothing here returns an
//! error to the transport.

use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use super::callback::{fits_callback_data, is_embeddable_segment, CategorySelector, CorrelationToken};
use super::{InboundEvent, InlineButton, Keyboard, MenuCommand, OutboundMessage};
use crate::localization::{t_args_lang, t_lang};
use crate::upstream::ClinicDirectory;
use crate::userdata::{ProfileLookup, UserDirectory};

/// Turns inbound events into replies for one or more bot identities
pub struct BookingFlow<D> {
    directory: D,
    users: UserDirectory,
    language: String,
}

impl<D: ClinicDirectory> BookingFlow<D> {
    pub fn new(directory: D, users: UserDirectory, language: impl Into<String>) -> Self {
        Self {
            directory,
            users,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Produce the single reply for `event`
    pub async fn handle(&self, event: InboundEvent) -> OutboundMessage {
        match event {
            InboundEvent::Command {
                text,
                user_id,
                chat_id,
            } => match MenuCommand::parse(&text, &self.language) {
                MenuCommand::Start => self.main_menu(chat_id),
                MenuCommand::Book => self.profession_menu(chat_id).await,
                MenuCommand::ClinicInfo => self.clinic_info(chat_id).await,
                MenuCommand::MyProfile => self.profile(chat_id, user_id),
                MenuCommand::Unknown => {
                    debug!(chat_id, text = %text, "Unrecognized command");
                    OutboundMessage::text(chat_id, self.t("unknown-command"))
                }
            },
            InboundEvent::Callback { payload, chat_id } => {
                match CorrelationToken::parse(&payload) {
                    Ok(token) => {
                        debug!(chat_id, stage = ?token.stage(), "Handling booking callback");
                        self.handle_callback(chat_id, token).await
                    }
                    Err(e) => {
                        warn!(chat_id, error = %e, "Rejected callback payload");
                        OutboundMessage::text(chat_id, self.t("callback-not-recognized"))
                    }
                }
            }
        }
    }

    async fn handle_callback(&self, chat_id: i64, token: CorrelationToken) -> OutboundMessage {
        match token {
            CorrelationToken::CategoryList => self.category_menu(chat_id).await,
            CorrelationToken::Category(category) => self.date_menu(chat_id, category).await,
            CorrelationToken::Date { category, date } => {
                self.time_menu(chat_id, category, date).await
            }
            CorrelationToken::Time {
                category,
                date,
                time_range,
            } => {
                let category = category.to_string();
                info!(chat_id, category = %category, date = %date, time = %time_range, "Booking selection confirmed");
                OutboundMessage::text(
                    chat_id,
                    t_args_lang(
                        "booking-confirmed",
                        &[
                            ("category", category.as_str()),
                            ("date", date.as_str()),
                            ("time", time_range.as_str()),
                        ],
                        &self.language,
                    ),
                )
            }
        }
    }

    fn main_menu(&self, chat_id: i64) -> OutboundMessage {
        let keyboard = Keyboard::Menu(vec![
            vec![self.t("menu-book"), self.t("menu-clinic-info")],
            vec![self.t("menu-profile")],
        ]);
        OutboundMessage::with_keyboard(chat_id, self.t("welcome"), keyboard)
    }

    /// Categories of the main flow: the distinct professions of all doctors
    async fn profession_menu(&self, chat_id: i64) -> OutboundMessage {
        let snapshot = match self.directory.doctor_time_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(chat_id, call = "doctor_time_snapshot", error = %e, "Failed to load doctor categories");
                return OutboundMessage::text(chat_id, self.t("error-categories"));
            }
        };

        let buttons = distinct(snapshot.doctors.iter().map(|d| d.profession.as_str()))
            .into_iter()
            .filter(|profession| embeddable(profession))
            .map(|profession| {
                let token = CorrelationToken::Category(CategorySelector::ByName(profession.to_string()));
                InlineButton::new(profession, token.to_string())
            })
            .collect();

        self.inline_menu(chat_id, "choose-category", "no-categories", buttons)
    }

    /// Categories of the id-based flow, straight from `/categories`
    async fn category_menu(&self, chat_id: i64) -> OutboundMessage {
        let categories = match self.directory.list_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                error!(chat_id, call = "list_categories", error = %e, "Failed to load doctor categories");
                return OutboundMessage::text(chat_id, self.t("error-categories"));
            }
        };

        let buttons = categories
            .into_iter()
            .map(|category| {
                let token = CorrelationToken::Category(CategorySelector::ById(category.id));
                InlineButton::new(category.name, token.to_string())
            })
            .collect();

        self.inline_menu(chat_id, "choose-category", "no-categories", buttons)
    }

    async fn date_menu(&self, chat_id: i64, category: CategorySelector) -> OutboundMessage {
        let dates: Result<Vec<String>, _> = match &category {
            CategorySelector::ById(id) => self.directory.list_availability(*id).await.map(|slots| {
                distinct(slots.iter().map(|slot| slot.date.as_str()))
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            }),
            CategorySelector::ByName(_) => self.directory.doctor_time_snapshot().await.map(|snapshot| {
                distinct(snapshot.doctor_times.iter().map(|slot| slot.date.as_str()))
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            }),
        };
        let dates = match dates {
            Ok(dates) => dates,
            Err(e) => {
                error!(chat_id, category = %category, endpoint = e.endpoint(), error = %e, "Failed to load available dates");
                return OutboundMessage::text(chat_id, self.t("error-dates"));
            }
        };

        let buttons = dates
            .into_iter()
            .filter(|date| embeddable(date))
            .map(|date| {
                let token = CorrelationToken::Date {
                    category: category.clone(),
                    date: date.clone(),
                };
                InlineButton::new(date, token.to_string())
            })
            .collect();

        self.inline_menu(chat_id, "choose-date", "no-dates", buttons)
    }

    async fn time_menu(
        &self,
        chat_id: i64,
        category: CategorySelector,
        date: String,
    ) -> OutboundMessage {
        let slots: Result<Vec<String>, _> = match &category {
            CategorySelector::ById(_) => self.directory.list_time_slots(&date).await,
            // Exact string comparison; upstream dates are never normalized
            CategorySelector::ByName(_) => self.directory.doctor_time_snapshot().await.map(|snapshot| {
                snapshot
                    .doctor_times
                    .iter()
                    .filter(|slot| slot.date == date)
                    .map(|slot| slot.time_range())
                    .collect()
            }),
        };
        let slots = match slots {
            Ok(slots) => slots,
            Err(e) => {
                error!(chat_id, category = %category, date = %date, endpoint = e.endpoint(), error = %e, "Failed to load time slots");
                return OutboundMessage::text(chat_id, self.t("error-times"));
            }
        };

        let buttons = slots
            .into_iter()
            .filter(|slot| !slot.is_empty())
            .map(|slot| {
                let token = CorrelationToken::Time {
                    category: category.clone(),
                    date: date.clone(),
                    time_range: slot.clone(),
                };
                InlineButton::new(slot, token.to_string())
            })
            .collect();

        self.inline_menu(chat_id, "choose-time", "no-times", buttons)
    }

    async fn clinic_info(&self, chat_id: i64) -> OutboundMessage {
        let snapshot = match self.directory.doctor_time_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(chat_id, call = "doctor_time_snapshot", error = %e, "Failed to load clinic branches");
                return OutboundMessage::text(chat_id, self.t("error-branches"));
            }
        };

        if snapshot.branches.is_empty() {
            return OutboundMessage::text(chat_id, self.t("branches-unavailable"));
        }

        let mut lines = vec![self.t("branches-header")];
        lines.extend(snapshot.branches.iter().map(|branch| {
            t_args_lang(
                "branch-line",
                &[
                    ("name", branch.name.as_str()),
                    ("city", branch.city.as_str()),
                    ("address", branch.address.as_str()),
                ],
                &self.language,
            )
        }));
        OutboundMessage::text(chat_id, lines.join("\n"))
    }

    fn profile(&self, chat_id: i64, user_id: i64) -> OutboundMessage {
        let text = match self.users.lookup(user_id) {
            ProfileLookup::Found(user) => t_args_lang(
                "profile-details",
                &[
                    ("name", user.name.as_str()),
                    ("phone", user.phone.as_str()),
                    ("id", user.id.to_string().as_str()),
                ],
                &self.language,
            ),
            ProfileLookup::NotFound => {
                debug!(chat_id, user_id, "No stored profile for user");
                self.t("profile-not-found")
            }
            ProfileLookup::Unavailable => {
                error!(chat_id, user_id, "Profile requested but user data is unavailable");
                self.t("error-users")
            }
        };
        OutboundMessage::text(chat_id, text)
    }

    /// One button per row, or `empty_key` text when there is nothing to pick
    ///
    /// Buttons whose payload the platform would reject are left out first, so
    /// a menu of only oversized entries is answered with `empty_key` too.
    fn inline_menu(
        &self,
        chat_id: i64,
        prompt_key: &str,
        empty_key: &str,
        buttons: Vec<InlineButton>,
    ) -> OutboundMessage {
        let buttons: Vec<InlineButton> = buttons
            .into_iter()
            .filter(|button| {
                let fits = fits_callback_data(&button.payload);
                if !fits {
                    warn!(
                        chat_id,
                        label = %button.label,
                        payload_len = button.payload.len(),
                        "Skipping menu entry with oversized callback data"
                    );
                }
                fits
            })
            .collect();
        if buttons.is_empty() {
            return OutboundMessage::text(chat_id, self.t(empty_key));
        }
        let rows = buttons.into_iter().map(|button| vec![button]).collect();
        OutboundMessage::with_keyboard(chat_id, self.t(prompt_key), Keyboard::Inline(rows))
    }

    fn t(&self, key: &str) -> String {
        t_lang(key, &self.language)
    }
}

/// Distinct values in first-seen order
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|value| seen.insert(*value)).collect()
}

fn embeddable(value: &str) -> bool {
    if is_embeddable_segment(value) {
        return true;
    }
    warn!(value, "Skipping menu entry that cannot be carried in a callback payload");
    false
}
