//! Callback payloads of the booking flow.
//!
//! A payload carries the whole conversation progress:
//!
//! ```text
//! category
//! category:<selector>
//! date:<selector>:<date>
//! time:<selector>:<date>:<time range>
//! ```
//!
//! It is parsed once into a [`CorrelationToken`]; handlers never slice the
//! raw string.

use std::fmt;

use crate::errors::MalformedCallback;

const CATEGORY: &str = "category";
const DATE: &str = "date";
const TIME: &str = "time";
const SEPARATOR: char = ':';

/// Telegram rejects callback data longer than this many bytes
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Which question the next menu answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SelectCategory,
    SelectDate,
    SelectTime,
    Confirmed,
}

/// How a category was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelector {
    /// Numeric id from `/categories`, resolved through the availability endpoints
    ById(i64),
    /// Doctor profession from the global snapshot
    ByName(String),
}

impl CategorySelector {
    /// Numeric segments become ids only in their canonical form (`12`, not
    /// `012` or `+12`), so a selector always re-encodes to the same segment.
    fn parse(segment: &str) -> Option<Self> {
        match segment.parse::<i64>() {
            Ok(id) if id.to_string() == segment => Some(CategorySelector::ById(id)),
            Ok(_) => None,
            Err(_) => Some(CategorySelector::ByName(segment.to_string())),
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySelector::ById(id) => write!(f, "{id}"),
            CategorySelector::ByName(name) => f.write_str(name),
        }
    }
}

/// Parsed callback payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelationToken {
    CategoryList,
    Category(CategorySelector),
    Date {
        category: CategorySelector,
        date: String,
    },
    Time {
        category: CategorySelector,
        date: String,
        time_range: String,
    },
}

impl CorrelationToken {
    /// Parse a raw callback payload.
    ///
    /// The time range is the only segment allowed to contain the separator
    /// (`09:00 - 09:30`), so it takes the remainder of a `time:` payload.
    /// Any other segment count mismatch or empty segment is rejected.
    pub fn parse(payload: &str) -> Result<Self, MalformedCallback> {
        let malformed = || MalformedCallback::new(payload);

        if payload == CATEGORY {
            return Ok(CorrelationToken::CategoryList);
        }

        let (prefix, rest) = payload.split_once(SEPARATOR).ok_or_else(malformed)?;
        match prefix {
            CATEGORY => {
                let segments = split_exact::<1>(rest).ok_or_else(malformed)?;
                let category = CategorySelector::parse(segments[0]).ok_or_else(malformed)?;
                Ok(CorrelationToken::Category(category))
            }
            DATE => {
                let [category, date] = split_exact::<2>(rest).ok_or_else(malformed)?;
                Ok(CorrelationToken::Date {
                    category: CategorySelector::parse(category).ok_or_else(malformed)?,
                    date: date.to_string(),
                })
            }
            TIME => {
                let mut parts = rest.splitn(3, SEPARATOR);
                let (category, date, time_range) = match (parts.next(), parts.next(), parts.next()) {
                    (Some(c), Some(d), Some(t)) if !c.is_empty() && !d.is_empty() && !t.is_empty() => {
                        (c, d, t)
                    }
                    _ => return Err(malformed()),
                };
                Ok(CorrelationToken::Time {
                    category: CategorySelector::parse(category).ok_or_else(malformed)?,
                    date: date.to_string(),
                    time_range: time_range.to_string(),
                })
            }
            _ => Err(malformed()),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            CorrelationToken::CategoryList => Stage::SelectCategory,
            CorrelationToken::Category(_) => Stage::SelectDate,
            CorrelationToken::Date { .. } => Stage::SelectTime,
            CorrelationToken::Time { .. } => Stage::Confirmed,
        }
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationToken::CategoryList => f.write_str(CATEGORY),
            CorrelationToken::Category(category) => write!(f, "{CATEGORY}:{category}"),
            CorrelationToken::Date { category, date } => write!(f, "{DATE}:{category}:{date}"),
            CorrelationToken::Time {
                category,
                date,
                time_range,
            } => write!(f, "{TIME}:{category}:{date}:{time_range}"),
        }
    }
}

/// Whether the encoded token fits in the platform's callback data
pub fn fits_callback_data(payload: &str) -> bool {
    payload.len() <= MAX_CALLBACK_DATA_LEN
}

/// Whether `value` can be embedded as a single payload segment
pub fn is_embeddable_segment(value: &str) -> bool {
    !value.is_empty() && !value.contains(SEPARATOR)
}

fn split_exact<const N: usize>(rest: &str) -> Option<[&str; N]> {
    let segments: Vec<&str> = rest.split(SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    segments.try_into().ok()
}
