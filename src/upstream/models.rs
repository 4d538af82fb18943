//! Wire models returned by the clinic REST API.
//!
//! Every struct decodes leniently: a missing field takes its default value,
//! while a body of the wrong JSON shape is still rejected.

use serde::{Deserialize, Serialize};

/// `GET /categories` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorCategory {
    pub id: i64,
    pub name: String,
}

/// `GET /availability?category_id=` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorAvailability {
    pub date: String,
    pub time: String,
}

/// A doctor as listed in the global snapshot.
///
/// `profession` doubles as the category key of the main booking flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorRecord {
    pub user_id: i64,
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub second_name: String,
    pub profession: String,
}

/// A clinic branch, shown by the clinic-info command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchRecord {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub address: String,
}

/// One bookable interval of one doctor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSlot {
    pub date: String,
    pub time_begin: String,
    pub time_end: String,
    pub doctor_id: i64,
    pub branch_id: i64,
}

impl ScheduleSlot {
    /// Label and callback value of the slot, e.g. `09:00 - 09:30`
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.time_begin, self.time_end)
    }
}

/// `GET /global/doctor_time` body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorSnapshot {
    pub doctors: Vec<DoctorRecord>,
    pub branches: Vec<BranchRecord>,
    pub doctor_times: Vec<ScheduleSlot>,
}
