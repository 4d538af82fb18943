//! Upstream clinic data source.
//!
//! The booking flow only talks to [`ClinicDirectory`]; [`HttpClinicApi`] is
//! the production implementation over the clinic REST API.

pub mod http;
pub mod models;

use async_trait::async_trait;

use crate::errors::UpstreamError;

pub use http::HttpClinicApi;
pub use models::{
    BranchRecord, DoctorAvailability, DoctorCategory, DoctorRecord, DoctorSnapshot, ScheduleSlot,
};

/// Read-only queries the booking flow needs from the clinic backend
#[async_trait]
pub trait ClinicDirectory: Send + Sync {
    /// `GET /categories`
    async fn list_categories(&self) -> Result<Vec<DoctorCategory>, UpstreamError>;

    /// `GET /availability?category_id=<id>`
    async fn list_availability(
        &self,
        category_id: i64,
    ) -> Result<Vec<DoctorAvailability>, UpstreamError>;

    /// `GET /timeslots?date=<date>`
    async fn list_time_slots(&self, date: &str) -> Result<Vec<String>, UpstreamError>;

    /// `GET /global/doctor_time`, the full doctors/branches/schedule snapshot
    async fn doctor_time_snapshot(&self) -> Result<DoctorSnapshot, UpstreamError>;
}
