//! Database record structures matching table schemas.

pub mod alerts;
pub mod checkins;
pub mod reports;
pub mod resources;
pub mod uploads;
