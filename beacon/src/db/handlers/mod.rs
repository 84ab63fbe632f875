//! Repository implementations for each record collection.

pub mod alerts;
pub mod checkins;
pub mod reports;
pub mod repository;
pub mod resources;
pub mod uploads;

pub use alerts::Alerts;
pub use checkins::Checkins;
pub use reports::Reports;
pub use repository::Repository;
pub use resources::Resources;
pub use uploads::Uploads;
