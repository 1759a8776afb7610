pub mod analytics;
pub mod campaign;
pub mod goals;
pub mod matches;
