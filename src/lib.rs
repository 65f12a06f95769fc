pub mod clients;
pub mod geocode;
pub mod types;
