pub mod alerts;
pub mod clock;
pub mod energy;
pub mod error;
pub mod insights;
pub mod models;
pub mod nutrition;
pub mod service;
pub mod store;
