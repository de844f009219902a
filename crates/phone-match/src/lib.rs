pub mod catalog;
pub mod config;
pub mod decision;
pub mod error;
pub mod telemetry;
