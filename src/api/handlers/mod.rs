pub mod config;
pub mod control;
pub mod dashboard;
pub mod health;
pub mod metrics;
