pub mod config;
pub mod ingestion;
pub mod intelligence;
pub mod metrics;
pub mod models;
pub mod polymarket;
pub mod services;
