pub mod error;
pub mod fetch;
pub mod infra;
pub mod models;
pub mod scoring;
pub mod server;
pub mod services;
pub mod validation;
