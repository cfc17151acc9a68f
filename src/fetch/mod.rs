//! HTTP client abstraction shared by the NASA data sources.
//!
//! [`HttpClient`] executes a prepared request; auth decorators in
//! [`auth`] wrap an inner client to attach credentials, so the data
//! source code never branches on how a service authenticates.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;
