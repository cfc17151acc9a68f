//! Clients for the external NASA services.

pub mod merra;
pub mod power;
