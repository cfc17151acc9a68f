//! Trait for sourcing climatological statistics.

use crate::error::DataError;
use crate::models::MonthlyClimate;

/// Abstraction over a climatology data source (e.g., NASA POWER).
///
/// `Send + Sync` so one provider can be shared across the HTTP server
/// and concurrently evaluated region samples.
#[async_trait::async_trait]
pub trait ClimatologyProvider: Send + Sync {
    /// Returns the long-term monthly statistics for a coordinate.
    ///
    /// `month` is 1-based (1 = January). Fields the source does not
    /// report come back as `None`; scoring applies its own fallbacks.
    async fn monthly_climatology(
        &self,
        lat: f64,
        lon: f64,
        month: u32,
    ) -> Result<MonthlyClimate, DataError>;
}
