//! Data types for comfort profiles, raw climate statistics, and analysis results.
//!
//! Everything here is a per-request value: constructed fresh, serialized into
//! the response, and discarded. There is no shared or persistent state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-supplied acceptable-condition thresholds.
///
/// Every threshold has a serde default so callers can override only the
/// dimensions they care about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComfortProfile {
    /// Lowest acceptable average temperature, °C.
    #[serde(default = "default_temp_min")]
    pub temp_min: f64,
    /// Highest acceptable average temperature, °C.
    #[serde(default = "default_temp_max")]
    pub temp_max: f64,
    /// Highest acceptable average wind speed, m/s.
    #[serde(default = "default_wind_max")]
    pub wind_max: f64,
    /// Highest acceptable estimated chance of a rainy day, percent.
    #[serde(default = "default_rain_chance_max")]
    pub rain_chance_max: f64,
    /// Highest acceptable average relative humidity, percent.
    #[serde(default = "default_humidity_max")]
    pub humidity_max: f64,
}

fn default_temp_min() -> f64 {
    10.0
}

fn default_temp_max() -> f64 {
    25.0
}

fn default_wind_max() -> f64 {
    15.0
}

fn default_rain_chance_max() -> f64 {
    20.0
}

fn default_humidity_max() -> f64 {
    80.0
}

impl Default for ComfortProfile {
    fn default() -> Self {
        Self {
            temp_min: default_temp_min(),
            temp_max: default_temp_max(),
            wind_max: default_wind_max(),
            rain_chance_max: default_rain_chance_max(),
            humidity_max: default_humidity_max(),
        }
    }
}

/// Relative importance of the four comfort dimensions in the overall score.
///
/// Weights are non-negative; when they sum to zero the overall score is
/// defined as 0 rather than dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_weight")]
    pub temperature: f64,
    #[serde(default = "default_weight")]
    pub wind: f64,
    #[serde(default = "default_weight")]
    pub rain: f64,
    #[serde(default = "default_weight")]
    pub humidity: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            wind: 1.0,
            rain: 1.0,
            humidity: 1.0,
        }
    }
}

/// Monthly-average statistics for one location, as extracted from the
/// climatology provider for a single calendar month.
///
/// Each statistic is `None` when the provider did not report it. Only a
/// missing (or sentinel-valued) temperature average is fatal downstream;
/// the other statistics fall back to documented defaults at evaluation.
#[derive(Debug, Clone, Default)]
pub struct MonthlyClimate {
    /// Human-readable location label from the provider, when available.
    pub location: Option<String>,
    /// Average air temperature at 2 m, °C.
    pub temp_avg: Option<f64>,
    /// Average daily minimum temperature, °C.
    pub temp_min: Option<f64>,
    /// Average daily maximum temperature, °C.
    pub temp_max: Option<f64>,
    /// Average wind speed at 10 m, m/s.
    pub wind_avg: Option<f64>,
    /// Average daily maximum wind speed, m/s.
    pub wind_max: Option<f64>,
    /// Average relative humidity at 2 m, percent.
    pub humidity_avg: Option<f64>,
    /// Average daily precipitation, mm/day.
    pub precip_avg_daily: Option<f64>,
    /// Clearness index: ratio of actual to theoretical-maximum insolation,
    /// 0-1. Used as a sunniness proxy.
    pub clearness_index: Option<f64>,
}

/// Temperature breakdown of an atmospheric signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureSignature {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub meets_profile: bool,
    pub units: String,
}

impl TemperatureSignature {
    pub fn new(avg: f64, min: f64, max: f64, meets_profile: bool) -> Self {
        Self {
            avg,
            min,
            max,
            meets_profile,
            units: "°C".to_string(),
        }
    }
}

/// Wind breakdown of an atmospheric signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindSignature {
    pub avg: f64,
    pub max: f64,
    pub meets_profile: bool,
    pub units: String,
}

impl WindSignature {
    pub fn new(avg: f64, max: f64, meets_profile: bool) -> Self {
        Self {
            avg,
            max,
            meets_profile,
            units: "m/s".to_string(),
        }
    }
}

/// Humidity breakdown of an atmospheric signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumiditySignature {
    pub avg: f64,
    pub meets_profile: bool,
    pub units: String,
}

impl HumiditySignature {
    pub fn new(avg: f64, meets_profile: bool) -> Self {
        Self {
            avg,
            meets_profile,
            units: "%".to_string(),
        }
    }
}

/// Units for the two precipitation figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecipitationUnits {
    pub amount: String,
    pub chance: String,
}

/// Precipitation breakdown of an atmospheric signature.
///
/// `estimated_daily_chance` is a heuristic linear mapping from the mean
/// daily amount, not the output of a physical model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecipitationSignature {
    pub avg_daily_amount: f64,
    pub estimated_daily_chance: f64,
    pub meets_profile: bool,
    pub units: PrecipitationUnits,
}

impl PrecipitationSignature {
    pub fn new(avg_daily_amount: f64, estimated_daily_chance: f64, meets_profile: bool) -> Self {
        Self {
            avg_daily_amount,
            estimated_daily_chance,
            meets_profile,
            units: PrecipitationUnits {
                amount: "mm/day".to_string(),
                chance: "%".to_string(),
            },
        }
    }
}

/// Sunlight breakdown of an atmospheric signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunlightSignature {
    pub sunny_day_likelihood: u32,
    pub clearness_index: f64,
    pub units: String,
}

impl SunlightSignature {
    pub fn new(sunny_day_likelihood: u32, clearness_index: f64) -> Self {
        Self {
            sunny_day_likelihood,
            clearness_index,
            units: "% likelihood".to_string(),
        }
    }
}

/// Structured per-location comfort breakdown: how each atmospheric
/// dimension compares to the caller's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtmosphericSignature {
    pub temperature: TemperatureSignature,
    pub wind: WindSignature,
    pub humidity: HumiditySignature,
    pub precipitation: PrecipitationSignature,
    pub sunlight: SunlightSignature,
}

/// Full evaluation of one location for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointResult {
    /// Weighted composite score, always in 0-100.
    pub overall_score: u32,
    pub location: String,
    pub atmospheric_signature: AtmosphericSignature,
    /// Named auxiliary scores (heat discomfort, golden hour, outdoor
    /// activity). Map-typed so regional aggregation can union keys.
    pub specialty_scores: HashMap<String, u32>,
}

/// Per-sample detail entry carried on a region result, so callers can
/// render sample-level breakdowns without re-querying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSample {
    pub lat: f64,
    pub lon: f64,
    #[serde(flatten)]
    pub analysis: PointResult,
}

/// Aggregated verdict over all successfully evaluated samples of a region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionResult {
    /// Mean of the per-sample overall scores, rounded to an integer.
    pub overall_score: u32,
    /// Label of the first successfully evaluated sample.
    pub location: String,
    pub atmospheric_signature: AtmosphericSignature,
    pub specialty_scores: HashMap<String, u32>,
    /// Percentage of evaluated samples where temperature, wind, humidity
    /// and precipitation all individually meet the profile.
    pub percent_meet_profile: f64,
    /// Number of samples that evaluated successfully.
    pub samples_evaluated: usize,
    pub samples: Vec<RegionSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let profile = ComfortProfile::default();
        assert_eq!(profile.temp_min, 10.0);
        assert_eq!(profile.temp_max, 25.0);
        assert_eq!(profile.wind_max, 15.0);
        assert_eq!(profile.rain_chance_max, 20.0);
        assert_eq!(profile.humidity_max, 80.0);
    }

    #[test]
    fn test_partial_profile_fills_missing_fields() {
        let profile: ComfortProfile = serde_json::from_str(r#"{"temp_max": 30}"#).unwrap();
        assert_eq!(profile.temp_max, 30.0);
        assert_eq!(profile.temp_min, 10.0);
        assert_eq!(profile.humidity_max, 80.0);
    }

    #[test]
    fn test_weights_default_to_equal() {
        let weights: ScoreWeights = serde_json::from_str("{}").unwrap();
        assert_eq!(weights.temperature, 1.0);
        assert_eq!(weights.wind, 1.0);
        assert_eq!(weights.rain, 1.0);
        assert_eq!(weights.humidity, 1.0);
    }

    #[test]
    fn test_signature_units() {
        let sig = TemperatureSignature::new(20.0, 15.0, 25.0, true);
        assert_eq!(sig.units, "°C");

        let precip = PrecipitationSignature::new(0.5, 7.5, true);
        assert_eq!(precip.units.amount, "mm/day");
        assert_eq!(precip.units.chance, "%");
    }

    #[test]
    fn test_region_sample_serializes_flat() {
        let sample = RegionSample {
            lat: 40.0,
            lon: -3.7,
            analysis: PointResult {
                overall_score: 75,
                location: "Madrid".to_string(),
                atmospheric_signature: AtmosphericSignature {
                    temperature: TemperatureSignature::new(20.0, 12.0, 28.0, true),
                    wind: WindSignature::new(4.0, 9.0, true),
                    humidity: HumiditySignature::new(55.0, true),
                    precipitation: PrecipitationSignature::new(0.4, 6.0, true),
                    sunlight: SunlightSignature::new(70, 0.7),
                },
                specialty_scores: HashMap::new(),
            },
        };

        let value = serde_json::to_value(&sample).unwrap();
        assert_eq!(value["lat"], 40.0);
        assert_eq!(value["overall_score"], 75);
        assert_eq!(value["location"], "Madrid");
    }
}
