//! Point evaluation: converts raw monthly climate statistics into an
//! atmospheric signature and a weighted overall comfort score.

use std::collections::HashMap;

use crate::error::DataError;
use crate::models::{
    AtmosphericSignature, ComfortProfile, HumiditySignature, MonthlyClimate, PointResult,
    PrecipitationSignature, ScoreWeights, SunlightSignature, TemperatureSignature, WindSignature,
};
use crate::scoring::utility::round_to;

/// NASA POWER encodes missing statistics as -999. Anything below this
/// threshold is treated as absent rather than scored.
pub const MISSING_THRESHOLD: f64 = -900.0;

/// Multiplier mapping mean daily precipitation (mm) to an estimated chance
/// of a rainy day, capped at 100%. An empirical heuristic, not a physical
/// model; kept as-is for behavioral compatibility.
const RAIN_CHANCE_PER_MM: f64 = 15.0;

/// Average temperature above which heat discomfort is considered at all, °C.
const HEAT_DISCOMFORT_FLOOR_C: f64 = 27.0;

/// Perceived temperature in °C from air temperature and relative humidity.
///
/// Below 80 °F the NOAA simplified formula applies; at or above it, the full
/// Rothfusz regression. Both operate in Fahrenheit internally, so the input
/// is converted on the way in and the result on the way out.
pub fn heat_index(temp_c: f64, humidity: f64) -> f64 {
    let t = temp_c * 9.0 / 5.0 + 32.0;
    let rh = humidity;

    let hi = if t < 80.0 {
        0.5 * (t + 61.0 + ((t - 68.0) * 1.2) + (rh * 0.094))
    } else {
        -42.379 + 2.04901523 * t + 10.14333127 * rh
            - 0.22475541 * t * rh
            - 0.00683783 * t * t
            - 0.05481717 * rh * rh
            + 0.00122874 * t * t * rh
            + 0.00085282 * t * rh * rh
            - 0.00000199 * t * t * rh * rh
    };

    (hi - 32.0) * 5.0 / 9.0
}

/// Scores one location's monthly statistics against a comfort profile.
///
/// Fails only when the temperature average is absent or carries the
/// provider's missing-value sentinel; every downstream score anchors on it.
/// Other missing statistics fall back to documented defaults: 0 for wind
/// and precipitation, 50% humidity, 0.5 clearness (partly cloudy), and the
/// average for a missing extreme.
pub fn evaluate(
    stats: &MonthlyClimate,
    profile: &ComfortProfile,
    weights: &ScoreWeights,
) -> Result<PointResult, DataError> {
    let temp_avg = match stats.temp_avg {
        Some(t) if t > MISSING_THRESHOLD => t,
        _ => {
            return Err(DataError::MissingData(
                "core temperature statistic (T2M) is missing for this location".to_string(),
            ));
        }
    };
    let temp_max = stats.temp_max.unwrap_or(temp_avg);
    let temp_min = stats.temp_min.unwrap_or(temp_avg);
    let temp_ok = profile.temp_min <= temp_avg && temp_avg <= profile.temp_max;

    let wind_avg = stats.wind_avg.unwrap_or(0.0);
    let wind_max = stats.wind_max.unwrap_or(wind_avg);
    let wind_ok = wind_avg <= profile.wind_max;

    let humidity_avg = stats.humidity_avg.unwrap_or(50.0);
    let humidity_ok = humidity_avg <= profile.humidity_max;

    let precip_avg = stats.precip_avg_daily.unwrap_or(0.0);
    let rain_chance = (precip_avg * RAIN_CHANCE_PER_MM).min(100.0);
    let rain_ok = rain_chance <= profile.rain_chance_max;

    // Weighted composite of the four pass/fail dimensions, scaled to 0-100.
    let total_weight = weights.temperature + weights.wind + weights.rain + weights.humidity;
    let overall_score = if total_weight > 0.0 {
        let weighted = pass(temp_ok) * weights.temperature
            + pass(wind_ok) * weights.wind
            + pass(rain_ok) * weights.rain
            + pass(humidity_ok) * weights.humidity;
        ((weighted / total_weight) * 100.0).round() as u32
    } else {
        0
    };

    let perceived = heat_index(temp_avg, humidity_avg);
    let uncomfortable_heat_chance = if temp_avg > HEAT_DISCOMFORT_FLOOR_C {
        ((perceived - HEAT_DISCOMFORT_FLOOR_C) * 10.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let clearness = stats.clearness_index.unwrap_or(0.5);
    let golden_hour_quality = (clearness * 10.0).round() as u32;
    let sunny_day_likelihood = (clearness * 100.0).round() as u32;
    // A simple blend of the main score and the likelihood of sun, not an
    // independently weighted dimension.
    let outdoor_activity_index =
        ((f64::from(overall_score) + f64::from(sunny_day_likelihood)) / 2.0).round() as u32;

    let mut specialty_scores = HashMap::new();
    specialty_scores.insert(
        "uncomfortable_heat_chance".to_string(),
        uncomfortable_heat_chance.round() as u32,
    );
    specialty_scores.insert("golden_hour_quality".to_string(), golden_hour_quality);
    specialty_scores.insert("outdoor_activity_index".to_string(), outdoor_activity_index);

    Ok(PointResult {
        overall_score,
        location: stats
            .location
            .clone()
            .unwrap_or_else(|| "Unknown Location".to_string()),
        atmospheric_signature: AtmosphericSignature {
            temperature: TemperatureSignature::new(
                round_to(temp_avg, 1),
                round_to(temp_min, 1),
                round_to(temp_max, 1),
                temp_ok,
            ),
            wind: WindSignature::new(round_to(wind_avg, 1), round_to(wind_max, 1), wind_ok),
            humidity: HumiditySignature::new(round_to(humidity_avg, 1), humidity_ok),
            precipitation: PrecipitationSignature::new(
                round_to(precip_avg, 2),
                round_to(rain_chance, 1),
                rain_ok,
            ),
            sunlight: SunlightSignature::new(sunny_day_likelihood, clearness),
        },
        specialty_scores,
    })
}

fn pass(ok: bool) -> f64 {
    if ok { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mild_stats() -> MonthlyClimate {
        MonthlyClimate {
            location: Some("Testville".to_string()),
            temp_avg: Some(20.0),
            temp_min: Some(14.0),
            temp_max: Some(26.0),
            wind_avg: Some(5.0),
            wind_max: Some(11.0),
            humidity_avg: Some(60.0),
            precip_avg_daily: Some(0.5),
            clearness_index: Some(0.6),
        }
    }

    #[test]
    fn test_all_dimensions_in_profile_score_100() {
        let result = evaluate(
            &mild_stats(),
            &ComfortProfile::default(),
            &ScoreWeights::default(),
        )
        .unwrap();

        assert_eq!(result.overall_score, 100);
        assert_eq!(result.location, "Testville");

        let sig = &result.atmospheric_signature;
        assert!(sig.temperature.meets_profile);
        assert!(sig.wind.meets_profile);
        assert!(sig.humidity.meets_profile);
        assert!(sig.precipitation.meets_profile);
        // 0.5 mm/day maps to a 7.5% chance, under the default 20% limit
        assert_eq!(sig.precipitation.estimated_daily_chance, 7.5);
    }

    #[test]
    fn test_zero_total_weight_scores_zero() {
        let weights = ScoreWeights {
            temperature: 0.0,
            wind: 0.0,
            rain: 0.0,
            humidity: 0.0,
        };
        let result = evaluate(&mild_stats(), &ComfortProfile::default(), &weights).unwrap();
        assert_eq!(result.overall_score, 0);
    }

    #[test]
    fn test_weighted_partial_pass() {
        // Temperature fails, the rest pass; temperature carries 3 of 6
        // total weight, so the score is 50.
        let profile = ComfortProfile {
            temp_max: 15.0,
            ..ComfortProfile::default()
        };
        let weights = ScoreWeights {
            temperature: 3.0,
            wind: 1.0,
            rain: 1.0,
            humidity: 1.0,
        };
        let result = evaluate(&mild_stats(), &profile, &weights).unwrap();
        assert_eq!(result.overall_score, 50);
        assert!(!result.atmospheric_signature.temperature.meets_profile);
    }

    #[test]
    fn test_score_stays_in_range() {
        let profiles = [
            ComfortProfile::default(),
            ComfortProfile {
                temp_min: -50.0,
                temp_max: 50.0,
                wind_max: 100.0,
                rain_chance_max: 100.0,
                humidity_max: 100.0,
            },
            ComfortProfile {
                temp_min: 0.0,
                temp_max: 0.0,
                wind_max: 0.0,
                rain_chance_max: 0.0,
                humidity_max: 0.0,
            },
        ];
        for profile in profiles {
            let result = evaluate(&mild_stats(), &profile, &ScoreWeights::default()).unwrap();
            assert!(result.overall_score <= 100);
        }
    }

    #[test]
    fn test_missing_temperature_is_fatal() {
        let stats = MonthlyClimate {
            temp_avg: None,
            ..mild_stats()
        };
        let err = evaluate(&stats, &ComfortProfile::default(), &ScoreWeights::default())
            .unwrap_err();
        assert!(matches!(err, DataError::MissingData(_)));
    }

    #[test]
    fn test_sentinel_temperature_is_rejected_not_scored() {
        let stats = MonthlyClimate {
            temp_avg: Some(-999.0),
            ..mild_stats()
        };
        let err = evaluate(&stats, &ComfortProfile::default(), &ScoreWeights::default())
            .unwrap_err();
        assert!(matches!(err, DataError::MissingData(_)));
    }

    #[test]
    fn test_missing_optional_stats_use_defaults() {
        let stats = MonthlyClimate {
            location: None,
            temp_avg: Some(20.0),
            temp_min: None,
            temp_max: None,
            wind_avg: None,
            wind_max: None,
            humidity_avg: None,
            precip_avg_daily: None,
            clearness_index: None,
        };
        let result = evaluate(&stats, &ComfortProfile::default(), &ScoreWeights::default())
            .unwrap();

        let sig = &result.atmospheric_signature;
        // Extremes fall back to the average
        assert_eq!(sig.temperature.min, 20.0);
        assert_eq!(sig.temperature.max, 20.0);
        assert_eq!(sig.wind.avg, 0.0);
        assert_eq!(sig.humidity.avg, 50.0);
        assert_eq!(sig.precipitation.avg_daily_amount, 0.0);
        // Missing clearness defaults to partly cloudy
        assert_eq!(sig.sunlight.clearness_index, 0.5);
        assert_eq!(sig.sunlight.sunny_day_likelihood, 50);
        assert_eq!(result.location, "Unknown Location");
    }

    #[test]
    fn test_rain_chance_capped_at_100() {
        let stats = MonthlyClimate {
            precip_avg_daily: Some(40.0),
            ..mild_stats()
        };
        let result = evaluate(&stats, &ComfortProfile::default(), &ScoreWeights::default())
            .unwrap();
        assert_eq!(
            result.atmospheric_signature.precipitation.estimated_daily_chance,
            100.0
        );
    }

    #[test]
    fn test_heat_index_continuous_at_formula_boundary() {
        // 80 °F is 26.667 °C; the simplified and Rothfusz formulas should
        // agree there to within their own approximation error.
        let boundary_c = (80.0 - 32.0) * 5.0 / 9.0;
        let below = heat_index(boundary_c - 0.01, 50.0);
        let above = heat_index(boundary_c + 0.01, 50.0);
        assert!(
            (below - above).abs() < 1.0,
            "discontinuity of {} °C at the 80 °F boundary",
            (below - above).abs()
        );
    }

    #[test]
    fn test_heat_index_rises_with_humidity_when_hot() {
        let dry = heat_index(35.0, 20.0);
        let humid = heat_index(35.0, 90.0);
        assert!(humid > dry);
    }

    #[test]
    fn test_no_heat_discomfort_below_floor() {
        let result = evaluate(&mild_stats(), &ComfortProfile::default(), &ScoreWeights::default())
            .unwrap();
        assert_eq!(result.specialty_scores["uncomfortable_heat_chance"], 0);
    }

    #[test]
    fn test_heat_discomfort_clamped_to_100() {
        let stats = MonthlyClimate {
            temp_avg: Some(42.0),
            humidity_avg: Some(95.0),
            ..mild_stats()
        };
        let result = evaluate(&stats, &ComfortProfile::default(), &ScoreWeights::default())
            .unwrap();
        assert_eq!(result.specialty_scores["uncomfortable_heat_chance"], 100);
    }

    #[test]
    fn test_sunlight_scores_from_clearness() {
        let stats = MonthlyClimate {
            clearness_index: Some(0.72),
            ..mild_stats()
        };
        let result = evaluate(&stats, &ComfortProfile::default(), &ScoreWeights::default())
            .unwrap();
        assert_eq!(result.specialty_scores["golden_hour_quality"], 7);
        assert_eq!(
            result.atmospheric_signature.sunlight.sunny_day_likelihood,
            72
        );
        // Blend of overall score 100 and sunny likelihood 72
        assert_eq!(result.specialty_scores["outdoor_activity_index"], 86);
    }

    #[test]
    fn test_display_rounding() {
        let stats = MonthlyClimate {
            temp_avg: Some(20.07),
            temp_min: Some(13.94),
            temp_max: Some(26.33),
            precip_avg_daily: Some(0.519),
            ..mild_stats()
        };
        let result = evaluate(&stats, &ComfortProfile::default(), &ScoreWeights::default())
            .unwrap();
        let sig = &result.atmospheric_signature;
        assert_eq!(sig.temperature.avg, 20.1);
        assert_eq!(sig.temperature.min, 13.9);
        assert_eq!(sig.temperature.max, 26.3);
        assert_eq!(sig.precipitation.avg_daily_amount, 0.52);
        assert_eq!(sig.precipitation.estimated_daily_chance, 7.8);
    }
}
