//! Statistical combination of per-sample point results into one regional
//! verdict.

use std::collections::HashMap;

use crate::error::{AggregationError, DataError};
use crate::models::{
    AtmosphericSignature, HumiditySignature, PointResult, PrecipitationSignature, RegionResult,
    RegionSample, SunlightSignature, TemperatureSignature, WindSignature,
};
use crate::scoring::utility::{mean, round_to};

/// One sampled coordinate together with its evaluation outcome.
#[derive(Debug)]
pub struct SampleOutcome {
    pub lat: f64,
    pub lon: f64,
    pub outcome: Result<PointResult, DataError>,
}

/// Combines the per-sample outcomes of a region request.
///
/// Failed samples are discarded and only reduce the evaluated count;
/// numeric signature fields aggregate by arithmetic mean at the same
/// display precision as the point-level field, and each `meets_profile`
/// flag by majority vote (true iff at least half the evaluated samples
/// agree). Fails only when no sample evaluated successfully.
pub fn aggregate(outcomes: Vec<SampleOutcome>) -> Result<RegionResult, AggregationError> {
    let successes: Vec<(f64, f64, PointResult)> = outcomes
        .into_iter()
        .filter_map(|sample| match sample.outcome {
            Ok(result) => Some((sample.lat, sample.lon, result)),
            Err(_) => None,
        })
        .collect();

    if successes.is_empty() {
        return Err(AggregationError::AllSamplesFailed);
    }
    let results: Vec<&PointResult> = successes.iter().map(|(_, _, r)| r).collect();

    let signature = AtmosphericSignature {
        temperature: TemperatureSignature::new(
            round_to(mean_of(&results, |r| r.atmospheric_signature.temperature.avg), 1),
            round_to(mean_of(&results, |r| r.atmospheric_signature.temperature.min), 1),
            round_to(mean_of(&results, |r| r.atmospheric_signature.temperature.max), 1),
            majority(&results, |r| r.atmospheric_signature.temperature.meets_profile),
        ),
        wind: WindSignature::new(
            round_to(mean_of(&results, |r| r.atmospheric_signature.wind.avg), 1),
            round_to(mean_of(&results, |r| r.atmospheric_signature.wind.max), 1),
            majority(&results, |r| r.atmospheric_signature.wind.meets_profile),
        ),
        humidity: HumiditySignature::new(
            round_to(mean_of(&results, |r| r.atmospheric_signature.humidity.avg), 1),
            majority(&results, |r| r.atmospheric_signature.humidity.meets_profile),
        ),
        precipitation: PrecipitationSignature::new(
            round_to(
                mean_of(&results, |r| {
                    r.atmospheric_signature.precipitation.avg_daily_amount
                }),
                2,
            ),
            round_to(
                mean_of(&results, |r| {
                    r.atmospheric_signature.precipitation.estimated_daily_chance
                }),
                1,
            ),
            majority(&results, |r| {
                r.atmospheric_signature.precipitation.meets_profile
            }),
        ),
        sunlight: SunlightSignature::new(
            mean_of(&results, |r| {
                f64::from(r.atmospheric_signature.sunlight.sunny_day_likelihood)
            })
            .round() as u32,
            mean_of(&results, |r| r.atmospheric_signature.sunlight.clearness_index),
        ),
    };

    // Union of specialty keys across samples; each key averages over the
    // samples that report it.
    let mut specialty_series: HashMap<String, Vec<f64>> = HashMap::new();
    for result in &results {
        for (key, value) in &result.specialty_scores {
            specialty_series
                .entry(key.clone())
                .or_default()
                .push(f64::from(*value));
        }
    }
    let specialty_scores: HashMap<String, u32> = specialty_series
        .into_iter()
        .map(|(key, series)| (key, mean(&series).round() as u32))
        .collect();

    // A sample "meets the profile" only when every one of the four
    // threshold dimensions passes, not when its composite score is high.
    let meeting = results
        .iter()
        .filter(|r| {
            let sig = &r.atmospheric_signature;
            sig.temperature.meets_profile
                && sig.wind.meets_profile
                && sig.humidity.meets_profile
                && sig.precipitation.meets_profile
        })
        .count();
    let percent_meet_profile = round_to(meeting as f64 / results.len() as f64 * 100.0, 1);

    let overall_score = mean_of(&results, |r| f64::from(r.overall_score)).round() as u32;
    let location = results[0].location.clone();
    let samples_evaluated = results.len();

    let samples = successes
        .into_iter()
        .map(|(lat, lon, analysis)| RegionSample { lat, lon, analysis })
        .collect();

    Ok(RegionResult {
        overall_score,
        location,
        atmospheric_signature: signature,
        specialty_scores,
        percent_meet_profile,
        samples_evaluated,
        samples,
    })
}

fn mean_of<F>(results: &[&PointResult], field: F) -> f64
where
    F: Fn(&PointResult) -> f64,
{
    let values: Vec<f64> = results.iter().map(|r| field(r)).collect();
    mean(&values)
}

/// True iff at least half of the results report the flag as true.
fn majority<F>(results: &[&PointResult], flag: F) -> bool
where
    F: Fn(&PointResult) -> bool,
{
    let yes = results.iter().filter(|r| flag(r)).count();
    yes as f64 / results.len() as f64 >= 0.5
}
