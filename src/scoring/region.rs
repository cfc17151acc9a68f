//! Point and region evaluation pipelines.
//!
//! A point evaluation is one provider fetch followed by scoring. A region
//! evaluation samples coordinates inside a polygon, evaluates each sample
//! concurrently against the same provider, and folds the outcomes into a
//! single [`RegionResult`].

use std::sync::Arc;

use tracing::Instrument;
use tracing::{error, warn};

use crate::error::{AggregationError, DataError};
use crate::models::{ComfortProfile, PointResult, RegionResult, ScoreWeights};
use crate::scoring::aggregate::{SampleOutcome, aggregate};
use crate::scoring::evaluate::evaluate;
use crate::scoring::sample::generate_samples;
use crate::services::ClimatologyProvider;

/// Fetches climatology for one coordinate and scores it.
pub async fn evaluate_point(
    provider: &dyn ClimatologyProvider,
    lat: f64,
    lon: f64,
    month: u32,
    profile: &ComfortProfile,
    weights: &ScoreWeights,
) -> Result<PointResult, DataError> {
    let stats = provider.monthly_climatology(lat, lon, month).await?;
    evaluate(&stats, profile, weights)
}

/// Evaluates every sampled coordinate of a polygon and aggregates the results.
///
/// Samples are fetched concurrently but outcomes are folded in generation
/// order, so the response sample list follows the grid scan. A sample whose
/// fetch or scoring fails is logged and carried as a failed outcome; the
/// whole evaluation fails only when the polygon is unusable or no sample
/// succeeds.
#[tracing::instrument(skip(provider, ring, profile, weights), fields(vertices = ring.len()))]
pub async fn evaluate_region(
    provider: Arc<dyn ClimatologyProvider>,
    ring: &[(f64, f64)],
    month: u32,
    profile: &ComfortProfile,
    weights: &ScoreWeights,
    sample_count: usize,
) -> Result<RegionResult, AggregationError> {
    let samples = generate_samples(ring, sample_count)?;

    let mut tasks = vec![];

    for (lat, lon) in samples {
        let provider = provider.clone();
        let profile = profile.clone();
        let weights = weights.clone();

        let sample_span = tracing::info_span!("evaluate_sample", lat, lon);

        let task = tokio::spawn(
            async move {
                let outcome =
                    evaluate_point(provider.as_ref(), lat, lon, month, &profile, &weights).await;
                SampleOutcome { lat, lon, outcome }
            }
            .instrument(sample_span),
        );

        tasks.push(task);
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(sample) => {
                if let Err(e) = &sample.outcome {
                    warn!(lat = sample.lat, lon = sample.lon, error = %e, "Sample evaluation failed");
                }
                outcomes.push(sample);
            }
            Err(e) => {
                error!(error = %e, "Sample task panicked");
            }
        }
    }

    aggregate(outcomes)
}
