use crate::core::{PartialEstimate, Point};
use tracing::warn;

/// Merge sub-region estimates into one, weighting location and error by
/// each estimate's confidence.
///
/// The combined confidence is the plain mean of the input confidences. When
/// every input has zero confidence the weighted averages are undefined, so
/// location and error fall back to unweighted means.
pub fn combine_estimates(results: &[PartialEstimate]) -> PartialEstimate {
    match results {
        [] => PartialEstimate::no_data(),
        [only] => *only,
        _ => {
            let count = results.len() as f64;
            let total_weight: f64 = results.iter().map(|r| r.confidence).sum();

            if total_weight == 0.0 {
                warn!(estimates = results.len(), "all sub-estimates have zero confidence, using unweighted mean");
                return unweighted_mean(results);
            }

            let (mut weighted_x, mut weighted_y, mut weighted_error) = (0.0, 0.0, 0.0);
            for result in results {
                let weight = result.confidence;
                weighted_x += result.location.x * weight;
                weighted_y += result.location.y * weight;
                weighted_error += result.error * weight;
            }

            PartialEstimate::new(
                Point::new(weighted_x / total_weight, weighted_y / total_weight),
                total_weight / count,
                weighted_error / total_weight,
            )
        }
    }
}

fn unweighted_mean(results: &[PartialEstimate]) -> PartialEstimate {
    let count = results.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_error) = (0.0, 0.0, 0.0);
    for result in results {
        sum_x += result.location.x;
        sum_y += result.location.y;
        sum_error += result.error;
    }
    PartialEstimate::new(Point::new(sum_x / count, sum_y / count), 0.0, sum_error / count)
}
