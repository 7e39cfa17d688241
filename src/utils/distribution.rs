use crate::models::{Line, OutcomeRange};
use crate::utils::normalizer::normalize;
use tracing::{debug, warn};

/// Slice the outcome space into ordered, disjoint ranges from a set of lines.
///
/// Output is the bottom tail, then the slices between consecutive thresholds,
/// then the top tail, which is ascending by outcome. Inconsistent input is not
/// corrected here: a non-monotonic pair yields a negative probability and
/// adjacent thresholds with no integer between them yield a range with
/// `min > max`. Both are reported by [`crate::utils::validator::validate`].
pub fn distribute(lines: &[Line]) -> Vec<OutcomeRange> {
    let normalized = normalize(lines);
    let (Some(first), Some(last)) = (normalized.first(), normalized.last()) else {
        return Vec::new();
    };

    let mut ranges = Vec::with_capacity(normalized.len() + 1);

    let bottom = first.threshold.floor();
    ranges.push(OutcomeRange {
        label: format!("≤{}", bottom),
        probability: 1.0 - first.over_probability,
        min: None,
        max: Some(bottom),
    });

    for pair in normalized.windows(2) {
        let (cur, next) = (&pair[0], &pair[1]);
        // P(exceed cur) - P(exceed next) is the mass strictly between them
        let probability = cur.over_probability - next.over_probability;
        let lo = cur.threshold.ceil();
        let hi = next.threshold.floor();

        if lo > hi {
            warn!(
                lower = %cur.threshold,
                upper = %next.threshold,
                "no integer outcome between adjacent thresholds, emitting inverted range"
            );
        }

        let label = if lo == hi {
            lo.to_string()
        } else {
            format!("{}-{}", lo, hi)
        };

        ranges.push(OutcomeRange {
            label,
            probability,
            min: Some(lo),
            max: Some(hi),
        });
    }

    let top = last.threshold.ceil();
    ranges.push(OutcomeRange {
        label: format!("≥{}", top),
        probability: last.over_probability,
        min: Some(top),
        max: None,
    });

    debug!(
        thresholds = normalized.len(),
        ranges = ranges.len(),
        "distributed lines into outcome ranges"
    );

    ranges
}
