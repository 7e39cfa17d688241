use crate::models::{Direction, Line, NormalizedThreshold, Threshold};
use std::collections::BTreeMap;

/// Over and Under implied probabilities quoted at one threshold
#[derive(Debug, Default, Clone, Copy)]
struct ThresholdQuotes {
    over: Option<f64>,
    under: Option<f64>,
}

impl ThresholdQuotes {
    /// Probability of exceeding the threshold, removing vig when both sides are quoted
    fn over_probability(&self) -> Option<f64> {
        match (self.over, self.under) {
            (Some(over), Some(under)) => Some(over / (over + under)),
            (Some(over), None) => Some(over),
            (None, Some(under)) => Some(1.0 - under),
            (None, None) => None,
        }
    }
}

/// Merge lines into one over-probability per distinct threshold, sorted ascending.
/// If a direction is quoted more than once at a threshold, the first quote wins.
pub fn normalize(lines: &[Line]) -> Vec<NormalizedThreshold> {
    let mut groups: BTreeMap<Threshold, ThresholdQuotes> = BTreeMap::new();

    for line in lines {
        let quotes = groups.entry(line.threshold).or_default();
        let slot = match line.direction {
            Direction::Over => &mut quotes.over,
            Direction::Under => &mut quotes.under,
        };
        if slot.is_none() {
            *slot = Some(line.odds.implied_probability());
        }
    }

    groups
        .into_iter()
        .filter_map(|(threshold, quotes)| {
            quotes
                .over_probability()
                .map(|over_probability| NormalizedThreshold {
                    threshold,
                    over_probability,
                })
        })
        .collect()
}
