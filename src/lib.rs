pub mod error;
pub mod models;
pub mod utils;

pub use error::*;
pub use models::*;
pub use utils::*;

pub use utils::distribution::distribute;
pub use utils::normalizer::normalize;
pub use utils::odds_converter::{implied_probability, probability_to_american_odds};
pub use utils::validator::validate;

use serde::{Deserialize, Serialize};

/// Everything we report for one set of lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAnalysis {
    pub lines: Vec<Line>,
    pub normalized: Vec<NormalizedThreshold>,
    pub ranges: Vec<OutcomeRange>,
    pub total_probability: f64,
    pub validation: ValidationResult,
}

/// Build the outcome distribution and run validation over the same lines.
///
/// The two passes do not share intermediate state, so a problem in the
/// market-efficiency report can never change the distribution.
pub fn analyze(lines: &[Line]) -> LineAnalysis {
    let normalized = normalize(lines);
    let ranges = distribute(lines);
    let validation = validate(lines);
    let total_probability = ranges.iter().map(|range| range.probability).sum();

    LineAnalysis {
        lines: lines.to_vec(),
        normalized,
        ranges,
        total_probability,
        validation,
    }
}
