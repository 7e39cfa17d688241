use crate::error::OddsError;
use crate::models::AmericanOdds;

/// Convert American odds to implied probability
/// Positive odds (+150) mean you win $150 on a $100 bet
/// Negative odds (-150) mean you need to bet $150 to win $100
pub fn implied_probability(odds: i32) -> Result<f64, OddsError> {
    Ok(AmericanOdds::new(odds)?.implied_probability())
}

impl AmericanOdds {
    /// Break-even probability for this price
    pub fn implied_probability(&self) -> f64 {
        let odds = self.get();
        if odds > 0 {
            // For positive odds: 100 / (odds + 100)
            100.0 / (odds as f64 + 100.0)
        } else {
            // For negative odds: |odds| / (|odds| + 100)
            let abs_odds = odds.unsigned_abs() as f64;
            abs_odds / (abs_odds + 100.0)
        }
    }
}

/// Convert probability to American odds, rounded to the nearest whole price.
/// Returns None when the probability is not strictly between 0 and 1.
pub fn probability_to_american_odds(prob: f64) -> Option<i32> {
    if !(prob > 0.0 && prob < 1.0) {
        return None;
    }
    let odds = if prob >= 0.5 {
        // Favorite (negative odds)
        -(prob / (1.0 - prob)) * 100.0
    } else {
        // Underdog (positive odds)
        ((1.0 - prob) / prob) * 100.0
    };
    let odds = odds.round();
    if odds.abs() > i32::MAX as f64 {
        return None;
    }
    Some(odds as i32)
}
