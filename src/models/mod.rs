use crate::error::{LineError, OddsError, ThresholdError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Thresholds are stored in thousandths so equal lines group exactly
const THRESHOLD_SCALE: i64 = 1000;

/// Largest threshold magnitude we accept before the fixed-point value could overflow
const MAX_THRESHOLD_ABS: f64 = 1e12;

/// Which side of a threshold a line pays out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "Over", alias = "OVER")]
    Over,
    #[serde(alias = "Under", alias = "UNDER")]
    Under,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Over => write!(f, "Over"),
            Direction::Under => write!(f, "Under"),
        }
    }
}

impl FromStr for Direction {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "over" | "o" => Ok(Direction::Over),
            "under" | "u" => Ok(Direction::Under),
            _ => Err(LineError::UnknownDirection(s.to_string())),
        }
    }
}

/// A betting threshold such as `28.5`, held as a fixed-point number of thousandths
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold {
    millis: i64,
}

impl Threshold {
    /// Build a threshold from a float, rounding to the nearest thousandth
    pub fn from_f64(value: f64) -> Result<Self, ThresholdError> {
        if !value.is_finite() {
            return Err(ThresholdError::NonFinite(value));
        }
        if value.abs() > MAX_THRESHOLD_ABS {
            return Err(ThresholdError::OutOfRange(value));
        }
        Ok(Self {
            millis: (value * THRESHOLD_SCALE as f64).round() as i64,
        })
    }

    pub fn value(&self) -> f64 {
        self.millis as f64 / THRESHOLD_SCALE as f64
    }

    /// Largest integer outcome at or below the threshold
    pub fn floor(&self) -> i64 {
        self.millis.div_euclid(THRESHOLD_SCALE)
    }

    /// Smallest integer outcome at or above the threshold
    pub fn ceil(&self) -> i64 {
        -(-self.millis).div_euclid(THRESHOLD_SCALE)
    }

    /// Distance to another threshold in outcome units
    pub fn distance_to(&self, other: &Threshold) -> f64 {
        (other.millis - self.millis).abs() as f64 / THRESHOLD_SCALE as f64
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Threshold::from_f64(value)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.value()
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// American odds format (e.g., -110, +150). Zero is not a valid price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct AmericanOdds(i32);

impl AmericanOdds {
    pub fn new(odds: i32) -> Result<Self, OddsError> {
        if odds == 0 {
            return Err(OddsError::ZeroOdds);
        }
        Ok(Self(odds))
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for AmericanOdds {
    type Error = OddsError;

    fn try_from(odds: i32) -> Result<Self, Self::Error> {
        AmericanOdds::new(odds)
    }
}

impl From<AmericanOdds> for i32 {
    fn from(odds: AmericanOdds) -> Self {
        odds.0
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// A single sportsbook line, e.g. Over 28.5 @ -110
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub direction: Direction,
    pub threshold: Threshold,
    pub odds: AmericanOdds,
}

impl Line {
    pub fn new(direction: Direction, threshold: Threshold, odds: AmericanOdds) -> Self {
        Self {
            direction,
            threshold,
            odds,
        }
    }

    /// Build a line from raw numbers, rejecting zero odds and non-finite thresholds
    pub fn try_new(direction: Direction, threshold: f64, odds: i32) -> Result<Self, LineError> {
        Ok(Self::new(
            direction,
            Threshold::from_f64(threshold)?,
            AmericanOdds::new(odds)?,
        ))
    }

    pub fn over(threshold: f64, odds: i32) -> Result<Self, LineError> {
        Self::try_new(Direction::Over, threshold, odds)
    }

    pub fn under(threshold: f64, odds: i32) -> Result<Self, LineError> {
        Self::try_new(Direction::Under, threshold, odds)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {}", self.direction, self.threshold, self.odds)
    }
}

impl FromStr for Line {
    type Err = LineError;

    /// Parses `"Over 28.5 @ -110"`; the `@` is optional
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace().filter(|token| *token != "@");

        let direction: Direction = tokens.next().ok_or(LineError::MissingDirection)?.parse()?;

        let threshold_token = tokens.next().ok_or(LineError::MissingThreshold)?;
        let threshold: f64 = threshold_token
            .parse()
            .map_err(|_| LineError::InvalidThreshold(threshold_token.to_string()))?;

        let odds_token = tokens.next().ok_or(LineError::MissingOdds)?;
        let odds: i32 = odds_token
            .parse()
            .map_err(|_| LineError::InvalidOdds(odds_token.to_string()))?;

        let rest: Vec<&str> = tokens.collect();
        if !rest.is_empty() {
            return Err(LineError::TrailingInput(rest.join(" ")));
        }

        Line::try_new(direction, threshold, odds)
    }
}

/// Probability of the outcome exceeding a threshold after merging Over/Under lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedThreshold {
    pub threshold: Threshold,
    pub over_probability: f64,
}

/// A contiguous block of integer outcomes and its probability.
/// A missing `min` or `max` marks an open-ended tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRange {
    pub label: String,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl OutcomeRange {
    pub fn contains(&self, outcome: i64) -> bool {
        self.min.map_or(true, |min| outcome >= min) && self.max.map_or(true, |max| outcome <= max)
    }

    /// Fair American odds for this range, if its probability is strictly between 0 and 1
    pub fn fair_odds(&self) -> Option<i32> {
        crate::utils::odds_converter::probability_to_american_odds(self.probability)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    ContradictoryProbabilities,
    NegativeProbability,
    DuplicateLine,
    Vig,
    Arbitrage,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueKind::ContradictoryProbabilities => "contradictory_probabilities",
            IssueKind::NegativeProbability => "negative_probability",
            IssueKind::DuplicateLine => "duplicate_line",
            IssueKind::Vig => "vig",
            IssueKind::Arbitrage => "arbitrage",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    /// Bookmaker margin for vig and arbitrage issues
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// `is_valid` holds iff no issue is an error
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let is_valid = !issues.iter().any(|issue| issue.severity == Severity::Error);
        Self { is_valid, issues }
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }
}
