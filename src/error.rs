use thiserror::Error;

/// American odds of zero have no defined payout
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OddsError {
    #[error("american odds cannot be zero")]
    ZeroOdds,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ThresholdError {
    #[error("threshold must be a finite number, got {0}")]
    NonFinite(f64),

    #[error("threshold {0} is outside the supported range")]
    OutOfRange(f64),
}

/// Errors from building a line, either from parts or from its text form
/// such as `"Over 28.5 @ -110"`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("line is missing a direction")]
    MissingDirection,

    #[error("unknown direction '{0}', expected over or under")]
    UnknownDirection(String),

    #[error("line is missing a threshold")]
    MissingThreshold,

    #[error("invalid threshold '{0}'")]
    InvalidThreshold(String),

    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error("line is missing odds")]
    MissingOdds,

    #[error("invalid odds '{0}'")]
    InvalidOdds(String),

    #[error(transparent)]
    Odds(#[from] OddsError),

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}
