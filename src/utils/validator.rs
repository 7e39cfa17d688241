use crate::models::{
    Direction, IssueKind, Line, Severity, Threshold, ValidationIssue, ValidationResult,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Adjacent thresholds closer than this are flagged as near-duplicates
const MIN_THRESHOLD_SPACING: f64 = 1.0;

/// Raw implied probabilities quoted at one threshold
#[derive(Debug, Default)]
struct Quotes {
    over: Vec<f64>,
    under: Vec<f64>,
}

/// Check a set of lines for contradictions and report bookmaker margin.
///
/// Runs its own normalization rather than sharing the distribution engine's,
/// so the market-efficiency view and the outcome distribution stay independent.
pub fn validate(lines: &[Line]) -> ValidationResult {
    let mut by_threshold: BTreeMap<Threshold, Quotes> = BTreeMap::new();
    for line in lines {
        let quotes = by_threshold.entry(line.threshold).or_default();
        let prob = line.odds.implied_probability();
        match line.direction {
            Direction::Over => quotes.over.push(prob),
            Direction::Under => quotes.under.push(prob),
        }
    }

    let mut issues = Vec::new();
    check_duplicates(&by_threshold, &mut issues);
    check_adjacent_thresholds(&by_threshold, &mut issues);
    check_market_efficiency(&by_threshold, &mut issues);

    let result = ValidationResult::from_issues(issues);
    debug!(
        lines = lines.len(),
        issues = result.issues.len(),
        is_valid = result.is_valid,
        "validated lines"
    );
    result
}

fn check_duplicates(
    by_threshold: &BTreeMap<Threshold, Quotes>,
    issues: &mut Vec<ValidationIssue>,
) {
    for (threshold, quotes) in by_threshold {
        let sides = [
            (Direction::Over, &quotes.over),
            (Direction::Under, &quotes.under),
        ];
        for (direction, probs) in sides {
            if probs.len() > 1 {
                issues.push(ValidationIssue {
                    kind: IssueKind::DuplicateLine,
                    severity: Severity::Warning,
                    message: format!(
                        "{} {} is quoted {} times; only the first quote is used",
                        direction,
                        threshold,
                        probs.len()
                    ),
                    margin: None,
                });
            }
        }
    }
}

/// Monotonicity, proximity and negative-slice checks across distinct thresholds
fn check_adjacent_thresholds(
    by_threshold: &BTreeMap<Threshold, Quotes>,
    issues: &mut Vec<ValidationIssue>,
) {
    let normalized: Vec<(Threshold, f64)> = by_threshold
        .iter()
        .filter_map(|(threshold, quotes)| {
            let over_probability = match (quotes.over.first(), quotes.under.first()) {
                (Some(over), Some(under)) => over / (over + under),
                (Some(over), None) => *over,
                (None, Some(under)) => 1.0 - under,
                (None, None) => return None,
            };
            Some((*threshold, over_probability))
        })
        .collect();

    for pair in normalized.windows(2) {
        let ((lower, lower_prob), (upper, upper_prob)) = (pair[0], pair[1]);

        if upper_prob > lower_prob {
            issues.push(ValidationIssue {
                kind: IssueKind::ContradictoryProbabilities,
                severity: Severity::Error,
                message: format!(
                    "P(over {}) = {:.1}% is higher than P(over {}) = {:.1}%",
                    upper,
                    upper_prob * 100.0,
                    lower,
                    lower_prob * 100.0
                ),
                margin: None,
            });
        }

        let spacing = lower.distance_to(&upper);
        if spacing < MIN_THRESHOLD_SPACING {
            issues.push(ValidationIssue {
                kind: IssueKind::ContradictoryProbabilities,
                severity: Severity::Warning,
                message: format!(
                    "thresholds {} and {} are only {} apart",
                    lower, upper, spacing
                ),
                margin: None,
            });
        }

        let slice = lower_prob - upper_prob;
        if slice < 0.0 {
            issues.push(ValidationIssue {
                kind: IssueKind::NegativeProbability,
                severity: Severity::Error,
                message: format!(
                    "outcomes between {} and {} have negative probability ({:.2}%)",
                    lower,
                    upper,
                    slice * 100.0
                ),
                margin: None,
            });
        }
    }
}

/// Vig and arbitrage on thresholds quoted on both sides, from raw odds
fn check_market_efficiency(
    by_threshold: &BTreeMap<Threshold, Quotes>,
    issues: &mut Vec<ValidationIssue>,
) {
    for (threshold, quotes) in by_threshold {
        let (Some(over), Some(under)) = (quotes.over.first(), quotes.under.first()) else {
            continue;
        };
        let total = over + under;

        if total > 1.0 {
            let margin = total - 1.0;
            issues.push(ValidationIssue {
                kind: IssueKind::Vig,
                severity: Severity::Info,
                message: format!("line {} carries {:.2}% vig", threshold, margin * 100.0),
                margin: Some(margin),
            });
        } else if total < 1.0 {
            let margin = 1.0 - total;
            issues.push(ValidationIssue {
                kind: IssueKind::Arbitrage,
                severity: Severity::Info,
                message: format!(
                    "line {} is an arbitrage: both sides sum to {:.2}%, a {:.2}% edge",
                    threshold,
                    total * 100.0,
                    margin * 100.0
                ),
                margin: Some(margin),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty() {
        let result = validate(&[]);
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_validate_consistent_lines() {
        let result = validate(&[
            Line::over(25.5, -110).unwrap(),
            Line::over(27.5, 150).unwrap(),
        ]);
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_sorted_decreasing_lines_are_not_contradictory() {
        let result = validate(&[
            Line::over(50.5, 200).unwrap(),
            Line::over(49.5, -300).unwrap(),
        ]);
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_monotonicity_violation() {
        // The higher threshold is priced as more likely than the lower one
        let result = validate(&[
            Line::over(50.5, -300).unwrap(),
            Line::over(49.5, 200).unwrap(),
        ]);
        assert!(!result.is_valid);

        let contradictions: Vec<_> = result
            .issues_of(IssueKind::ContradictoryProbabilities)
            .collect();
        assert_eq!(contradictions.len(), 1);
        assert_eq!(contradictions[0].severity, Severity::Error);

        let negatives: Vec<_> = result.issues_of(IssueKind::NegativeProbability).collect();
        assert_eq!(negatives.len(), 1);
        assert_eq!(negatives[0].severity, Severity::Error);
    }

    #[test]
    fn test_vig_detection() {
        let result = validate(&[
            Line::over(30.0, -120).unwrap(),
            Line::under(30.0, -120).unwrap(),
        ]);
        assert!(result.is_valid);
        assert_eq!(result.issues.len(), 1);

        let issue = &result.issues[0];
        assert_eq!(issue.kind, IssueKind::Vig);
        assert_eq!(issue.severity, Severity::Info);
        assert!((issue.margin.unwrap() - 0.0909).abs() < 1e-4);
    }

    #[test]
    fn test_arbitrage_detection() {
        let result = validate(&[
            Line::over(44.5, 110).unwrap(),
            Line::under(44.5, 105).unwrap(),
        ]);
        assert!(result.is_valid);
        let arbs: Vec<_> = result.issues_of(IssueKind::Arbitrage).collect();
        assert_eq!(arbs.len(), 1);
        let expected = 1.0 - (100.0 / 210.0 + 100.0 / 205.0);
        assert!((arbs[0].margin.unwrap() - expected).abs() < 1e-12);
        assert_eq!(arbs[0].severity, Severity::Info);
    }

    #[test]
    fn test_fair_pair_has_no_market_issue() {
        let result = validate(&[
            Line::over(44.5, 100).unwrap(),
            Line::under(44.5, -100).unwrap(),
        ]);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_proximity_warning() {
        let result = validate(&[
            Line::over(20.0, -110).unwrap(),
            Line::over(20.5, 110).unwrap(),
        ]);
        assert!(result.is_valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::ContradictoryProbabilities);
        assert_eq!(result.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_same_threshold_pair_is_not_a_contradiction() {
        // Over is priced higher than Under but they share a threshold
        let result = validate(&[
            Line::over(30.5, -200).unwrap(),
            Line::under(30.5, -150).unwrap(),
        ]);
        assert!(result.issues_of(IssueKind::ContradictoryProbabilities).next().is_none());
        assert!(result.issues_of(IssueKind::NegativeProbability).next().is_none());
        assert!(result.is_valid);
    }

    #[test]
    fn test_mixed_directions_stay_monotonic() {
        let result = validate(&[
            Line::over(48.5, 110).unwrap(),
            Line::under(49.5, -130).unwrap(),
        ]);
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_duplicate_line_warning() {
        let result = validate(&[
            Line::over(10.5, 150).unwrap(),
            Line::over(10.5, 140).unwrap(),
        ]);
        assert!(result.is_valid);
        let duplicates: Vec<_> = result.issues_of(IssueKind::DuplicateLine).collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].severity, Severity::Warning);
    }

    #[test]
    fn test_multiple_checks_fire_together() {
        let result = validate(&[
            Line::over(10.5, -400).unwrap(),
            Line::over(10.0, -200).unwrap(),
            Line::under(10.0, -200).unwrap(),
        ]);
        assert!(!result.is_valid);
        let kinds: Vec<IssueKind> = result.issues.iter().map(|i| i.kind).collect();
        assert!(kinds.contains(&IssueKind::Vig));
        assert!(kinds.contains(&IssueKind::NegativeProbability));
        assert!(kinds.contains(&IssueKind::ContradictoryProbabilities));
        assert!(result
            .issues_of(IssueKind::ContradictoryProbabilities)
            .any(|i| i.severity == Severity::Warning));
    }
}
