use crate::models::{InsightCategory, Severity};

use super::percentage;

/// A computed statistic, before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Hits over attempts, rendered as a whole percentage
    Rate { numerator: u32, denominator: u32 },
    /// Kill/death ratio over `samples` games, rendered with two decimals
    Ratio { value: f64, samples: usize },
}

impl MetricValue {
    pub fn rate(numerator: u32, denominator: u32) -> Self {
        MetricValue::Rate {
            numerator,
            denominator,
        }
    }

    pub fn ratio(value: f64, samples: usize) -> Self {
        MetricValue::Ratio { value, samples }
    }

    /// The value on the scale thresholds are expressed in.
    fn score(&self) -> f64 {
        match self {
            MetricValue::Rate {
                numerator,
                denominator,
            } => percentage(*numerator, *denominator) as f64,
            MetricValue::Ratio { value, .. } if value.is_finite() => *value,
            MetricValue::Ratio { .. } => 0.0,
        }
    }

    /// Whether nothing was sampled.
    pub fn is_empty(&self) -> bool {
        match self {
            MetricValue::Rate { denominator, .. } => *denominator == 0,
            MetricValue::Ratio { samples, .. } => *samples == 0,
        }
    }

    /// Human-readable form: "67%" or "1.24".
    pub fn display(&self) -> String {
        match self {
            MetricValue::Rate { .. } => format!("{}%", self.score() as u32),
            MetricValue::Ratio { .. } => format!("{:.2}", self.score()),
        }
    }
}

/// Category cut-offs and severity steps for one metric scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// At or above: strength
    pub strength: f64,
    /// At or below: critical
    pub critical: f64,
    /// Distance past a cut-off for medium severity
    pub medium_step: f64,
    /// Distance past a cut-off for high severity
    pub high_step: f64,
}

impl Thresholds {
    /// Percentage rates: 60% strength, 40% critical.
    pub const RATE: Thresholds = Thresholds {
        strength: 60.0,
        critical: 40.0,
        medium_step: 10.0,
        high_step: 20.0,
    };

    /// K/D ratios: 1.2 strength, 0.8 critical.
    pub const KD: Thresholds = Thresholds {
        strength: 1.2,
        critical: 0.8,
        medium_step: 0.15,
        high_step: 0.3,
    };

    fn severity(&self, distance: f64) -> Severity {
        if distance >= self.high_step {
            Severity::High
        } else if distance >= self.medium_step {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// Classifier verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: InsightCategory,
    pub severity: Severity,
    pub claim: String,
}

/// Note appended to claims computed over nothing.
pub const INSUFFICIENT_DATA: &str = "(insufficient data)";

/// Classify a statistic and render its claim.
///
/// `template` may use `{subject}` and `{value}` placeholders. Zero-sample
/// input is always a low-severity pattern with an insufficiency note.
pub fn classify(
    value: MetricValue,
    thresholds: &Thresholds,
    subject: &str,
    template: &str,
) -> Classification {
    let claim = template
        .replace("{subject}", subject)
        .replace("{value}", &value.display());

    if value.is_empty() {
        return Classification {
            category: InsightCategory::Pattern,
            severity: Severity::Low,
            claim: format!("{} {}", claim, INSUFFICIENT_DATA),
        };
    }

    let score = value.score();
    let (category, severity) = if score >= thresholds.strength {
        (
            InsightCategory::Strength,
            thresholds.severity(score - thresholds.strength),
        )
    } else if score <= thresholds.critical {
        (
            InsightCategory::Critical,
            thresholds.severity(thresholds.critical - score),
        )
    } else {
        (InsightCategory::Pattern, Severity::Low)
    };

    Classification {
        category,
        severity,
        claim,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(n: u32, d: u32) -> Classification {
        classify(
            MetricValue::rate(n, d),
            &Thresholds::RATE,
            "Sentinels",
            "{subject} wins {value} of rounds",
        )
    }

    #[test]
    fn test_rate_categories() {
        assert_eq!(rate(6, 10).category, InsightCategory::Strength);
        assert_eq!(rate(4, 10).category, InsightCategory::Critical);
        assert_eq!(rate(5, 10).category, InsightCategory::Pattern);
    }

    #[test]
    fn test_rate_severity_grows_with_distance() {
        assert_eq!(rate(6, 10).severity, Severity::Low);
        assert_eq!(rate(7, 10).severity, Severity::Medium);
        assert_eq!(rate(9, 10).severity, Severity::High);
        assert_eq!(rate(3, 10).severity, Severity::Medium);
        assert_eq!(rate(1, 10).severity, Severity::High);
    }

    #[test]
    fn test_claim_embeds_subject_and_percent() {
        assert_eq!(rate(2, 3).claim, "Sentinels wins 67% of rounds");
    }

    #[test]
    fn test_zero_sample_is_pattern() {
        let c = rate(0, 0);
        assert_eq!(c.category, InsightCategory::Pattern);
        assert_eq!(c.severity, Severity::Low);
        assert_eq!(c.claim, "Sentinels wins 0% of rounds (insufficient data)");
    }

    #[test]
    fn test_kd_classification() {
        let star = classify(
            MetricValue::ratio(1.5, 4),
            &Thresholds::KD,
            "Ace",
            "{subject} holds a {value} K/D",
        );
        assert_eq!(star.category, InsightCategory::Strength);
        assert_eq!(star.severity, Severity::High);
        assert_eq!(star.claim, "Ace holds a 1.50 K/D");

        let weak = classify(MetricValue::ratio(0.75, 4), &Thresholds::KD, "Ace", "{value}");
        assert_eq!(weak.category, InsightCategory::Critical);
        assert_eq!(weak.severity, Severity::Low);

        let neutral = classify(MetricValue::ratio(1.0, 4), &Thresholds::KD, "Ace", "{value}");
        assert_eq!(neutral.category, InsightCategory::Pattern);
    }

    #[test]
    fn test_kd_boundary_is_strength() {
        let c = classify(MetricValue::ratio(6.0 / 5.0, 2), &Thresholds::KD, "Ace", "{value}");
        assert_eq!(c.category, InsightCategory::Strength);
    }

    #[test]
    fn test_non_finite_ratio_treated_as_zero() {
        let c = classify(MetricValue::ratio(f64::NAN, 3), &Thresholds::KD, "Ace", "{value}");
        assert_eq!(c.claim, "0.00");
        assert_eq!(c.category, InsightCategory::Critical);
    }
}
