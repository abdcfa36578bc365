//! Insights, counters, and the evidence behind them.

use serde::{Deserialize, Serialize};

use super::Confidence;

/// How many records a statistic was computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSize {
    pub matches: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<usize>,
}

/// Links to third-party pages about the evidence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquipedia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<String>,
}

/// Statistical basis for one insight or counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Human-readable definition of what was measured
    pub metric: String,
    pub sample_size: SampleSize,
    pub numerator: u32,
    pub denominator: u32,
    /// Supporting record IDs, in input order
    pub match_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_links: Option<ExternalLinks>,
}

impl Evidence {
    /// `numerator / denominator`, or 0.0 when the denominator is zero.
    pub fn rate(&self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            self.numerator as f64 / self.denominator as f64
        }
    }

    /// Override the sample size when it differs from the supporting IDs.
    pub fn with_matches(mut self, matches: usize) -> Self {
        self.sample_size.matches = matches;
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.sample_size.rounds = Some(rounds);
        self
    }

    pub fn with_external_links(mut self, links: ExternalLinks) -> Self {
        self.external_links = Some(links);
        self
    }

    /// Keep only the first `n` supporting IDs.
    pub fn truncate_ids(mut self, n: usize) -> Self {
        self.match_ids.truncate(n);
        self
    }
}

/// Classification verdict for a derived statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Strength,
    Critical,
    Pattern,
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightCategory::Strength => write!(f, "strength"),
            InsightCategory::Critical => write!(f, "critical"),
            InsightCategory::Pattern => write!(f, "pattern"),
        }
    }
}

/// Which report section an insight belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightScope {
    Team,
    Player,
    Comp,
    Exploit,
}

/// How far a statistic sits from the neutral band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One derived, confidence-scored claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Stable within one report
    pub id: String,
    pub scope: InsightScope,
    pub category: InsightCategory,
    pub severity: Severity,
    pub title: String,
    pub claim: String,
    /// Display value ("73%", "1.24 K/D", "5 maps")
    pub value: String,
    pub confidence: Confidence,
    pub evidence: Evidence,
}

impl Insight {
    pub fn is_critical(&self) -> bool {
        self.category == InsightCategory::Critical
    }
}

/// One recommended counter-strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: String,
    pub title: String,
    /// When to apply
    pub condition: String,
    /// What to execute
    pub action: String,
    pub expected_outcome: String,
    pub confidence: Confidence,
    pub evidence: Evidence,
    /// Set on floor-filling counters that are not backed by a statistic
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(numerator: u32, denominator: u32) -> Evidence {
        Evidence {
            metric: "Test".to_string(),
            sample_size: SampleSize::default(),
            numerator,
            denominator,
            match_ids: vec!["a".into(), "b".into(), "c".into()],
            external_links: None,
        }
    }

    #[test]
    fn test_evidence_rate_zero_denominator() {
        assert_eq!(evidence(4, 0).rate(), 0.0);
        assert_eq!(evidence(3, 4).rate(), 0.75);
    }

    #[test]
    fn test_evidence_truncate_ids() {
        let e = evidence(1, 1).truncate_ids(2);
        assert_eq!(e.match_ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_evidence_serialization_camel_case() {
        let e = evidence(1, 2).with_rounds(24);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["sampleSize"]["rounds"], 24);
        assert_eq!(json["matchIds"][0], "a");
        assert!(json.get("externalLinks").is_none());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&InsightCategory::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        assert_eq!(format!("{}", InsightCategory::Strength), "strength");
    }
}
