use crate::models::{Evidence, SampleSize};

/// Build the evidence record for one statistic.
///
/// `sample_size.matches` is the number of supporting records, and their IDs
/// keep input order. Callers that only want a preview truncate afterwards.
pub fn build_evidence<S: AsRef<str>>(
    metric: impl Into<String>,
    numerator: u32,
    denominator: u32,
    supporting: &[S],
) -> Evidence {
    Evidence {
        metric: metric.into(),
        sample_size: SampleSize {
            matches: supporting.len(),
            rounds: None,
        },
        numerator,
        denominator,
        match_ids: supporting.iter().map(|id| id.as_ref().to_string()).collect(),
        external_links: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_evidence_preserves_order() {
        let evidence = build_evidence("Map Win Rate", 2, 3, &["m3", "m1", "m2"]);
        assert_eq!(evidence.sample_size.matches, 3);
        assert_eq!(evidence.match_ids, vec!["m3", "m1", "m2"]);
        assert_eq!(evidence.numerator, 2);
        assert_eq!(evidence.denominator, 3);
    }

    #[test]
    fn test_build_evidence_empty() {
        let evidence = build_evidence::<&str>("Nothing", 0, 0, &[]);
        assert_eq!(evidence.sample_size.matches, 0);
        assert!(evidence.match_ids.is_empty());
        assert_eq!(evidence.rate(), 0.0);
    }

    #[test]
    fn test_truncation_keeps_sample_size() {
        let ids: Vec<String> = (0..8).map(|i| format!("s{}", i)).collect();
        let evidence = build_evidence("Series Win Rate", 5, 8, &ids).truncate_ids(5);
        assert_eq!(evidence.sample_size.matches, 8);
        assert_eq!(evidence.match_ids.len(), 5);
    }
}
