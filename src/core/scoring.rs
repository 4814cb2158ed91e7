use crate::models::{DimensionResult, Label, LabelThresholds};

/// Score used when every dimension was skipped
const NEUTRAL_SCORE: u8 = 100;

/// Combine dimension results into an overall score (0-100) and label
///
/// Aggregation rules:
/// 1. Any hard dimension with a mismatch verdict disqualifies the pet:
///    score 0, NOT_SUITABLE, nothing else is consulted.
/// 2. Otherwise score = round(Σ(sub_score × weight) / Σ(weight)).
/// 3. The label follows the configured thresholds.
///
/// With nothing to compare the pet is neither praised nor penalised:
/// score 100, CONDITIONAL.
pub fn aggregate(results: &[DimensionResult], thresholds: &LabelThresholds) -> (u8, Label) {
    if results.iter().any(DimensionResult::is_hard_mismatch) {
        return (0, Label::NotSuitable);
    }

    if results.is_empty() {
        return (NEUTRAL_SCORE, Label::Conditional);
    }

    let total_weight: f64 = results.iter().map(|r| r.weight).sum();
    if total_weight <= 0.0 {
        return (NEUTRAL_SCORE, Label::Conditional);
    }

    let weighted: f64 = results
        .iter()
        .map(|r| f64::from(r.sub_score) * r.weight)
        .sum();

    let overall_score = (weighted / total_weight).round().clamp(0.0, 100.0) as u8;

    (overall_score, thresholds.label_for(overall_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dimension, Verdict};

    fn dim(dimension: Dimension, sub_score: u8, verdict: Verdict, weight: f64, hard: bool) -> DimensionResult {
        DimensionResult {
            dimension,
            sub_score,
            verdict,
            weight,
            hard,
        }
    }

    #[test]
    fn test_weighted_average() {
        let results = vec![
            dim(Dimension::LivingSpace, 100, Verdict::Match, 0.30, true),
            dim(Dimension::Energy, 60, Verdict::Partial, 0.20, false),
            dim(Dimension::Experience, 100, Verdict::Match, 0.20, false),
            dim(Dimension::Kids, 100, Verdict::Match, 0.15, true),
            dim(Dimension::SpecialCare, 60, Verdict::Partial, 0.15, true),
        ];

        // (30 + 12 + 20 + 15 + 9) / 1.0 = 86
        let (score, label) = aggregate(&results, &LabelThresholds::default());
        assert_eq!(score, 86);
        assert_eq!(label, Label::Suitable);
    }

    #[test]
    fn test_hard_mismatch_overrides_strong_scores() {
        let results = vec![
            dim(Dimension::LivingSpace, 100, Verdict::Match, 0.30, true),
            dim(Dimension::Energy, 100, Verdict::Match, 0.20, false),
            dim(Dimension::Experience, 100, Verdict::Match, 0.20, false),
            dim(Dimension::Kids, 0, Verdict::Mismatch, 0.15, true),
        ];

        assert_eq!(
            aggregate(&results, &LabelThresholds::default()),
            (0, Label::NotSuitable)
        );
    }

    #[test]
    fn test_soft_mismatch_is_averaged() {
        let results = vec![
            dim(Dimension::LivingSpace, 100, Verdict::Match, 0.30, true),
            dim(Dimension::Experience, 0, Verdict::Mismatch, 0.20, false),
        ];

        // 30 / 0.5 = 60
        let (score, label) = aggregate(&results, &LabelThresholds::default());
        assert_eq!(score, 60);
        assert_eq!(label, Label::Conditional);
    }

    #[test]
    fn test_weights_are_ratios() {
        let small = vec![
            dim(Dimension::LivingSpace, 100, Verdict::Match, 3.0, true),
            dim(Dimension::Energy, 20, Verdict::Mismatch, 1.0, false),
        ];
        let scaled = vec![
            dim(Dimension::LivingSpace, 100, Verdict::Match, 0.3, true),
            dim(Dimension::Energy, 20, Verdict::Mismatch, 0.1, false),
        ];

        let thresholds = LabelThresholds::default();
        assert_eq!(aggregate(&small, &thresholds), aggregate(&scaled, &thresholds));
        assert_eq!(aggregate(&small, &thresholds).0, 80);
    }

    #[test]
    fn test_all_skipped_is_neutral() {
        assert_eq!(
            aggregate(&[], &LabelThresholds::default()),
            (100, Label::Conditional)
        );
    }

    #[test]
    fn test_low_average_is_not_suitable() {
        let results = vec![dim(Dimension::Energy, 20, Verdict::Mismatch, 0.20, false)];

        assert_eq!(
            aggregate(&results, &LabelThresholds::default()),
            (20, Label::NotSuitable)
        );
    }
}
