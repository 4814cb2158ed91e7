//! Human-readable reasons for a compatibility score.
//!
//! Reasons are picked from a fixed phrase table so identical dimension
//! results always render identical text.

use crate::models::{Dimension, DimensionResult, Label, Verdict};
use std::cmp::Reverse;

/// Maximum number of reasons attached to a score
pub const MAX_REASONS: usize = 3;

/// Sub-scores at or above this read as a positive reason
const POSITIVE_FROM: u8 = 70;

pub const NOT_ENOUGH_INFORMATION: &str = "Not enough information to compare";
pub const UNREADABLE_LISTING: &str = "Some shelter details for this pet could not be read";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Positive,
    Shortfall,
    Disqualifying,
    Unknown,
}

fn phrase(dimension: Dimension, tone: Tone) -> &'static str {
    match (dimension, tone) {
        (Dimension::LivingSpace, Tone::Positive) => "Your home offers the space this pet needs",
        (Dimension::LivingSpace, Tone::Shortfall) => "Would be happier with more space than your home offers",
        (Dimension::LivingSpace, Tone::Disqualifying) => "Requires more space than your home offers",
        (Dimension::LivingSpace, Tone::Unknown) => "The shelter has not listed this pet's space needs",

        (Dimension::Energy, Tone::Positive) => "Energy level fits your lifestyle",
        (Dimension::Energy, Tone::Shortfall) => "Energy level differs from what you are looking for",
        (Dimension::Energy, Tone::Disqualifying) => "Energy level is far from what suits your lifestyle",
        (Dimension::Energy, Tone::Unknown) => "The shelter has not listed this pet's energy level",

        (Dimension::Experience, Tone::Positive) => "Your experience covers what this pet needs",
        (Dimension::Experience, Tone::Shortfall) => "Needs a bit more handling experience than you have",
        (Dimension::Experience, Tone::Disqualifying) => "Needs an experienced owner",
        (Dimension::Experience, Tone::Unknown) => "The shelter has not listed the experience this pet needs",

        (Dimension::Kids, Tone::Positive) => "Comfortable with the children in your home",
        (Dimension::Kids, Tone::Shortfall) => "May need extra care around children",
        (Dimension::Kids, Tone::Disqualifying) => "Not suited to a home with your children",
        (Dimension::Kids, Tone::Unknown) => "The shelter has not said how this pet does with children",

        (Dimension::SpecialCare, Tone::Positive) => "Care needs are within what you can provide",
        (Dimension::SpecialCare, Tone::Shortfall) => "Care needs may stretch what you can provide",
        (Dimension::SpecialCare, Tone::Disqualifying) => "Needs more special care than you can provide",
        (Dimension::SpecialCare, Tone::Unknown) => "The shelter has not listed this pet's care needs",

        (Dimension::Species, Tone::Positive) => "Is the kind of animal you are looking for",
        (Dimension::Species, Tone::Shortfall | Tone::Disqualifying) => "Is not the kind of animal you are looking for",
        (Dimension::Species, Tone::Unknown) => "The shelter has not listed this pet's species",

        (Dimension::Size, Tone::Positive) => "Is the size you prefer",
        (Dimension::Size, Tone::Shortfall | Tone::Disqualifying) => "Is not the size you prefer",
        (Dimension::Size, Tone::Unknown) => "The shelter has not listed this pet's size",
    }
}

fn tone_of(result: &DimensionResult) -> Tone {
    match result.verdict {
        Verdict::Unknown => Tone::Unknown,
        _ if result.sub_score >= POSITIVE_FROM => Tone::Positive,
        Verdict::Mismatch => Tone::Disqualifying,
        _ => Tone::Shortfall,
    }
}

/// How far a dimension pulled the score away from a perfect match
#[inline]
fn impact(result: &DimensionResult) -> u8 {
    100u8.saturating_sub(result.sub_score)
}

/// Render up to three reasons, highest impact first
///
/// Hard mismatches that disqualified the pet always lead, in canonical
/// dimension order. Remaining slots go to informative dimensions ordered by
/// distance from 100; unknown dimensions are used only when nothing else
/// was informative.
pub fn explain(results: &[DimensionResult], label: Label) -> Vec<String> {
    let mut picked: Vec<&DimensionResult> = Vec::with_capacity(MAX_REASONS);

    if label == Label::NotSuitable {
        let mut disqualifying: Vec<&DimensionResult> =
            results.iter().filter(|r| r.is_hard_mismatch()).collect();
        disqualifying.sort_by_key(|r| r.dimension);
        picked.extend(disqualifying.into_iter().take(MAX_REASONS));
    }

    let mut informative: Vec<&DimensionResult> = results
        .iter()
        .filter(|r| r.is_informative())
        .filter(|r| !picked.iter().any(|p| p.dimension == r.dimension))
        .collect();

    if informative.is_empty() && picked.is_empty() {
        informative = results.iter().collect();
    }

    informative.sort_by_key(|r| (Reverse(impact(r)), r.dimension));

    let room = MAX_REASONS.saturating_sub(picked.len());
    picked.extend(informative.into_iter().take(room));

    if picked.is_empty() {
        return vec![NOT_ENOUGH_INFORMATION.to_string()];
    }

    picked
        .into_iter()
        .map(|r| {
            let tone = if r.is_hard_mismatch() {
                Tone::Disqualifying
            } else {
                tone_of(r)
            };
            phrase(r.dimension, tone).to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(dimension: Dimension, sub_score: u8, verdict: Verdict, hard: bool) -> DimensionResult {
        DimensionResult {
            dimension,
            sub_score,
            verdict,
            weight: 0.2,
            hard,
        }
    }

    #[test]
    fn test_hard_mismatch_leads() {
        let results = vec![
            dim(Dimension::LivingSpace, 0, Verdict::Mismatch, true),
            dim(Dimension::Energy, 20, Verdict::Mismatch, false),
            dim(Dimension::Experience, 0, Verdict::Mismatch, false),
            dim(Dimension::Kids, 0, Verdict::Mismatch, true),
            dim(Dimension::SpecialCare, 100, Verdict::Match, true),
        ];

        let reasons = explain(&results, Label::NotSuitable);
        assert_eq!(
            reasons,
            vec![
                "Requires more space than your home offers",
                "Not suited to a home with your children",
                "Needs an experienced owner",
            ]
        );
    }

    #[test]
    fn test_highest_impact_first() {
        let results = vec![
            dim(Dimension::LivingSpace, 100, Verdict::Match, true),
            dim(Dimension::Energy, 20, Verdict::Mismatch, false),
            dim(Dimension::Experience, 60, Verdict::Partial, false),
            dim(Dimension::Kids, 100, Verdict::Match, true),
        ];

        let reasons = explain(&results, Label::Conditional);
        assert_eq!(
            reasons,
            vec![
                "Energy level is far from what suits your lifestyle",
                "Needs a bit more handling experience than you have",
                "Your home offers the space this pet needs",
            ]
        );
    }

    #[test]
    fn test_positive_reasons_use_canonical_order_on_ties() {
        let results: Vec<DimensionResult> = [
            Dimension::SpecialCare,
            Dimension::Kids,
            Dimension::Experience,
            Dimension::Energy,
            Dimension::LivingSpace,
        ]
        .into_iter()
        .map(|d| dim(d, 100, Verdict::Match, false))
        .collect();

        let reasons = explain(&results, Label::Suitable);
        assert_eq!(
            reasons,
            vec![
                "Your home offers the space this pet needs",
                "Energy level fits your lifestyle",
                "Your experience covers what this pet needs",
            ]
        );
    }

    #[test]
    fn test_unknown_dimensions_excluded_when_others_inform() {
        let results = vec![
            dim(Dimension::LivingSpace, 100, Verdict::Match, true),
            dim(Dimension::Kids, 60, Verdict::Unknown, true),
            dim(Dimension::SpecialCare, 60, Verdict::Unknown, true),
        ];

        let reasons = explain(&results, Label::Suitable);
        assert_eq!(reasons, vec!["Your home offers the space this pet needs"]);
    }

    #[test]
    fn test_unknown_dimensions_used_as_last_resort() {
        let results = vec![
            dim(Dimension::Kids, 60, Verdict::Unknown, true),
            dim(Dimension::Energy, 60, Verdict::Unknown, false),
        ];

        let reasons = explain(&results, Label::Conditional);
        assert_eq!(
            reasons,
            vec![
                "The shelter has not listed this pet's energy level",
                "The shelter has not said how this pet does with children",
            ]
        );
    }

    #[test]
    fn test_fallback_when_nothing_scoreable() {
        assert_eq!(explain(&[], Label::Conditional), vec![NOT_ENOUGH_INFORMATION]);
    }

    #[test]
    fn test_explanations_are_deterministic() {
        let results = vec![
            dim(Dimension::Energy, 60, Verdict::Partial, false),
            dim(Dimension::Experience, 60, Verdict::Partial, false),
            dim(Dimension::LivingSpace, 60, Verdict::Partial, true),
            dim(Dimension::Size, 100, Verdict::Match, true),
        ];

        let first = explain(&results, Label::Conditional);
        for _ in 0..10 {
            assert_eq!(explain(&results, Label::Conditional), first);
        }
        assert_eq!(first[0], "Would be happier with more space than your home offers");
    }
}
