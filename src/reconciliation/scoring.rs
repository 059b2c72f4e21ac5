use serde::{Deserialize, Serialize};

use crate::db::models::{
    scan_result::{CONFORMING_RATIO_TENTHS, PARTIAL_RATIO_TENTHS},
    Instrument, InstrumentStatus, Verdict,
};

/// Per-status counts of a reconciled instrument list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentTally {
    pub present: usize,
    pub missing: usize,
    pub extra: usize,
}

/// Display band for a conformity score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConformityLevel {
    High,
    Medium,
    Low,
}

const HIGH_SCORE_THRESHOLD: u8 = 95;
const MEDIUM_SCORE_THRESHOLD: u8 = 80;

impl ConformityLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_SCORE_THRESHOLD {
            ConformityLevel::High
        } else if score >= MEDIUM_SCORE_THRESHOLD {
            ConformityLevel::Medium
        } else {
            ConformityLevel::Low
        }
    }
}

pub fn tally(instruments: &[Instrument]) -> InstrumentTally {
    instruments
        .iter()
        .fold(InstrumentTally::default(), |mut acc, instrument| {
            match instrument.status {
                Some(InstrumentStatus::Present) => acc.present += 1,
                Some(InstrumentStatus::Missing) => acc.missing += 1,
                Some(InstrumentStatus::Extra) => acc.extra += 1,
                None => {}
            }
            acc
        })
}

fn present_count(instruments: &[Instrument]) -> usize {
    instruments
        .iter()
        .filter(|instrument| instrument.status == Some(InstrumentStatus::Present))
        .count()
}

/// Percentage of expected instruments confirmed present, rounded to an integer.
///
/// An empty reference has nothing to violate and scores 100.
pub fn score(instruments: &[Instrument], reference_count: usize) -> u8 {
    if reference_count == 0 {
        return 100;
    }

    let present = present_count(instruments).min(reference_count);
    let percentage = (100.0 * present as f64 / reference_count as f64).round();
    percentage as u8
}

/// Present instruments over `max(reference_count, 1)`.
pub fn present_ratio(instruments: &[Instrument], reference_count: usize) -> f64 {
    present_count(instruments) as f64 / reference_count.max(1) as f64
}

/// Tri-state verdict from the present ratio.
///
/// Compared in integers so the boundaries are exact; the rounded score is
/// never consulted.
pub fn verdict(instruments: &[Instrument], reference_count: usize) -> Verdict {
    let present = present_count(instruments);
    let total = reference_count.max(1);

    if present * 10 >= total * CONFORMING_RATIO_TENTHS {
        Verdict::Conforming
    } else if present * 10 >= total * PARTIAL_RATIO_TENTHS {
        Verdict::Partial
    } else {
        Verdict::NonConforming
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(
        prefix: &'static str,
        count: usize,
        status: InstrumentStatus,
    ) -> impl Iterator<Item = Instrument> {
        (0..count).map(move |n| {
            Instrument::detected(format!("{prefix}-{n}"), "", "clamp", 0.9, None).with_status(status)
        })
    }

    fn annotated(present: usize, missing: usize, extra: usize) -> Vec<Instrument> {
        entries("P", present, InstrumentStatus::Present)
            .chain(entries("M", missing, InstrumentStatus::Missing))
            .chain(entries("E", extra, InstrumentStatus::Extra))
            .collect()
    }

    #[test]
    fn full_kit_scores_one_hundred_and_conforms() {
        let instruments = annotated(5, 0, 0);
        assert_eq!(score(&instruments, 5), 100);
        assert_eq!(verdict(&instruments, 5), Verdict::Conforming);
    }

    #[test]
    fn one_missing_of_five_is_partial() {
        let instruments = annotated(4, 1, 0);
        assert_eq!(score(&instruments, 5), 80);
        assert_eq!(verdict(&instruments, 5), Verdict::Partial);
        assert_eq!(present_ratio(&instruments, 5), 0.8);
    }

    #[test]
    fn extras_do_not_affect_the_score() {
        let instruments = annotated(5, 0, 1);
        assert_eq!(score(&instruments, 5), 100);
        assert_eq!(verdict(&instruments, 5), Verdict::Conforming);
        assert_eq!(tally(&instruments), InstrumentTally { present: 5, missing: 0, extra: 1 });
    }

    #[test]
    fn empty_reference_scores_one_hundred() {
        let instruments = annotated(0, 0, 3);
        assert_eq!(score(&instruments, 0), 100);
        assert_eq!(score(&[], 0), 100);
    }

    #[test]
    fn verdict_boundaries_are_exact() {
        assert_eq!(verdict(&annotated(9, 1, 0), 10), Verdict::Conforming);
        assert_eq!(verdict(&annotated(89, 11, 0), 100), Verdict::Partial);
        assert_eq!(verdict(&annotated(7, 3, 0), 10), Verdict::Partial);
        assert_eq!(verdict(&annotated(69, 31, 0), 100), Verdict::NonConforming);

        // 2/3 rounds to a score of 67 but 0.666.. is below the partial line.
        assert_eq!(score(&annotated(2, 1, 0), 3), 67);
        assert_eq!(verdict(&annotated(2, 1, 0), 3), Verdict::NonConforming);
    }

    #[test]
    fn ratio_boundaries_are_exact() {
        assert_eq!(Verdict::from_ratio(0.9), Verdict::Conforming);
        assert_eq!(Verdict::from_ratio(0.8999999), Verdict::Partial);
        assert_eq!(Verdict::from_ratio(0.7), Verdict::Partial);
        assert_eq!(Verdict::from_ratio(0.6999999), Verdict::NonConforming);
    }

    #[test]
    fn integer_and_ratio_verdicts_agree() {
        for reference_count in 1..=40 {
            for present in 0..=reference_count {
                let instruments = annotated(present, reference_count - present, 0);
                assert_eq!(
                    verdict(&instruments, reference_count),
                    Verdict::from_ratio(present_ratio(&instruments, reference_count)),
                    "present {present} of {reference_count}"
                );
            }
        }
    }

    #[test]
    fn score_is_bounded_and_monotonic() {
        for reference_count in 1..=25 {
            let mut previous = 0;
            for present in 0..=reference_count {
                let current = score(&annotated(present, reference_count - present, 0), reference_count);
                assert!(current <= 100);
                assert!(current >= previous);
                previous = current;
            }
            assert_eq!(previous, 100);
        }
    }

    #[test]
    fn conformity_levels_follow_score_bands() {
        assert_eq!(ConformityLevel::from_score(100), ConformityLevel::High);
        assert_eq!(ConformityLevel::from_score(95), ConformityLevel::High);
        assert_eq!(ConformityLevel::from_score(94), ConformityLevel::Medium);
        assert_eq!(ConformityLevel::from_score(80), ConformityLevel::Medium);
        assert_eq!(ConformityLevel::from_score(79), ConformityLevel::Low);
    }
}
