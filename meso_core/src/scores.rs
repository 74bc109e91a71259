//! Stimulus/fatigue score aggregation.
//!
//! Reduces the athlete's three-component stimulus and fatigue feedback into
//! 0-9 totals and the stimulus-to-fatigue ratio (SFR) used to prioritize
//! which exercise earns additional volume.

use crate::types::{FatigueScore, StimulusScore};

/// Highest legal value for a single stimulus or fatigue sub-score
pub const MAX_SUB_SCORE: u8 = 3;

/// Sum three 0-3 sub-scores. An absent or out-of-range sub-score makes the
/// whole total unavailable, same as out-of-range recovery feedback.
fn sum_sub_scores(parts: [Option<u8>; 3]) -> Option<u8> {
    let mut total = 0;
    for part in parts {
        let value = part?;
        if value > MAX_SUB_SCORE {
            tracing::debug!("Ignoring out-of-range sub-score: {}", value);
            return None;
        }
        total += value;
    }
    Some(total)
}

impl StimulusScore {
    /// Sum of the three sub-scores, or `None` if any is absent or out of range
    pub fn total(&self) -> Option<u8> {
        sum_sub_scores([self.mind_muscle, self.pump, self.workload])
    }
}

impl FatigueScore {
    /// Sum of the three sub-scores, or `None` if any is absent or out of range
    pub fn total(&self) -> Option<u8> {
        sum_sub_scores([self.joint_pain, self.perceived_effort, self.tissue_disruption])
    }
}

/// Stimulus-to-fatigue ratio for one exercise's weekly feedback
///
/// Returns `None` when either total is unavailable or the fatigue total is
/// zero; an exercise without a ratio ranks below every exercise with one.
pub fn stimulus_to_fatigue_ratio(
    stimulus: Option<&StimulusScore>,
    fatigue: Option<&FatigueScore>,
) -> Option<f64> {
    let stimulus_total = stimulus?.total()?;
    let fatigue_total = fatigue?.total()?;

    if fatigue_total == 0 {
        return None;
    }

    Some(f64::from(stimulus_total) / f64::from(fatigue_total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stimulus(a: u8, b: u8, c: u8) -> StimulusScore {
        StimulusScore {
            mind_muscle: Some(a),
            pump: Some(b),
            workload: Some(c),
        }
    }

    fn fatigue(a: u8, b: u8, c: u8) -> FatigueScore {
        FatigueScore {
            joint_pain: Some(a),
            perceived_effort: Some(b),
            tissue_disruption: Some(c),
        }
    }

    #[test]
    fn test_totals() {
        assert_eq!(stimulus(3, 2, 1).total(), Some(6));
        assert_eq!(fatigue(0, 0, 0).total(), Some(0));
        assert_eq!(stimulus(3, 3, 3).total(), Some(9));
    }

    #[test]
    fn test_total_none_when_sub_score_missing() {
        let partial = StimulusScore {
            mind_muscle: Some(2),
            pump: None,
            workload: Some(1),
        };
        assert_eq!(partial.total(), None);
    }

    #[test]
    fn test_out_of_range_sub_score_yields_no_total() {
        // 0-3 is the legal range; anything above is treated like missing
        // feedback, not summed (a large value would overflow a u8 sum).
        assert_eq!(stimulus(4, 1, 1).total(), None);
        assert_eq!(stimulus(255, 255, 255).total(), None);
        assert_eq!(fatigue(1, 1, 200).total(), None);
        assert_eq!(
            stimulus_to_fatigue_ratio(Some(&stimulus(9, 0, 0)), Some(&fatigue(1, 1, 1))),
            None
        );
    }

    #[test]
    fn test_ratio() {
        let ratio = stimulus_to_fatigue_ratio(Some(&stimulus(3, 3, 0)), Some(&fatigue(1, 1, 1)));
        assert_eq!(ratio, Some(2.0));
    }

    #[test]
    fn test_ratio_none_on_zero_fatigue() {
        let ratio = stimulus_to_fatigue_ratio(Some(&stimulus(2, 2, 2)), Some(&fatigue(0, 0, 0)));
        assert_eq!(ratio, None);
    }

    #[test]
    fn test_ratio_none_on_missing_scores() {
        assert_eq!(stimulus_to_fatigue_ratio(None, Some(&fatigue(1, 1, 1))), None);
        assert_eq!(stimulus_to_fatigue_ratio(Some(&stimulus(1, 1, 1)), None), None);

        let partial = FatigueScore {
            joint_pain: Some(1),
            perceived_effort: None,
            tissue_disruption: Some(1),
        };
        assert_eq!(
            stimulus_to_fatigue_ratio(Some(&stimulus(1, 1, 1)), Some(&partial)),
            None
        );
    }
}
