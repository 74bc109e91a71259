//! Weekly volume planning for one muscle group.
//!
//! Given the group's exercise slots for a week (with each slot's baseline
//! from the most recent non-recovery week), this module computes the new
//! per-exercise set counts:
//! - Recovery advice per exercise (halve and flag on a recovery trigger)
//! - SFR-ranked application of recommended set deltas
//! - Redistribution of cap-blocked increments to exercises with headroom

use crate::recovery::{self, VolumeAdvice};
use crate::scores;
use crate::types::{FatigueScore, StimulusScore};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Hard ceiling on weekly sets for a single exercise
pub const MAX_SETS_PER_EXERCISE: u32 = 8;

/// Hard ceiling on a muscle group's sets within a single session
pub const MAX_SETS_PER_SESSION_MUSCLE_GROUP: u32 = 10;

/// Baseline volume data for one exercise, taken from the most recent week
/// in which the exercise was not recovery-flagged
#[derive(Clone, Debug, Default)]
pub struct Baseline {
    pub set_count: u32,
    pub soreness: Option<u8>,
    pub performance: Option<u8>,
    pub stimulus: Option<StimulusScore>,
    pub fatigue: Option<FatigueScore>,
}

/// One exercise's slot in a muscle-group volume pass
#[derive(Clone, Debug)]
pub struct VolumeSlot {
    pub exercise_def_id: Uuid,
    /// Index of the session (within the week) this exercise lands in.
    pub session_index: usize,
    /// `None` when no usable history exists (week 0, or all weeks flagged).
    pub baseline: Option<Baseline>,
}

/// Result of a muscle-group volume pass
#[derive(Clone, Debug, Default)]
pub struct VolumePlan {
    /// Final set count per exercise, in the original slot order.
    pub set_counts: Vec<(Uuid, u32)>,
    /// Exercises halved and flagged recovery for this week.
    pub recovery_flagged: HashSet<Uuid>,
}

impl VolumePlan {
    /// Final set count for one exercise, if it was part of the pass
    pub fn count_for(&self, exercise_def_id: &Uuid) -> Option<u32> {
        self.set_counts
            .iter()
            .find(|(id, _)| id == exercise_def_id)
            .map(|(_, count)| *count)
    }
}

/// A non-recovery exercise participating in delta distribution
struct Candidate {
    slot: usize,
    delta: u32,
    ratio: Option<f64>,
}

/// Compute new set counts for one muscle group in one week
///
/// Exercises without a baseline are seeded at `seed_sets`. When the group has
/// history but no exercise produced any recovery feedback, the default
/// progression applies instead: one extra set for the group, offered in
/// ranked order to the first exercise with headroom.
pub fn plan_group_volume(slots: &[VolumeSlot], seed_sets: u32) -> VolumePlan {
    let mut counts = vec![0u32; slots.len()];
    let mut desired = vec![0u32; slots.len()];
    let mut flagged = HashSet::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut any_feedback = false;
    let has_history = slots.iter().any(|s| s.baseline.is_some());

    for (i, slot) in slots.iter().enumerate() {
        let Some(baseline) = &slot.baseline else {
            desired[i] = seed_sets;
            candidates.push(Candidate {
                slot: i,
                delta: 0,
                ratio: None,
            });
            continue;
        };

        let advice = recovery::advise(baseline.soreness, baseline.performance);
        if advice.is_some() {
            any_feedback = true;
        }

        match advice {
            Some(VolumeAdvice::Recover) => {
                desired[i] = (baseline.set_count / 2).max(1);
                flagged.insert(slot.exercise_def_id);
                tracing::debug!(
                    "Recovery triggered for {}: {} -> {} sets",
                    slot.exercise_def_id,
                    baseline.set_count,
                    desired[i]
                );
            }
            Some(VolumeAdvice::AddSets(delta)) => {
                desired[i] = baseline.set_count;
                candidates.push(Candidate {
                    slot: i,
                    delta,
                    ratio: scores::stimulus_to_fatigue_ratio(
                        baseline.stimulus.as_ref(),
                        baseline.fatigue.as_ref(),
                    ),
                });
            }
            None => {
                // Insufficient data: keep the baseline, delta zero.
                desired[i] = baseline.set_count;
                candidates.push(Candidate {
                    slot: i,
                    delta: 0,
                    ratio: scores::stimulus_to_fatigue_ratio(
                        baseline.stimulus.as_ref(),
                        baseline.fatigue.as_ref(),
                    ),
                });
            }
        }
    }

    // Initial counts pass through the same two-cap check as growth, earlier
    // slots first: an oversized baseline carried in from external history or
    // a session too crowded for every seed gets clamped here, never emitted.
    // Session totals track the whole group's presence in each session,
    // recovery-flagged exercises included.
    let mut session_totals: HashMap<usize, u32> = HashMap::new();
    for (i, slot) in slots.iter().enumerate() {
        while counts[i] < desired[i] {
            if !try_grow(i, slots, &mut counts, &mut session_totals) {
                tracing::warn!(
                    "Clamped {} from {} to {} sets to honor volume caps",
                    slot.exercise_def_id,
                    desired[i],
                    counts[i]
                );
                break;
            }
        }
    }

    // Rank by SFR descending; exercises without a ratio rank last.
    // Vec::sort_by is stable, so ties keep original relative order.
    candidates.sort_by(|a, b| match (a.ratio, b.ratio) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    if has_history && !any_feedback {
        // No athlete feedback anywhere in the group: default progression of
        // one extra set for the group, highest-ranked exercise first.
        tracing::debug!("No recovery feedback for group, applying default +1 set");
        for candidate in &candidates {
            if try_grow(candidate.slot, slots, &mut counts, &mut session_totals) {
                break;
            }
        }
    }

    // Walk candidates in ranked order, applying each exercise's own delta one
    // unit at a time. A blocked unit is offered to the rest of the group in
    // the same ranked order; only when nobody has headroom is it dropped.
    for pos in 0..candidates.len() {
        let (slot, delta) = (candidates[pos].slot, candidates[pos].delta);
        for _ in 0..delta {
            if try_grow(slot, slots, &mut counts, &mut session_totals) {
                continue;
            }
            let mut placed = false;
            for recipient in &candidates {
                if recipient.slot == slot {
                    continue;
                }
                if try_grow(recipient.slot, slots, &mut counts, &mut session_totals) {
                    placed = true;
                    break;
                }
            }
            if !placed {
                tracing::debug!("No headroom anywhere in group, dropping one volume unit");
            }
        }
    }

    VolumePlan {
        set_counts: slots
            .iter()
            .zip(counts)
            .map(|(slot, count)| (slot.exercise_def_id, count))
            .collect(),
        recovery_flagged: flagged,
    }
}

/// Add one set to a slot if both caps allow it
fn try_grow(
    slot_idx: usize,
    slots: &[VolumeSlot],
    counts: &mut [u32],
    session_totals: &mut HashMap<usize, u32>,
) -> bool {
    let session = slots[slot_idx].session_index;
    let exercise_total = counts[slot_idx] + 1;
    let session_total = session_totals.get(&session).copied().unwrap_or(0) + 1;

    if exercise_total > MAX_SETS_PER_EXERCISE
        || session_total > MAX_SETS_PER_SESSION_MUSCLE_GROUP
    {
        return false;
    }

    counts[slot_idx] = exercise_total;
    session_totals.insert(session, session_total);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(session_index: usize, baseline: Option<Baseline>) -> VolumeSlot {
        VolumeSlot {
            exercise_def_id: Uuid::new_v4(),
            session_index,
            baseline,
        }
    }

    fn baseline_with_feedback(set_count: u32, soreness: u8, performance: u8) -> Baseline {
        Baseline {
            set_count,
            soreness: Some(soreness),
            performance: Some(performance),
            ..Baseline::default()
        }
    }

    fn ratio_scores(stimulus_each: u8) -> (Option<StimulusScore>, Option<FatigueScore>) {
        (
            Some(StimulusScore {
                mind_muscle: Some(stimulus_each),
                pump: Some(stimulus_each),
                workload: Some(stimulus_each),
            }),
            Some(FatigueScore {
                joint_pain: Some(1),
                perceived_effort: Some(1),
                tissue_disruption: Some(1),
            }),
        )
    }

    #[test]
    fn test_week_zero_seeds_every_exercise() {
        let slots = vec![slot(0, None), slot(0, None), slot(1, None)];
        let plan = plan_group_volume(&slots, 2);

        for (_, count) in &plan.set_counts {
            assert_eq!(*count, 2);
        }
        assert!(plan.recovery_flagged.is_empty());
    }

    #[test]
    fn test_no_feedback_adds_one_set_to_group() {
        let slots = vec![
            slot(0, Some(Baseline { set_count: 2, ..Baseline::default() })),
            slot(1, Some(Baseline { set_count: 2, ..Baseline::default() })),
        ];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, 3);
        assert_eq!(plan.set_counts[1].1, 2);
    }

    #[test]
    fn test_seeding_respects_session_cap() {
        // Six exercises seeded into one session would want 12 sets; the
        // session holds 10. Earlier slots fill first.
        let slots: Vec<VolumeSlot> = (0..6).map(|_| slot(0, None)).collect();
        let plan = plan_group_volume(&slots, 2);

        let total: u32 = plan.set_counts.iter().map(|(_, count)| count).sum();
        assert_eq!(total, MAX_SETS_PER_SESSION_MUSCLE_GROUP);
        for (_, count) in &plan.set_counts[..5] {
            assert_eq!(*count, 2);
        }
        assert_eq!(plan.set_counts[5].1, 0);
    }

    #[test]
    fn test_oversized_baseline_clamped_to_exercise_cap() {
        // A baseline above the per-exercise cap (stale or hand-edited
        // snapshot history) never carries through to the new week.
        let slots = vec![slot(
            0,
            Some(Baseline {
                set_count: 12,
                ..Baseline::default()
            }),
        )];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, MAX_SETS_PER_EXERCISE);
    }

    #[test]
    fn test_recovery_trigger_halves_and_flags() {
        let slots = vec![slot(0, Some(baseline_with_feedback(5, 1, 3)))];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, 2);
        assert!(plan.recovery_flagged.contains(&slots[0].exercise_def_id));
    }

    #[test]
    fn test_recovery_never_drops_below_one_set() {
        let slots = vec![slot(0, Some(baseline_with_feedback(1, 0, 3)))];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, 1);
    }

    #[test]
    fn test_feedback_deltas_applied() {
        // soreness 0 / performance 0 recommends +2.
        let slots = vec![slot(0, Some(baseline_with_feedback(3, 0, 0)))];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, 5);
    }

    #[test]
    fn test_blocked_delta_spills_to_exercise_with_headroom() {
        // A sits at the per-exercise cap with a +2 recommendation; B has
        // delta 0. Both of A's units land on B.
        let (stim_a, fat_a) = ratio_scores(3);
        let a = Baseline {
            set_count: 8,
            soreness: Some(0),
            performance: Some(0),
            stimulus: stim_a,
            fatigue: fat_a,
        };
        let b = baseline_with_feedback(3, 2, 2);

        let slots = vec![slot(0, Some(a)), slot(1, Some(b))];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, 8);
        assert_eq!(plan.set_counts[1].1, 5);
    }

    #[test]
    fn test_session_cap_spills_across_sessions() {
        // Two exercises fill their shared session to the 10-set cap; both
        // have +1 recommendations. A third exercise in another session takes
        // both blocked units.
        let (stim_hi, fat) = ratio_scores(3);
        let (stim_mid, _) = ratio_scores(2);
        let (stim_lo, _) = ratio_scores(1);

        let e1 = Baseline {
            set_count: 5,
            soreness: Some(0),
            performance: Some(1),
            stimulus: stim_hi,
            fatigue: fat,
        };
        let e2 = Baseline {
            set_count: 5,
            soreness: Some(0),
            performance: Some(1),
            stimulus: stim_mid,
            fatigue: fat,
        };
        let e3 = Baseline {
            set_count: 5,
            soreness: Some(1),
            performance: Some(1),
            stimulus: stim_lo,
            fatigue: fat,
        };

        let slots = vec![slot(0, Some(e1)), slot(0, Some(e2)), slot(1, Some(e3))];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, 5);
        assert_eq!(plan.set_counts[1].1, 5);
        assert_eq!(plan.set_counts[2].1, 7);
    }

    #[test]
    fn test_unit_dropped_when_group_has_no_headroom() {
        let slots = vec![slot(0, Some(baseline_with_feedback(8, 0, 0)))];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, 8);
    }

    #[test]
    fn test_flagged_exercise_counts_toward_session_cap() {
        // The recovery-flagged exercise still occupies 4 sets of its session,
        // leaving room for only one of the other exercise's two units.
        let flagged = baseline_with_feedback(8, 2, 3); // halves to 4, flagged
        let grower = baseline_with_feedback(5, 0, 0); // +2 recommendation

        let slots = vec![slot(0, Some(flagged)), slot(0, Some(grower))];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, 4);
        assert_eq!(plan.set_counts[1].1, 6);
        assert_eq!(plan.recovery_flagged.len(), 1);
    }

    #[test]
    fn test_higher_ratio_ranks_first_for_spillover() {
        // Both spilled units should land on the highest-SFR recipient first.
        let (stim_hi, fat) = ratio_scores(3);
        let (stim_lo, _) = ratio_scores(1);

        let blocked = Baseline {
            set_count: 8,
            soreness: Some(0),
            performance: Some(0),
            ..Baseline::default()
        };
        let high = Baseline {
            set_count: 3,
            soreness: Some(2),
            performance: Some(2),
            stimulus: stim_hi,
            fatigue: fat,
        };
        let low = Baseline {
            set_count: 3,
            soreness: Some(2),
            performance: Some(2),
            stimulus: stim_lo,
            fatigue: fat,
        };

        // Low-ratio exercise listed before high-ratio one on purpose.
        let slots = vec![slot(0, Some(blocked)), slot(1, Some(low)), slot(2, Some(high))];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.set_counts[0].1, 8);
        assert_eq!(plan.set_counts[1].1, 3);
        assert_eq!(plan.set_counts[2].1, 5);
    }

    #[test]
    fn test_count_for_lookup() {
        let slots = vec![slot(0, None)];
        let plan = plan_group_volume(&slots, 2);

        assert_eq!(plan.count_for(&slots[0].exercise_def_id), Some(2));
        assert_eq!(plan.count_for(&Uuid::new_v4()), None);
    }
}
