//! Set-level target generation.
//!
//! Produces the ordered weight/rep/RIR targets for one exercise in one
//! session, from the locked calibration progressed by week index. Weight
//! targets always land on the equipment's legal ladder.

use crate::rounding::{self, RoundingMode};
use crate::types::{ProgressionMode, RepRange};
use crate::{Error, Result};

/// Reps dropped between consecutive sets of a session
const INTRA_SESSION_REP_DROP: u32 = 2;

/// Fraction of current weight used for the weekly load increment floor
/// and for intra-session weight reduction.
const LOAD_STEP_FRACTION: f64 = 0.02;

/// Planned target for a single set
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetTarget {
    pub reps: u32,
    pub weight: f64,
    pub rir: u32,
}

/// Inputs for generating one exercise's sets in one session
#[derive(Clone, Debug)]
pub struct SetParams<'a> {
    pub rep_range: RepRange,
    /// Ascending legal weights of the exercise's equipment.
    pub ladder: &'a [f64],
    pub calibration_weight: f64,
    pub calibration_reps: u32,
    pub progression: ProgressionMode,
    pub week_index: u32,
    pub set_count: u32,
    pub deload: bool,
    /// Position of the session within the week's planned session count.
    pub session_index: u32,
    pub sessions_per_week: u32,
    /// RIR stamped on deload sets.
    pub deload_rir: u32,
}

/// Target reps-in-reserve for a non-deload week: 4, 3, 2, 1, 0, 0, ...
pub fn target_rir(week_index: u32) -> u32 {
    4 - week_index.min(4)
}

/// Generate the ordered set targets for one exercise in one session
pub fn generate_sets(params: &SetParams) -> Result<Vec<SetTarget>> {
    if params.set_count == 0 {
        return Ok(Vec::new());
    }

    if params.deload {
        return generate_deload_sets(params);
    }

    let rir = target_rir(params.week_index);
    let (mut reps, mut weight) = first_set_for_week(params, params.week_index)?;

    let mut sets = Vec::with_capacity(params.set_count as usize);
    sets.push(SetTarget { reps, weight, rir });

    for _ in 1..params.set_count {
        if reps >= params.rep_range.min + INTRA_SESSION_REP_DROP {
            reps -= INTRA_SESSION_REP_DROP;
        } else {
            // Dropping reps would go below the range minimum: back the
            // weight off by ~2% instead, staying on the ladder.
            let reduced = weight * (1.0 - LOAD_STEP_FRACTION);
            match rounding::round_to_ladder(params.ladder, reduced, RoundingMode::Down) {
                Some(lower) if lower < weight => weight = lower,
                _ => reps = params.rep_range.min,
            }
        }
        sets.push(SetTarget { reps, weight, rir });
    }

    Ok(sets)
}

/// Deload sets: reps halved from the previous week's first set; weight also
/// halved for sessions in the second half of the week's session count
fn generate_deload_sets(params: &SetParams) -> Result<Vec<SetTarget>> {
    let prev_week = params.week_index.saturating_sub(1);
    let (prev_reps, prev_weight) = first_set_for_week(params, prev_week)?;

    let reps = prev_reps / 2;
    let second_half = params.session_index * 2 >= params.sessions_per_week;
    let weight = if second_half {
        rounding::round_to_ladder(params.ladder, prev_weight / 2.0, RoundingMode::Nearest)
            .ok_or_else(|| Error::Planning("no legal weights available for deload".into()))?
    } else {
        prev_weight
    };

    tracing::debug!(
        "Deload session {}: {} reps @ {} ({})",
        params.session_index,
        reps,
        weight,
        if second_half { "half load" } else { "full load" }
    );

    Ok(vec![
        SetTarget {
            reps,
            weight,
            rir: params.deload_rir,
        };
        params.set_count as usize
    ])
}

/// First-set reps/weight for a given week, progressed from the calibration
fn first_set_for_week(params: &SetParams, week_index: u32) -> Result<(u32, f64)> {
    let range = params.rep_range;
    let mut reps = params.calibration_reps.clamp(range.min, range.max);
    let mut weight =
        rounding::round_to_ladder(params.ladder, params.calibration_weight, RoundingMode::Nearest)
            .ok_or_else(|| Error::Planning("no legal weights available".into()))?;

    for _ in 0..week_index {
        match params.progression {
            ProgressionMode::Rep => {
                reps += 1;
                if reps > range.max {
                    // Past the rep window: roll into a weight increment and
                    // restart at the bottom of the window.
                    match rounding::next_above(params.ladder, weight) {
                        Some(next) => {
                            weight = next;
                            reps = range.min;
                        }
                        None => reps = range.max, // top of the ladder
                    }
                }
            }
            ProgressionMode::Load => {
                let increment = rounding::smallest_increment(params.ladder)
                    .unwrap_or(0.0)
                    .max(weight * LOAD_STEP_FRACTION);
                if let Some(next) =
                    rounding::round_to_ladder(params.ladder, weight + increment, RoundingMode::PreferUp)
                {
                    if next > weight {
                        weight = next;
                    }
                }
            }
        }
    }

    Ok((reps, weight))
}
