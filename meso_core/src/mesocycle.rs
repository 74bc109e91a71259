//! Full-cycle orchestration.
//!
//! Iterates the weeks of a cycle in strictly increasing order, partitions
//! the calibrated exercises into sessions, runs the volume planner per
//! muscle group and the set generator per exercise slot, and assembles the
//! complete set of new records with parent ordering arrays referencing the
//! children created in the same pass.

use crate::history::{self, ExerciseLog};
use crate::sets::{self, SetParams};
use crate::types::{
    Calibration, CycleConfig, EquipmentType, ExerciseDef, ExerciseInSession, MuscleGroup, Session,
    SetRecord, Week,
};
use crate::volume::{self, VolumeSlot};
use crate::{Error, PlanningConfig, Result};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

/// Hour of day (UTC) stamped on planned session start times
const SESSION_START_HOUR: u32 = 9;

/// In-memory snapshot of everything the engine consumes from persistence
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanningInputs {
    pub config: CycleConfig,
    pub calibrations: HashMap<Uuid, Calibration>,
    pub exercises: HashMap<Uuid, ExerciseDef>,
    pub equipment: HashMap<Uuid, EquipmentType>,
}

/// All records produced for one planned week
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeekPlan {
    pub week: Week,
    pub sessions: Vec<Session>,
    pub exercises: Vec<ExerciseInSession>,
    pub sets: Vec<SetRecord>,
}

/// All records produced for a full cycle
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CyclePlan {
    pub weeks: Vec<Week>,
    pub sessions: Vec<Session>,
    pub exercises: Vec<ExerciseInSession>,
    pub sets: Vec<SetRecord>,
}

impl CyclePlan {
    fn push_week(&mut self, week: WeekPlan) {
        self.weeks.push(week.week);
        self.sessions.extend(week.sessions);
        self.exercises.extend(week.exercises);
        self.sets.extend(week.sets);
    }
}

/// One calibrated exercise with every reference resolved
struct ResolvedExercise<'a> {
    calibration: &'a Calibration,
    exercise: &'a ExerciseDef,
    equipment: &'a EquipmentType,
}

/// Plan a complete fresh cycle (no realized history yet)
///
/// Weeks are computed strictly in ascending order; each week's volume plan
/// sees the counts of the weeks planned before it.
pub fn plan_cycle(inputs: &PlanningInputs, config: &PlanningConfig) -> Result<CyclePlan> {
    let resolved = resolve_exercises(inputs)?;
    let total_weeks = inputs.config.total_weeks();

    tracing::info!(
        "Planning cycle {} for user {}: {} weeks, {} exercises, {} sessions/week",
        inputs.config.id,
        inputs.config.user_id,
        total_weeks,
        resolved.len(),
        inputs.config.sessions_per_week
    );

    let mut plan = CyclePlan::default();
    let mut log = ExerciseLog::new();

    for week_index in 0..total_weeks {
        let week = plan_week_resolved(inputs, config, &resolved, &log, week_index)?;
        log = history::with_week(
            &log,
            week_index,
            week.exercises.iter().map(|e| {
                (
                    e.exercise_def_id,
                    e.set_ids.len() as u32,
                    e.recovery_flagged,
                )
            }),
        );
        plan.push_week(week);
    }

    Ok(plan)
}

/// Plan a single week against realized history
///
/// Used to replan upcoming weeks once athlete feedback exists for prior
/// ones. `log` must hold the realized observations of weeks `< week_index`
/// (see [`crate::history::digest_records`]).
pub fn plan_week(
    inputs: &PlanningInputs,
    config: &PlanningConfig,
    log: &ExerciseLog,
    week_index: u32,
) -> Result<WeekPlan> {
    let resolved = resolve_exercises(inputs)?;

    if week_index >= inputs.config.total_weeks() {
        return Err(Error::Planning(format!(
            "week index {} out of range for a {}-week cycle",
            week_index,
            inputs.config.total_weeks()
        )));
    }

    plan_week_resolved(inputs, config, &resolved, log, week_index)
}

/// Resolve and validate every calibration -> exercise -> equipment chain
///
/// Any unresolvable reference is fatal: silently skipping a referenced
/// entity would produce an incomplete, undetectably-wrong plan.
fn resolve_exercises<'a>(inputs: &'a PlanningInputs) -> Result<Vec<ResolvedExercise<'a>>> {
    let config = &inputs.config;

    if config.sessions_per_week == 0 {
        return Err(Error::Config("sessions_per_week must be at least 1".into()));
    }
    if config.calibration_ids.len() < config.sessions_per_week as usize {
        return Err(Error::Config(format!(
            "cycle has {} calibrations but plans {} sessions per week",
            config.calibration_ids.len(),
            config.sessions_per_week
        )));
    }

    let mut resolved = Vec::with_capacity(config.calibration_ids.len());
    let mut seen_exercises = HashSet::new();

    for calibration_id in &config.calibration_ids {
        let calibration = inputs.calibrations.get(calibration_id).ok_or_else(|| {
            Error::InvalidReference(format!("calibration {} not found", calibration_id))
        })?;
        let exercise = inputs
            .exercises
            .get(&calibration.exercise_def_id)
            .ok_or_else(|| {
                Error::InvalidReference(format!(
                    "exercise {} referenced by calibration {} not found",
                    calibration.exercise_def_id, calibration_id
                ))
            })?;
        let equipment = inputs.equipment.get(&exercise.equipment_id).ok_or_else(|| {
            Error::InvalidReference(format!(
                "equipment {} referenced by exercise '{}' not found",
                exercise.equipment_id, exercise.name
            ))
        })?;

        if equipment.weights.is_empty() {
            return Err(Error::Config(format!(
                "equipment '{}' for exercise '{}' has no legal weights",
                equipment.name, exercise.name
            )));
        }
        if !seen_exercises.insert(exercise.id) {
            return Err(Error::Config(format!(
                "exercise '{}' is calibrated more than once in this cycle",
                exercise.name
            )));
        }

        resolved.push(ResolvedExercise {
            calibration,
            exercise,
            equipment,
        });
    }

    Ok(resolved)
}

/// Partition resolved exercises across sessions: stable sort by rep-range
/// class (Heavy, Medium, Light), then round-robin. Returns, per session,
/// the indices into `resolved`.
fn partition_sessions(resolved: &[ResolvedExercise], sessions_per_week: u32) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..resolved.len()).collect();
    order.sort_by_key(|&i| resolved[i].exercise.rep_range.partition_rank());

    let mut sessions = vec![Vec::new(); sessions_per_week as usize];
    for (position, index) in order.into_iter().enumerate() {
        sessions[position % sessions_per_week as usize].push(index);
    }
    sessions
}

/// Training-day indices for a week: the first `sessions_per_week` non-rest days
fn training_days(config: &CycleConfig) -> Result<Vec<u32>> {
    let rest: HashSet<u32> = config.rest_day_indices.iter().copied().collect();
    let days: Vec<u32> = (0..config.week_length_days)
        .filter(|day| !rest.contains(day))
        .take(config.sessions_per_week as usize)
        .collect();

    if days.len() < config.sessions_per_week as usize {
        return Err(Error::Config(format!(
            "week of {} days with {} rest days cannot hold {} sessions",
            config.week_length_days,
            config.rest_day_indices.len(),
            config.sessions_per_week
        )));
    }
    Ok(days)
}

fn session_start(date: NaiveDate) -> chrono::DateTime<Utc> {
    let time = date
        .and_hms_opt(SESSION_START_HOUR, 0, 0)
        .expect("session start hour is a valid time of day");
    Utc.from_utc_datetime(&time)
}

fn plan_week_resolved(
    inputs: &PlanningInputs,
    config: &PlanningConfig,
    resolved: &[ResolvedExercise],
    log: &ExerciseLog,
    week_index: u32,
) -> Result<WeekPlan> {
    let cycle = &inputs.config;
    let total_weeks = cycle.total_weeks();
    let deload = week_index == total_weeks.saturating_sub(1);

    let start_date = cycle.start_date
        + Duration::days(i64::from(week_index) * i64::from(cycle.week_length_days));
    let end_date = start_date + Duration::days(i64::from(cycle.week_length_days) - 1);

    let partition = partition_sessions(resolved, cycle.sessions_per_week);
    let days = training_days(cycle)?;

    // Muscle-group volume pass. Groups iterate in a fixed order so identical
    // inputs always produce identical plans.
    let mut groups: BTreeMap<MuscleGroup, Vec<VolumeSlot>> = BTreeMap::new();
    for (session_index, members) in partition.iter().enumerate() {
        for &i in members {
            let exercise = resolved[i].exercise;
            groups
                .entry(exercise.primary_muscle)
                .or_default()
                .push(VolumeSlot {
                    exercise_def_id: exercise.id,
                    session_index,
                    baseline: history::baseline_for(log, &exercise.id),
                });
        }
    }

    let mut set_counts: HashMap<Uuid, u32> = HashMap::new();
    let mut recovery_flagged: HashSet<Uuid> = HashSet::new();
    for (muscle, slots) in &groups {
        let group_plan = volume::plan_group_volume(slots, config.volume.seed_sets);
        tracing::debug!(
            "Week {} {}: {:?}",
            week_index,
            muscle,
            group_plan.set_counts
        );
        set_counts.extend(group_plan.set_counts.iter().copied());
        recovery_flagged.extend(group_plan.recovery_flagged.iter().copied());
    }

    // Assemble records, child IDs first so every parent's ordering array
    // references children created in this same pass.
    let week_id = Uuid::new_v4();
    let mut sessions = Vec::with_capacity(partition.len());
    let mut exercises = Vec::new();
    let mut all_sets = Vec::new();

    for (session_index, members) in partition.iter().enumerate() {
        let session_id = Uuid::new_v4();
        let mut exercise_ids = Vec::with_capacity(members.len());

        for &i in members {
            let slot = &resolved[i];
            let exercise_in_session_id = Uuid::new_v4();
            let count = set_counts.get(&slot.exercise.id).copied().unwrap_or(0);

            let targets = sets::generate_sets(&SetParams {
                rep_range: slot.exercise.rep_range.window(),
                ladder: &slot.equipment.weights,
                calibration_weight: slot.calibration.weight,
                calibration_reps: slot.calibration.reps,
                progression: slot.exercise.progression,
                week_index,
                set_count: count,
                deload,
                session_index: session_index as u32,
                sessions_per_week: cycle.sessions_per_week,
                deload_rir: config.progression.deload_rir,
            })?;

            let mut set_ids = Vec::with_capacity(targets.len());
            for target in targets {
                let set = SetRecord {
                    id: Uuid::new_v4(),
                    exercise_in_session_id,
                    planned_reps: target.reps,
                    planned_weight: target.weight,
                    planned_rir: target.rir,
                    actual_reps: None,
                    actual_weight: None,
                    actual_rir: None,
                };
                set_ids.push(set.id);
                all_sets.push(set);
            }

            exercise_ids.push(exercise_in_session_id);
            exercises.push(ExerciseInSession {
                id: exercise_in_session_id,
                session_id,
                exercise_def_id: slot.exercise.id,
                set_ids,
                stimulus: None,
                fatigue: None,
                soreness: None,
                performance: None,
                recovery_flagged: recovery_flagged.contains(&slot.exercise.id),
            });
        }

        let day_offset = days[session_index];
        sessions.push(Session {
            id: session_id,
            week_id,
            start_time: session_start(start_date + Duration::days(i64::from(day_offset))),
            exercise_ids,
        });
    }

    let week = Week {
        id: week_id,
        cycle_id: Some(cycle.id),
        index: week_index,
        start_date,
        end_date,
        session_ids: sessions.iter().map(|s| s.id).collect(),
        deload,
    };

    tracing::info!(
        "Planned week {} ({} sessions, {} sets{})",
        week_index,
        sessions.len(),
        all_sets.len(),
        if deload { ", deload" } else { "" }
    );

    Ok(WeekPlan {
        week,
        sessions,
        exercises,
        sets: all_sets,
    })
}
