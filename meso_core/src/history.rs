//! Per-exercise volume history and the non-recovery lookback rule.
//!
//! The volume planner baselines each exercise on the most recent week in
//! which it was *not* recovery-flagged; flagged weeks are skipped entirely,
//! even if more recent. This module models that rule as an explicit
//! predicate over a time-ordered sequence of weekly observations, and builds
//! the sequence from previously-created planning records.

use crate::types::{ExerciseInSession, FatigueScore, Session, StimulusScore, Week};
use crate::volume::Baseline;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One realized (or previously planned) week of an exercise's volume history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseWeekRecord {
    pub week_index: u32,
    pub set_count: u32,
    pub recovery_flagged: bool,
    pub soreness: Option<u8>,
    pub performance: Option<u8>,
    pub stimulus: Option<StimulusScore>,
    pub fatigue: Option<FatigueScore>,
}

/// Weekly observations per exercise definition, ascending by week index
pub type ExerciseLog = HashMap<Uuid, Vec<ExerciseWeekRecord>>;

/// The most recent observation in which the exercise was not recovery-flagged
pub fn latest_non_recovery(records: &[ExerciseWeekRecord]) -> Option<&ExerciseWeekRecord> {
    records.iter().rev().find(|r| !r.recovery_flagged)
}

/// Volume baseline for one exercise, or `None` when no usable history exists
pub fn baseline_for(log: &ExerciseLog, exercise_def_id: &Uuid) -> Option<Baseline> {
    let records = log.get(exercise_def_id)?;
    let record = latest_non_recovery(records)?;

    Some(Baseline {
        set_count: record.set_count,
        soreness: record.soreness,
        performance: record.performance,
        stimulus: record.stimulus,
        fatigue: record.fatigue,
    })
}

/// Build an exercise log from previously-created planning records
///
/// Weeks are processed in ascending index order regardless of input order.
/// Should an exercise appear in multiple sessions of one week, its set
/// counts are summed and the first recorded feedback wins.
pub fn digest_records(
    weeks: &[Week],
    sessions: &[Session],
    exercises: &[ExerciseInSession],
) -> ExerciseLog {
    let sessions_by_id: HashMap<Uuid, &Session> =
        sessions.iter().map(|s| (s.id, s)).collect();
    let exercises_by_id: HashMap<Uuid, &ExerciseInSession> =
        exercises.iter().map(|e| (e.id, e)).collect();

    let mut week_order: Vec<&Week> = weeks.iter().collect();
    week_order.sort_by_key(|w| w.index);

    let mut log: ExerciseLog = HashMap::new();

    for week in week_order {
        let mut week_entries: HashMap<Uuid, ExerciseWeekRecord> = HashMap::new();
        let mut entry_order: Vec<Uuid> = Vec::new();

        for session_id in &week.session_ids {
            let Some(session) = sessions_by_id.get(session_id) else {
                tracing::warn!("Week {} references unknown session {}", week.index, session_id);
                continue;
            };
            for exercise_id in &session.exercise_ids {
                let Some(eis) = exercises_by_id.get(exercise_id) else {
                    tracing::warn!(
                        "Session {} references unknown exercise-in-session {}",
                        session.id,
                        exercise_id
                    );
                    continue;
                };
                let entry = week_entries
                    .entry(eis.exercise_def_id)
                    .or_insert_with(|| {
                        entry_order.push(eis.exercise_def_id);
                        ExerciseWeekRecord {
                            week_index: week.index,
                            set_count: 0,
                            recovery_flagged: false,
                            soreness: None,
                            performance: None,
                            stimulus: None,
                            fatigue: None,
                        }
                    });
                entry.set_count += eis.set_ids.len() as u32;
                entry.recovery_flagged |= eis.recovery_flagged;
                entry.soreness = entry.soreness.or(eis.soreness);
                entry.performance = entry.performance.or(eis.performance);
                entry.stimulus = entry.stimulus.or(eis.stimulus);
                entry.fatigue = entry.fatigue.or(eis.fatigue);
            }
        }

        for def_id in entry_order {
            if let Some(record) = week_entries.remove(&def_id) {
                log.entry(def_id).or_default().push(record);
            }
        }
    }

    log
}

/// Append one planned week's outcome to the log (new log, input untouched)
pub fn with_week(
    log: &ExerciseLog,
    week_index: u32,
    outcomes: impl IntoIterator<Item = (Uuid, u32, bool)>,
) -> ExerciseLog {
    let mut next = log.clone();
    for (exercise_def_id, set_count, recovery_flagged) in outcomes {
        next.entry(exercise_def_id)
            .or_default()
            .push(ExerciseWeekRecord {
                week_index,
                set_count,
                recovery_flagged,
                soreness: None,
                performance: None,
                stimulus: None,
                fatigue: None,
            });
    }
    next
}
