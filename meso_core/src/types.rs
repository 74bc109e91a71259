//! Core domain records for the mesocycle planning engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Cycle configuration and archetypes
//! - Exercise definitions, calibrations, and equipment
//! - Planned records (weeks, sessions, exercises-in-session, sets)
//! - Stimulus and fatigue feedback scores

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default number of weeks in a cycle: 5 progressive weeks + 1 deload.
pub const DEFAULT_WEEK_COUNT: u32 = 6;

// ============================================================================
// Cycle Configuration
// ============================================================================

/// High-level training goal for a cycle
///
/// Affects downstream recommendation policy, not the core planning arithmetic.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CycleArchetype {
    Hypertrophy,
    Strength,
    Endurance,
}

/// Configuration for one multi-week training cycle (mesocycle)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleConfig {
    pub id: Uuid,
    pub user_id: Uuid,
    /// One calibration reference per exercise included in the cycle.
    /// Invariant: must contain at least `sessions_per_week` entries.
    pub calibration_ids: Vec<Uuid>,
    pub archetype: CycleArchetype,
    pub sessions_per_week: u32,
    pub week_length_days: u32,
    /// Day indices (0-based, within the week) reserved for rest.
    pub rest_day_indices: Vec<u32>,
    /// Total planned weeks; `None` means the default of 6 (5 + deload).
    pub planned_week_count: Option<u32>,
    pub start_date: NaiveDate,
}

impl CycleConfig {
    /// Total number of weeks in the cycle, applying the default when unset
    pub fn total_weeks(&self) -> u32 {
        self.planned_week_count.unwrap_or(DEFAULT_WEEK_COUNT)
    }
}

// ============================================================================
// Exercise Definitions and Calibrations
// ============================================================================

/// Primary or secondary muscle group trained by an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Abs,
}

impl std::fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Biceps => "biceps",
            Self::Triceps => "triceps",
            Self::Quads => "quads",
            Self::Hamstrings => "hamstrings",
            Self::Glutes => "glutes",
            Self::Calves => "calves",
            Self::Abs => "abs",
        };
        write!(f, "{}", name)
    }
}

/// Inclusive rep window implied by a rep-range class
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepRange {
    pub min: u32,
    pub max: u32,
}

/// Rep-range class of an exercise
///
/// Session partition order is Heavy, then Medium, then Light.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RepRangeClass {
    Heavy,
    Medium,
    Light,
}

impl RepRangeClass {
    /// The numeric rep window this class implies
    pub fn window(&self) -> RepRange {
        match self {
            Self::Heavy => RepRange { min: 5, max: 10 },
            Self::Medium => RepRange { min: 10, max: 20 },
            Self::Light => RepRange { min: 20, max: 30 },
        }
    }

    /// Sort rank for session partitioning (Heavy first)
    pub fn partition_rank(&self) -> u8 {
        match self {
            Self::Heavy => 0,
            Self::Medium => 1,
            Self::Light => 2,
        }
    }
}

/// How an exercise progresses week over week
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionMode {
    /// Add reps weekly, rolling into a weight increment past the range max
    Rep,
    /// Increase weight weekly by the larger of the smallest ladder increment
    /// or 2% of current weight
    Load,
}

/// An exercise definition (e.g., "Barbell Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseDef {
    pub id: Uuid,
    pub name: String,
    pub equipment_id: Uuid,
    pub rep_range: RepRangeClass,
    pub progression: ProgressionMode,
    pub primary_muscle: MuscleGroup,
    pub secondary_muscles: Vec<MuscleGroup>,
}

/// A reference weight/rep pair for one exercise, locked at cycle start
///
/// Locking keeps historical 1RM estimates stable even if the athlete
/// recalibrates the exercise later.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Calibration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_def_id: Uuid,
    pub weight: f64,
    pub reps: u32,
    pub locked_at: DateTime<Utc>,
}

/// An equipment type exposing its ascending list of legal discrete weights
///
/// The planning engine never emits a weight outside this list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EquipmentType {
    pub id: Uuid,
    pub name: String,
    pub weights: Vec<f64>,
}

impl EquipmentType {
    /// Build an equipment type from a min/increment/max weight ladder
    pub fn from_ladder(id: Uuid, name: impl Into<String>, min: f64, step: f64, max: f64) -> Self {
        Self {
            id,
            name: name.into(),
            weights: crate::rounding::weight_ladder(min, step, max),
        }
    }
}

// ============================================================================
// Feedback Scores
// ============================================================================

/// Raw stimulus feedback: three 0-3 sub-scores reported by the athlete
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StimulusScore {
    pub mind_muscle: Option<u8>,
    pub pump: Option<u8>,
    pub workload: Option<u8>,
}

/// Fatigue feedback: three 0-3 sub-scores reported by the athlete
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FatigueScore {
    pub joint_pain: Option<u8>,
    pub perceived_effort: Option<u8>,
    pub tissue_disruption: Option<u8>,
}

// ============================================================================
// Planned Records
// ============================================================================

/// One planned training week (microcycle) within a cycle
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Week {
    pub id: Uuid,
    /// `None` for free-standing tracking weeks outside any cycle.
    pub cycle_id: Option<Uuid>,
    pub index: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Ordered references to the sessions created alongside this week.
    pub session_ids: Vec<Uuid>,
    pub deload: bool,
}

/// One planned training session within a week
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub week_id: Uuid,
    pub start_time: DateTime<Utc>,
    /// Ordered references to the exercises-in-session created alongside it.
    pub exercise_ids: Vec<Uuid>,
}

/// Join record between a session and an exercise definition
///
/// The engine fills the planned side; soreness/performance/stimulus/fatigue
/// are athlete feedback recorded after the session and never written here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseInSession {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_def_id: Uuid,
    /// Ordered references to the sets created alongside this record.
    pub set_ids: Vec<Uuid>,
    pub stimulus: Option<StimulusScore>,
    pub fatigue: Option<FatigueScore>,
    /// 0-3 soreness score, filled in by the athlete.
    pub soreness: Option<u8>,
    /// 0-3 performance score, filled in by the athlete.
    pub performance: Option<u8>,
    /// True when the volume planner halved this exercise for the week.
    pub recovery_flagged: bool,
}

/// One planned set; actuals are filled in later by the athlete
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetRecord {
    pub id: Uuid,
    pub exercise_in_session_id: Uuid,
    pub planned_reps: u32,
    pub planned_weight: f64,
    pub planned_rir: u32,
    pub actual_reps: Option<u32>,
    pub actual_weight: Option<f64>,
    pub actual_rir: Option<u32>,
}
