#![forbid(unsafe_code)]

//! Core domain model and planning engine for the Mesoplan system.
//!
//! This crate provides:
//! - Domain types (cycles, weeks, sessions, exercises, sets, scores)
//! - Equipment weight rounding
//! - Stimulus/fatigue aggregation and recovery advice
//! - Weekly volume planning with capacity caps and redistribution
//! - Set-level target generation
//! - Full mesocycle orchestration
//!
//! The engine is a pure, synchronous computation over an in-memory snapshot
//! of records: no I/O, no locks, deterministic for identical inputs.
//! Independent cycles share no state and may be planned concurrently.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod rounding;
pub mod scores;
pub mod recovery;
pub mod volume;
pub mod sets;
pub mod history;
pub mod mesocycle;
pub mod snapshot;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::PlanningConfig;
pub use rounding::{round_to_ladder, weight_ladder, RoundingMode};
pub use scores::stimulus_to_fatigue_ratio;
pub use recovery::{advise, VolumeAdvice};
pub use volume::{
    plan_group_volume, VolumePlan, VolumeSlot, MAX_SETS_PER_EXERCISE,
    MAX_SETS_PER_SESSION_MUSCLE_GROUP,
};
pub use sets::{generate_sets, target_rir, SetTarget};
pub use history::{digest_records, latest_non_recovery, ExerciseLog};
pub use mesocycle::{plan_cycle, plan_week, CyclePlan, PlanningInputs, WeekPlan};
pub use snapshot::{load_snapshot, save_plan, PlanningSnapshot};
