//! JSON snapshot files for the CLI boundary.
//!
//! The persistence layer proper is an external collaborator; these helpers
//! let the `mesoplan` binary drive the pure engine from a single JSON file
//! holding the planning inputs and, optionally, realized history.

use crate::history::ExerciseLog;
use crate::mesocycle::{CyclePlan, PlanningInputs};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Everything the CLI needs to plan: inputs plus optional realized history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    pub inputs: PlanningInputs,
    /// Realized per-exercise weekly observations, for replanning single weeks.
    #[serde(default)]
    pub history: ExerciseLog,
}

/// Load a planning snapshot from a JSON file
pub fn load_snapshot(path: &Path) -> Result<PlanningSnapshot> {
    let contents = std::fs::read_to_string(path)?;
    let snapshot: PlanningSnapshot = serde_json::from_str(&contents)?;
    tracing::debug!(
        "Loaded snapshot from {:?} ({} calibrations, {} history entries)",
        path,
        snapshot.inputs.calibrations.len(),
        snapshot.history.len()
    );
    Ok(snapshot)
}

/// Write a value as pretty JSON, atomically (temp file + rename)
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut temp, value)?;
    temp.write_all(b"\n")?;
    temp.flush()?;
    temp.persist(path)
        .map_err(|e| crate::Error::Io(e.error))?;

    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

/// Write a cycle plan to a JSON file
pub fn save_plan(path: &Path, plan: &CyclePlan) -> Result<()> {
    save_json(path, plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CycleArchetype, CycleConfig};
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn minimal_snapshot() -> PlanningSnapshot {
        PlanningSnapshot {
            inputs: PlanningInputs {
                config: CycleConfig {
                    id: Uuid::new_v4(),
                    user_id: Uuid::new_v4(),
                    calibration_ids: vec![],
                    archetype: CycleArchetype::Strength,
                    sessions_per_week: 0,
                    week_length_days: 7,
                    rest_day_indices: vec![],
                    planned_week_count: None,
                    start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                },
                calibrations: HashMap::new(),
                exercises: HashMap::new(),
                equipment: HashMap::new(),
            },
            history: ExerciseLog::new(),
        }
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("snapshot.json");

        let snapshot = minimal_snapshot();
        save_json(&path, &snapshot).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.inputs.config.id, snapshot.inputs.config.id);
        assert!(loaded.history.is_empty());
    }

    #[test]
    fn test_history_field_is_optional_in_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("snapshot.json");

        // Serialize, then strip the history field to simulate older files.
        let snapshot = minimal_snapshot();
        let mut value = serde_json::to_value(&snapshot).unwrap();
        value.as_object_mut().unwrap().remove("history");
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert!(loaded.history.is_empty());
    }

    #[test]
    fn test_malformed_snapshot_is_json_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }
}
