//! Recovery advice from soreness/performance feedback.
//!
//! Maps an exercise's (soreness, performance) pair onto either a recommended
//! set-count delta for next week or a recovery trigger. Missing feedback is
//! not an error: it yields no recommendation and the volume planner treats
//! it as a zero delta.

/// Outcome of a recovery lookup for one exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VolumeAdvice {
    /// Add this many sets to next week's count (may be zero).
    AddSets(u32),
    /// Halve the exercise for a week and exclude it from redistribution.
    Recover,
}

/// Look up volume advice for a (soreness, performance) pair
///
/// Both scores are 0-3. The table, rows = soreness, columns = performance:
///
/// | s\p | 0  | 1  | 2  | 3       |
/// |-----|----|----|----|---------|
/// | 0   | +2 | +1 | +0 | recover |
/// | 1   | +1 | +0 | +0 | recover |
/// | 2   | +0 | +0 | +0 | recover |
/// | 3   | +0 | +0 | +0 | recover |
///
/// Returns `None` when either score is absent or out of range.
pub fn advise(soreness: Option<u8>, performance: Option<u8>) -> Option<VolumeAdvice> {
    let s = soreness?;
    let p = performance?;

    if s > 3 || p > 3 {
        tracing::debug!("Ignoring out-of-range feedback: soreness={}, performance={}", s, p);
        return None;
    }

    if p == 3 {
        return Some(VolumeAdvice::Recover);
    }

    let delta = match (s, p) {
        (0, 0) => 2,
        (0, 1) | (1, 0) => 1,
        _ => 0,
    };

    Some(VolumeAdvice::AddSets(delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_table() {
        let expected = [
            [2, 1, 0], // soreness 0
            [1, 0, 0], // soreness 1
            [0, 0, 0], // soreness 2
            [0, 0, 0], // soreness 3
        ];

        for (s, row) in expected.iter().enumerate() {
            for (p, delta) in row.iter().enumerate() {
                assert_eq!(
                    advise(Some(s as u8), Some(p as u8)),
                    Some(VolumeAdvice::AddSets(*delta)),
                    "table mismatch at soreness={}, performance={}",
                    s,
                    p
                );
            }
        }
    }

    #[test]
    fn test_performance_three_always_recovers() {
        for s in 0..=3 {
            assert_eq!(advise(Some(s), Some(3)), Some(VolumeAdvice::Recover));
        }
    }

    #[test]
    fn test_missing_scores_yield_no_advice() {
        assert_eq!(advise(None, Some(1)), None);
        assert_eq!(advise(Some(1), None), None);
        assert_eq!(advise(None, None), None);
    }

    #[test]
    fn test_out_of_range_scores_yield_no_advice() {
        assert_eq!(advise(Some(4), Some(1)), None);
        assert_eq!(advise(Some(1), Some(9)), None);
    }
}
