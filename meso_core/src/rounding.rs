//! Nearest-legal-weight lookup over a sorted equipment weight ladder.
//!
//! Every planned weight must land on an equipment's discrete ladder (e.g.
//! barbell plus plate combinations). This module provides the rounding
//! primitives the set generator uses, plus ladder construction helpers.
//!
//! An empty or absent ladder rounds to `None` for every mode; that is a
//! normal result here, not an error. Callers that require a ladder
//! (the planner does) validate before reaching this point.

/// Rounding mode for ladder lookups
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingMode {
    /// Smallest legal weight >= target, or none.
    Up,
    /// Largest legal weight <= target, or none.
    Down,
    /// Whichever side is closer; an exact tie prefers down.
    Nearest,
    /// Down if it exists, else up.
    PreferDown,
    /// Up if it exists, else down.
    PreferUp,
}

/// Round a target weight onto an ascending ladder of legal weights
pub fn round_to_ladder(weights: &[f64], target: f64, mode: RoundingMode) -> Option<f64> {
    if weights.is_empty() {
        return None;
    }

    // First index with weight >= target.
    let split_up = weights.partition_point(|w| *w < target);
    let up = weights.get(split_up).copied();

    // Count of weights <= target.
    let split_down = weights.partition_point(|w| *w <= target);
    let down = split_down.checked_sub(1).and_then(|i| weights.get(i)).copied();

    match mode {
        RoundingMode::Up => up,
        RoundingMode::Down => down,
        RoundingMode::PreferDown => down.or(up),
        RoundingMode::PreferUp => up.or(down),
        RoundingMode::Nearest => match (down, up) {
            (Some(d), Some(u)) => {
                if target - d <= u - target {
                    Some(d)
                } else {
                    Some(u)
                }
            }
            (Some(d), None) => Some(d),
            (None, Some(u)) => Some(u),
            (None, None) => None,
        },
    }
}

/// Smallest legal weight strictly greater than `current`, if any
pub fn next_above(weights: &[f64], current: f64) -> Option<f64> {
    let split = weights.partition_point(|w| *w <= current);
    weights.get(split).copied()
}

/// Smallest positive gap between adjacent ladder weights
///
/// Returns `None` for ladders with fewer than two distinct weights.
pub fn smallest_increment(weights: &[f64]) -> Option<f64> {
    weights
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| *gap > 0.0)
        .fold(None, |acc, gap| match acc {
            Some(best) if best <= gap => Some(best),
            _ => Some(gap),
        })
}

/// Generate an ascending weight ladder from min/increment/max
///
/// Returns an empty ladder when the parameters cannot produce one
/// (non-positive step or max below min).
pub fn weight_ladder(min: f64, step: f64, max: f64) -> Vec<f64> {
    if step <= 0.0 || max < min {
        tracing::debug!(
            "Degenerate ladder parameters: min={}, step={}, max={}",
            min,
            step,
            max
        );
        return Vec::new();
    }

    let mut weights = Vec::new();
    let mut current = min;
    // Tolerance absorbs accumulated float error at the top of the ladder.
    while current <= max + 1e-9 {
        weights.push(current);
        current += step;
    }
    weights
}
