//! Fractional position allocation for drag-and-drop ordering.
//!
//! Siblings within a container (lists within a board, cards within a list)
//! are ordered by an ascending `f64` position. Inserting or moving an entity
//! only ever writes that entity's own position: the new value is the midpoint
//! of its target neighbors, so no other sibling needs renumbering.
//!
//! Repeated splits of the same gap halve the available precision each time.
//! [`gap_exhausted`] reports when a gap has become too narrow to split
//! safely; callers are expected to respace the container before allocating
//! from it again.

/// Position assigned to the first entity in an empty container.
pub const FIRST_POSITION: f64 = 1.0;

/// Gap left between an appended entity and the previous tail.
pub const POSITION_STEP: f64 = 1.0;

/// Narrowest gap that may still be split by a midpoint. Below this the
/// container should be respaced to restore precision headroom.
pub const MIN_GAP: f64 = 1e-6;

/// Midpoint between two neighbor positions. Requires `prev < next`.
pub fn midpoint(prev: f64, next: f64) -> f64 {
    (prev + next) / 2.0
}

/// Compute a position between two optional neighbors.
///
/// - both present: midpoint
/// - no previous (insert at head): half the next position
/// - no next (insert at tail): one step past the previous position
/// - empty container: [`FIRST_POSITION`]
pub fn resolve(prev: Option<f64>, next: Option<f64>) -> f64 {
    match (prev, next) {
        (Some(prev), Some(next)) => midpoint(prev, next),
        (None, Some(next)) => next / 2.0,
        (Some(prev), None) => prev + POSITION_STEP,
        (None, None) => FIRST_POSITION,
    }
}

/// True when the gap between two neighbors is too narrow to split.
pub fn gap_exhausted(prev: f64, next: f64) -> bool {
    next - prev < MIN_GAP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_stays_strictly_between_neighbors() {
        let cases = [(0.0, 2.0), (1.0, 5.0), (3.0, 3.5), (-4.0, 1.0), (0.25, 0.5)];
        for (prev, next) in cases {
            let p = midpoint(prev, next);
            assert!(prev < p && p < next, "midpoint({prev}, {next}) = {p}");
        }
    }

    #[test]
    fn resolve_edge_policy() {
        assert_eq!(resolve(Some(1.0), Some(5.0)), 3.0);
        assert_eq!(resolve(None, Some(4.0)), 2.0);
        assert_eq!(resolve(Some(7.0), None), 8.0);
        assert_eq!(resolve(None, None), FIRST_POSITION);
    }

    #[test]
    fn repeated_splits_eventually_exhaust_the_gap() {
        let prev = 1.0;
        let mut next = 2.0;
        while !gap_exhausted(prev, next) {
            let p = midpoint(prev, next);
            assert!(prev < p && p < next);
            next = p;
        }
        assert!(next - prev < MIN_GAP);
    }

    #[test]
    fn wide_gaps_are_not_exhausted() {
        assert!(!gap_exhausted(1.0, 2.0));
        assert!(gap_exhausted(1.0, 1.0 + MIN_GAP / 2.0));
    }
}
