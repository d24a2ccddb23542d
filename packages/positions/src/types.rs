// ABOUTME: Position reconciliation type definitions
// ABOUTME: Sibling snapshots, shift descriptions, and reconciliation outcomes

use serde::Serialize;
use thiserror::Error;

/// Errors raised while reconciling positions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("Position must be non-negative, got {0}")]
    NegativePosition(i64),
    #[error("Part {0} is not one of the episode's parts")]
    UnknownPart(i64),
    #[error("Positions are not contiguous: position {0} is missing")]
    Gap(i64),
    #[error("Positions are not contiguous: position {0} is held more than once")]
    Duplicate(i64),
}

/// Snapshot of one part as seen by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub part_id: i64,
    pub position: i64,
}

impl Slot {
    pub fn new(part_id: i64, position: i64) -> Self {
        Self { part_id, position }
    }
}

/// A bulk position change over the half-open range `[start, end)` of an
/// episode's positions. `end: None` means the range is unbounded above.
/// `exclude` names a part that keeps its position even if it falls inside
/// the range (the part being moved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionShift {
    pub start: i64,
    pub end: Option<i64>,
    pub delta: i64,
    pub exclude: Option<i64>,
}

impl PositionShift {
    /// Shift every position `>= start` by `delta`
    pub fn from(start: i64, delta: i64) -> Self {
        Self {
            start,
            end: None,
            delta,
            exclude: None,
        }
    }

    /// Shift every position in `[start, end)` by `delta`
    pub fn between(start: i64, end: i64, delta: i64) -> Self {
        Self {
            start,
            end: Some(end),
            delta,
            exclude: None,
        }
    }

    pub fn excluding(mut self, part_id: i64) -> Self {
        self.exclude = Some(part_id);
        self
    }

    pub fn contains(&self, position: i64) -> bool {
        position >= self.start && self.end.map_or(true, |end| position < end)
    }

    pub fn applies_to(&self, slot: &Slot) -> bool {
        self.exclude != Some(slot.part_id) && self.contains(slot.position)
    }

    /// Position of `slot` after this shift
    pub fn apply(&self, slot: &Slot) -> i64 {
        if self.applies_to(slot) {
            slot.position + self.delta
        } else {
            slot.position
        }
    }
}

/// Where a new part goes, and what has to move out of its way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Insertion {
    pub position: i64,
    pub shift: Option<PositionShift>,
}

/// The slot freed by a removed part, and the shift that closes the gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub position: i64,
    pub shift: Option<PositionShift>,
}

/// Outcome of moving a part within its episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Move {
    /// The clamped target equals the current position; nothing to write
    Unchanged { position: i64 },
    Moved {
        from: i64,
        to: i64,
        shift: PositionShift,
    },
}

impl Move {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Move::Unchanged { .. })
    }

    /// Final position of the moved part
    pub fn position(&self) -> i64 {
        match self {
            Move::Unchanged { position } => *position,
            Move::Moved { to, .. } => *to,
        }
    }
}

/// One entry of a renumbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub part_id: i64,
    pub from: i64,
    pub to: i64,
}

impl Assignment {
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_shift_contains_everything_above_start() {
        let shift = PositionShift::from(2, 1);
        assert!(!shift.contains(1));
        assert!(shift.contains(2));
        assert!(shift.contains(1_000));
    }

    #[test]
    fn test_bounded_shift_is_half_open() {
        let shift = PositionShift::between(1, 3, -1);
        assert!(!shift.contains(0));
        assert!(shift.contains(1));
        assert!(shift.contains(2));
        assert!(!shift.contains(3));
    }

    #[test]
    fn test_excluded_part_keeps_position() {
        let shift = PositionShift::between(0, 5, 1).excluding(7);
        assert_eq!(shift.apply(&Slot::new(7, 2)), 2);
        assert_eq!(shift.apply(&Slot::new(8, 2)), 3);
    }

    #[test]
    fn test_move_reports_final_position() {
        assert_eq!(Move::Unchanged { position: 3 }.position(), 3);
        let moved = Move::Moved {
            from: 0,
            to: 2,
            shift: PositionShift::between(1, 3, -1),
        };
        assert_eq!(moved.position(), 2);
        assert!(!moved.is_unchanged());
    }
}
