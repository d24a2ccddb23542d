// ABOUTME: Shift computation for inserting, removing, moving, and renumbering parts
// ABOUTME: Operates on the full sibling set of one episode and never touches storage

//! Every function here takes the complete list of an episode's parts. A
//! shift is always computed from the whole sibling set, never from a single
//! record, since contiguity is a property of the set.
//!
//! Ranges are half-open `[start, end)`. When a part moves, the range never
//! contains the moved part's old slot:
//!
//! - moving earlier (`to < from`): `[to, from)` shifts up by one
//! - moving later (`to > from`): `[from + 1, to + 1)` shifts down by one

use crate::types::{Assignment, Insertion, Move, PositionError, PositionShift, Removal, Slot};

fn ensure_non_negative(position: i64) -> Result<(), PositionError> {
    if position < 0 {
        return Err(PositionError::NegativePosition(position));
    }
    Ok(())
}

fn find(siblings: &[Slot], part_id: i64) -> Result<Slot, PositionError> {
    siblings
        .iter()
        .find(|slot| slot.part_id == part_id)
        .copied()
        .ok_or(PositionError::UnknownPart(part_id))
}

/// Compute where a new part lands. Requests past the end append at `N`.
pub fn insert(siblings: &[Slot], requested: i64) -> Result<Insertion, PositionError> {
    ensure_non_negative(requested)?;

    let count = siblings.len() as i64;
    let position = requested.min(count);

    let shift = siblings
        .iter()
        .any(|slot| slot.position >= position)
        .then(|| PositionShift::from(position, 1));

    Ok(Insertion { position, shift })
}

/// Compute the shift that closes the gap left by `part_id`.
///
/// A part that is not among `siblings` belongs to another episode (or does
/// not exist); that is an integrity error for the caller to surface.
pub fn remove(siblings: &[Slot], part_id: i64) -> Result<Removal, PositionError> {
    let removed = find(siblings, part_id)?;

    let shift = siblings
        .iter()
        .any(|slot| slot.part_id != part_id && slot.position > removed.position)
        .then(|| PositionShift::from(removed.position + 1, -1));

    Ok(Removal {
        position: removed.position,
        shift,
    })
}

/// Compute a move of `part_id` towards `requested`, clamped to the last slot.
pub fn move_to(siblings: &[Slot], part_id: i64, requested: i64) -> Result<Move, PositionError> {
    ensure_non_negative(requested)?;

    let moving = find(siblings, part_id)?;
    let last = siblings.len() as i64 - 1;
    let from = moving.position;
    let to = requested.min(last);

    if to == from {
        return Ok(Move::Unchanged { position: from });
    }

    let shift = if to < from {
        PositionShift::between(to, from, 1)
    } else {
        PositionShift::between(from + 1, to + 1, -1)
    }
    .excluding(part_id);

    Ok(Move::Moved { from, to, shift })
}

/// Reassign `0..N` following the current relative order. Ties on position
/// are broken by part id so the result is deterministic.
pub fn renumber(siblings: &[Slot]) -> Vec<Assignment> {
    let mut ordered = siblings.to_vec();
    ordered.sort_by_key(|slot| (slot.position, slot.part_id));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, slot)| Assignment {
            part_id: slot.part_id,
            from: slot.position,
            to: index as i64,
        })
        .collect()
}

/// Check that `positions` is exactly `{0, 1, ..., N-1}`
pub fn verify_contiguous<I>(positions: I) -> Result<(), PositionError>
where
    I: IntoIterator<Item = i64>,
{
    let mut sorted: Vec<i64> = positions.into_iter().collect();
    sorted.sort_unstable();

    if let Some(&lowest) = sorted.first() {
        ensure_non_negative(lowest)?;
    }

    for (index, &position) in sorted.iter().enumerate() {
        let expected = index as i64;
        if position < expected {
            return Err(PositionError::Duplicate(position));
        }
        if position > expected {
            return Err(PositionError::Gap(expected));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Parts with ids 1..=n at positions 0..n
    fn episode(n: i64) -> Vec<Slot> {
        (0..n).map(|p| Slot::new(p + 1, p)).collect()
    }

    fn apply(siblings: &[Slot], shift: Option<PositionShift>) -> Vec<Slot> {
        siblings
            .iter()
            .map(|slot| Slot::new(slot.part_id, shift.map_or(slot.position, |s| s.apply(slot))))
            .collect()
    }

    fn positions_by_id(slots: &[Slot]) -> Vec<(i64, i64)> {
        let mut pairs: Vec<(i64, i64)> = slots.iter().map(|s| (s.part_id, s.position)).collect();
        pairs.sort();
        pairs
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(3, 3)]
    #[case(4, 3)]
    #[case(99, 3)]
    fn test_insert_clamps_to_count(#[case] requested: i64, #[case] expected: i64) {
        let insertion = insert(&episode(3), requested).unwrap();
        assert_eq!(insertion.position, expected);
    }

    #[test]
    fn test_insert_in_middle_shifts_tail() {
        let siblings = episode(3);
        let insertion = insert(&siblings, 1).unwrap();
        assert_eq!(insertion.shift, Some(PositionShift::from(1, 1)));

        let mut after = apply(&siblings, insertion.shift);
        after.push(Slot::new(100, insertion.position));
        assert_eq!(
            positions_by_id(&after),
            vec![(1, 0), (2, 2), (3, 3), (100, 1)]
        );
        verify_contiguous(after.iter().map(|s| s.position)).unwrap();
    }

    #[test]
    fn test_append_needs_no_shift() {
        let insertion = insert(&episode(2), 7).unwrap();
        assert_eq!(insertion.position, 2);
        assert_eq!(insertion.shift, None);
    }

    #[test]
    fn test_insert_into_empty_episode() {
        let insertion = insert(&[], 5).unwrap();
        assert_eq!(insertion.position, 0);
        assert_eq!(insertion.shift, None);
    }

    #[test]
    fn test_insert_rejects_negative_position() {
        assert_eq!(
            insert(&episode(2), -1),
            Err(PositionError::NegativePosition(-1))
        );
    }

    #[test]
    fn test_remove_middle_of_three() {
        // positions 0,1,2; remove the part at 1
        let siblings = episode(3);
        let removal = remove(&siblings, 2).unwrap();
        assert_eq!(removal.position, 1);

        let remaining: Vec<Slot> = apply(&siblings, removal.shift)
            .into_iter()
            .filter(|s| s.part_id != 2)
            .collect();
        assert_eq!(positions_by_id(&remaining), vec![(1, 0), (3, 1)]);
    }

    #[test]
    fn test_remove_last_needs_no_shift() {
        let removal = remove(&episode(3), 3).unwrap();
        assert_eq!(removal.position, 2);
        assert_eq!(removal.shift, None);
    }

    #[test]
    fn test_remove_unknown_part_is_integrity_error() {
        assert_eq!(remove(&episode(3), 42), Err(PositionError::UnknownPart(42)));
    }

    #[test]
    fn test_move_second_of_two_to_front() {
        // A at 0, B at 1; move B to 0
        let siblings = vec![Slot::new(10, 0), Slot::new(20, 1)];
        let outcome = move_to(&siblings, 20, 0).unwrap();

        let Move::Moved { from, to, shift } = outcome else {
            panic!("expected a move, got {:?}", outcome);
        };
        assert_eq!((from, to), (1, 0));

        let after: Vec<Slot> = apply(&siblings, Some(shift))
            .into_iter()
            .map(|s| if s.part_id == 20 { Slot::new(20, to) } else { s })
            .collect();
        assert_eq!(positions_by_id(&after), vec![(10, 1), (20, 0)]);
    }

    #[rstest]
    #[case::earlier(4, 1, vec![(1, 0), (2, 2), (3, 3), (4, 1), (5, 4)])]
    #[case::later(2, 3, vec![(1, 0), (2, 3), (3, 1), (4, 2), (5, 4)])]
    #[case::to_end(1, 99, vec![(1, 4), (2, 0), (3, 1), (4, 2), (5, 3)])]
    #[case::to_front(5, 0, vec![(1, 1), (2, 2), (3, 3), (4, 4), (5, 0)])]
    fn test_move_keeps_contiguity(
        #[case] part_id: i64,
        #[case] requested: i64,
        #[case] expected: Vec<(i64, i64)>,
    ) {
        let siblings = episode(5);
        let outcome = move_to(&siblings, part_id, requested).unwrap();
        let Move::Moved { to, shift, .. } = outcome else {
            panic!("expected a move, got {:?}", outcome);
        };

        let after: Vec<Slot> = apply(&siblings, Some(shift))
            .into_iter()
            .map(|s| if s.part_id == part_id { Slot::new(part_id, to) } else { s })
            .collect();
        assert_eq!(positions_by_id(&after), expected);
        verify_contiguous(after.iter().map(|s| s.position)).unwrap();
    }

    #[test]
    fn test_move_to_current_position_is_unchanged() {
        assert_eq!(
            move_to(&episode(3), 2, 1).unwrap(),
            Move::Unchanged { position: 1 }
        );
    }

    #[test]
    fn test_move_last_past_end_is_unchanged() {
        // clamps to N - 1, which is where the part already is
        assert_eq!(
            move_to(&episode(3), 3, 10).unwrap(),
            Move::Unchanged { position: 2 }
        );
    }

    #[test]
    fn test_move_unknown_part() {
        assert_eq!(move_to(&episode(3), 9, 0), Err(PositionError::UnknownPart(9)));
    }

    #[test]
    fn test_renumber_closes_gaps_in_relative_order() {
        let siblings = vec![Slot::new(1, 4), Slot::new(2, 1), Slot::new(3, 9)];
        let assignments = renumber(&siblings);
        let summary: Vec<(i64, i64, i64)> =
            assignments.iter().map(|a| (a.part_id, a.from, a.to)).collect();
        assert_eq!(summary, vec![(2, 1, 0), (1, 4, 1), (3, 9, 2)]);
        assert!(assignments.iter().all(Assignment::is_change));
    }

    #[test]
    fn test_renumber_breaks_ties_by_id() {
        let siblings = vec![Slot::new(8, 0), Slot::new(3, 0)];
        let order: Vec<i64> = renumber(&siblings).iter().map(|a| a.part_id).collect();
        assert_eq!(order, vec![3, 8]);
    }

    #[test]
    fn test_renumber_contiguous_episode_changes_nothing() {
        assert!(renumber(&episode(4)).iter().all(|a| !a.is_change()));
    }

    #[rstest]
    #[case(vec![], Ok(()))]
    #[case(vec![2, 0, 1], Ok(()))]
    #[case(vec![0, 2], Err(PositionError::Gap(1)))]
    #[case(vec![1], Err(PositionError::Gap(0)))]
    #[case(vec![0, 1, 1], Err(PositionError::Duplicate(1)))]
    #[case(vec![-1, 0], Err(PositionError::NegativePosition(-1)))]
    fn test_verify_contiguous(#[case] positions: Vec<i64>, #[case] expected: Result<(), PositionError>) {
        assert_eq!(verify_contiguous(positions), expected);
    }
}
