// ABOUTME: Position reconciliation for the parts of an episode
// ABOUTME: Pure computation of shifts and assignments that keep positions contiguous

pub mod reconciler;
pub mod types;

// Re-export main types
pub use reconciler::{insert, move_to, remove, renumber, verify_contiguous};
pub use types::{Assignment, Insertion, Move, PositionError, PositionShift, Removal, Slot};
