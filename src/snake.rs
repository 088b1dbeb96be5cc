use std::collections::VecDeque;

use crate::cell::{CellContent, Position};
use crate::field::{CellId, Field};

/// Ordered snake body made of handles into a [`Field`].
///
/// The front of the body is the tail and the back is the head. Occupancy
/// lives in the field's cells; every operation marks or clears the cell it
/// touches so the two never disagree.
#[derive(Debug, Clone, Default)]
pub struct Snake {
    body: VecDeque<CellId>,
}

impl Snake {
    /// Creates an empty snake; the engine spawns it when the game starts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the first segment on `cell`.
    ///
    /// # Panics
    ///
    /// Panics when the snake was already spawned or `cell` is not empty.
    pub(crate) fn spawn(&mut self, field: &mut Field, cell: CellId) {
        assert!(self.body.is_empty(), "snake spawned twice");
        assert_eq!(
            field.cell(cell).content(),
            CellContent::Empty,
            "snake spawned on an occupied cell"
        );

        field.cell_mut(cell).put_snake();
        self.body.push_back(cell);
    }

    /// Advances onto `cell` keeping the same length.
    ///
    /// The new head is marked before the tail is released. A one-segment
    /// snake therefore ends up on `cell` alone.
    pub(crate) fn move_to(&mut self, field: &mut Field, cell: CellId) {
        field.cell_mut(cell).put_snake();
        if let Some(tail) = self.body.pop_front() {
            field.cell_mut(tail).clear();
        }
        self.body.push_back(cell);
    }

    /// Advances onto `cell` and keeps the tail, growing by one.
    pub(crate) fn eat_in(&mut self, field: &mut Field, cell: CellId) {
        field.cell_mut(cell).put_snake();
        self.body.push_back(cell);
    }

    /// Returns the head handle, or `None` before spawn.
    #[must_use]
    pub fn head(&self) -> Option<CellId> {
        self.body.back().copied()
    }

    /// Returns the tail handle, or `None` before spawn.
    #[must_use]
    pub fn tail(&self) -> Option<CellId> {
        self.body.front().copied()
    }

    /// Returns the coordinates of the head, or `None` before spawn.
    #[must_use]
    pub fn head_position(&self, field: &Field) -> Option<Position> {
        self.head().map(|head| field.cell(head).position())
    }

    /// Returns true if any segment is the given cell.
    #[must_use]
    pub fn occupies(&self, cell: CellId) -> bool {
        self.body.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates body segments from tail to head.
    pub fn segments(&self) -> impl Iterator<Item = CellId> + '_ {
        self.body.iter().copied()
    }
}
