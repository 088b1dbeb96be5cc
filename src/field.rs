use crate::cell::{Cell, CellContent, Position};

/// Handle to one cell of a [`Field`].
///
/// Handles are only minted by the field that owns the cell, so a snake body
/// made of handles never duplicates cell state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct CellId(usize);

/// Square N×N grid owning every [`Cell`].
#[derive(Debug, Clone)]
pub struct Field {
    dimension: u16,
    cells: Vec<Cell>,
}

impl Field {
    /// Allocates a `dimension`×`dimension` grid of empty cells.
    #[must_use]
    pub fn new(dimension: u16) -> Self {
        let side = i32::from(dimension);
        let mut cells = Vec::with_capacity(usize::from(dimension) * usize::from(dimension));
        for x in 0..side {
            for y in 0..side {
                cells.push(Cell::new(Position { x, y }));
            }
        }

        Self { dimension, cells }
    }

    #[must_use]
    pub fn dimension(&self) -> u16 {
        self.dimension
    }

    /// Returns the handle for `position`, or `None` outside the grid.
    #[must_use]
    pub fn cell_id(&self, position: Position) -> Option<CellId> {
        if !position.is_within(self.dimension) {
            return None;
        }

        let side = usize::from(self.dimension);
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        Some(CellId(x * side + y))
    }

    /// Returns the cell behind `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` was minted by a larger field.
    #[must_use]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    /// Looks a cell up by coordinates.
    #[must_use]
    pub fn cell_at(&self, position: Position) -> Option<&Cell> {
        self.cell_id(position).map(|id| self.cell(id))
    }

    /// Iterates all cells, column by column.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Handles of every cell whose content is [`CellContent::Empty`].
    pub fn empty_cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(index, _)| CellId(index))
    }

    /// Number of cells currently holding `content`.
    #[must_use]
    pub fn count(&self, content: CellContent) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.content() == content)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::Field;
    use crate::cell::{CellContent, Position};

    #[test]
    fn every_coordinate_has_exactly_one_empty_cell() {
        let field = Field::new(6);

        assert_eq!(field.cells().count(), 36);
        assert_eq!(field.count(CellContent::Empty), 36);

        for x in 0..6 {
            for y in 0..6 {
                let position = Position { x, y };
                let cell = field.cell_at(position).expect("cell should exist");
                assert_eq!(cell.position(), position);
            }
        }
    }

    #[test]
    fn lookups_outside_the_grid_return_none() {
        let field = Field::new(5);

        assert!(field.cell_id(Position { x: 5, y: 0 }).is_none());
        assert!(field.cell_id(Position { x: 0, y: -1 }).is_none());
        assert!(field.cell_at(Position { x: 4, y: 4 }).is_some());
    }

    #[test]
    #[should_panic]
    fn handle_from_a_larger_field_is_rejected() {
        let large = Field::new(10);
        let small = Field::new(5);
        let far_corner = large
            .cell_id(Position { x: 9, y: 9 })
            .expect("in bounds of the large field");

        let _ = small.cell(far_corner);
    }

    #[test]
    fn empty_cells_skip_occupied_ones() {
        let mut field = Field::new(5);
        let food = field.cell_id(Position { x: 1, y: 2 }).expect("in bounds");
        let snake = field.cell_id(Position { x: 3, y: 3 }).expect("in bounds");
        field.cell_mut(food).put_food();
        field.cell_mut(snake).put_snake();

        let empty: Vec<_> = field.empty_cells().collect();
        assert_eq!(empty.len(), 23);
        assert!(!empty.contains(&food));
        assert!(!empty.contains(&snake));
        assert_eq!(field.count(CellContent::Food), 1);
        assert_eq!(field.count(CellContent::Snake), 1);
    }
}
