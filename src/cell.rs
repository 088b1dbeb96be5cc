/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside a square field of `dimension`.
    #[must_use]
    pub fn is_within(self, dimension: u16) -> bool {
        let upper = i32::from(dimension);
        self.x >= 0 && self.y >= 0 && self.x < upper && self.y < upper
    }

    /// Returns this position wrapped onto a square torus of `dimension`.
    #[must_use]
    pub fn wrapped(self, dimension: u16) -> Self {
        Self {
            x: wrap_axis(self.x, i32::from(dimension)),
            y: wrap_axis(self.y, i32::from(dimension)),
        }
    }
}

fn wrap_axis(value: i32, upper_bound: i32) -> i32 {
    let wrapped = value % upper_bound;
    if wrapped < 0 {
        wrapped + upper_bound
    } else {
        wrapped
    }
}

/// What currently occupies a cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum CellContent {
    #[default]
    Empty,
    Snake,
    Food,
}

/// One addressable grid location.
///
/// The position is fixed at creation; only the content changes.
#[derive(Debug, Clone)]
pub struct Cell {
    position: Position,
    content: CellContent,
}

impl Cell {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            position,
            content: CellContent::Empty,
        }
    }

    pub fn put_snake(&mut self) {
        self.content = CellContent::Snake;
    }

    pub fn put_food(&mut self) {
        self.content = CellContent::Food;
    }

    pub fn clear(&mut self) {
        self.content = CellContent::Empty;
    }

    #[must_use]
    pub fn content(&self) -> CellContent {
        self.content
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content == CellContent::Empty
    }
}
