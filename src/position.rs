use crate::config::{FIELD_HEIGHT, FIELD_WIDTH};

/// A cell of the playfield. `x` counts columns from the left, `y` counts
/// rows from the bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    /// Caller guarantees the cell is on the field.
    pub const fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < FIELD_WIDTH && y < FIELD_HEIGHT);
        Self { x, y }
    }

    /// Signed constructor; `None` for anything off the field.
    pub fn checked(x: i16, y: i16) -> Option<Self> {
        if (0..FIELD_WIDTH as i16).contains(&x) && (0..FIELD_HEIGHT as i16).contains(&y) {
            Some(Self { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    pub fn offset(self, dx: i16, dy: i16) -> Option<Self> {
        Self::checked(self.x as i16 + dx, self.y as i16 + dy)
    }

    pub fn up(self) -> Option<Self> {
        self.offset(0, 1)
    }

    pub fn down(self) -> Option<Self> {
        self.offset(0, -1)
    }

    /// LED matrix coordinates: rows follow the field's rows, columns run
    /// right to left.
    pub const fn matrix_cell(self) -> (u8, u8) {
        (self.y, FIELD_WIDTH - 1 - self.x)
    }
}
