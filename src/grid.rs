use std::fmt;

use thiserror::Error;

/// Offsets of the eight cells surrounding a cell. The cell itself is never part of its own
/// neighbourhood.
const NEIGHBORHOOD: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    Empty { width: usize, height: usize },

    #[error("Cell ({x}, {y}) is outside of the {width}x{height} grid")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// A `width` x `height` board of cells for a single generation.
///
/// Cells are stored row-major in one flat buffer, so cell `(x, y)` lives at `y * width + x`. The
/// dimensions are fixed once the grid is created.
///
/// Accessors take coordinates that are already inside the grid. Wrapping is only ever applied when
/// looking at a neighbourhood, where the board is treated as a torus: walking off one edge comes
/// back in from the opposite one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: Vec<bool>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Create a grid with every cell dead
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }

        Ok(Self {
            cells: vec![false; width * height],
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `other` has the same dimensions as `self`
    pub fn same_shape(&self, other: &Grid) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool, GridError> {
        self.check(x, y)?;

        Ok(self.cells[self.xy_from(x, y)])
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) -> Result<(), GridError> {
        self.check(x, y)?;

        let i = self.xy_from(x, y);
        self.cells[i] = alive;

        Ok(())
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Map any signed coordinate onto the torus.
    pub fn wrap(&self, x: isize, y: isize) -> (usize, usize) {
        (
            x.rem_euclid(self.width as isize) as usize,
            y.rem_euclid(self.height as isize) as usize,
        )
    }

    /// Number of live cells among the eight toroidal neighbours of `(x, y)`.
    pub fn count_live_neighbors(&self, x: usize, y: usize) -> Result<u8, GridError> {
        self.check(x, y)?;

        Ok(self.neighbors_unchecked(x, y))
    }

    /// Total number of live cells.
    pub fn count_live(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Coordinates of every live cell, in row-major order.
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(n, _)| self.xy_to(n))
    }

    /// Every cell as `(x, y, alive)`, in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        self.cells.iter().enumerate().map(|(n, &c)| {
            let (x, y) = self.xy_to(n);
            (x, y, c)
        })
    }

    // The engine walks every cell of the grid, so the range check is hoisted out of its loop.
    pub(crate) fn alive_unchecked(&self, x: usize, y: usize) -> bool {
        self.cells[self.xy_from(x, y)]
    }

    pub(crate) fn set_unchecked(&mut self, x: usize, y: usize, alive: bool) {
        let i = self.xy_from(x, y);
        self.cells[i] = alive;
    }

    // (c + d + dim) % dim, with d in [-1, 1]
    pub(crate) fn neighbors_unchecked(&self, x: usize, y: usize) -> u8 {
        let mut n = 0;

        for (dx, dy) in NEIGHBORHOOD {
            let nx = (x as isize + dx + self.width as isize) as usize % self.width;
            let ny = (y as isize + dy + self.height as isize) as usize % self.height;

            if self.cells[self.xy_from(nx, ny)] {
                n += 1;
            }
        }

        n
    }

    fn check(&self, x: usize, y: usize) -> Result<(), GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(())
    }

    fn xy_to(&self, n: usize) -> (usize, usize) {
        (n % self.width, n / self.width)
    }

    fn xy_from(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("live", &self.count_live())
            .finish()
    }
}

/// Rows of `#` (alive) and `.` (dead), separated by newlines.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.width).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }

            for &c in row {
                f.write_str(if c { "#" } else { "." })?;
            }
        }

        Ok(())
    }
}
