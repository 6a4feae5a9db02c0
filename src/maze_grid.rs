use crate::{
    orthogonal_neighbors, MazeError, MIN_DIMENSION, PASSAGE_SYMBOL, UNVISITED_SYMBOL, WALL_SYMBOL,
};
use core::fmt;
use grid_util::point::Point;
use itertools::Itertools;
use petgraph::unionfind::UnionFind;

/// State of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Unvisited,
    Wall,
    Passage,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Unvisited => UNVISITED_SYMBOL,
            Cell::Wall => WALL_SYMBOL,
            Cell::Passage => PASSAGE_SYMBOL,
        }
    }
}

/// Rectangular grid of [Cell] states addressed by `(x, y)` with `0 <= x < width` and
/// `0 <= y < height`. Stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl MazeGrid {
    /// Allocates a `width` x `height` grid with every cell [Cell::Unvisited]. Both sides must be
    /// at least [MIN_DIMENSION] so that an interior seed fits inside a border.
    pub fn new(width: usize, height: usize) -> Result<MazeGrid, MazeError> {
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(MazeError::configuration(format!(
                "grid of {width}x{height} is smaller than {MIN_DIMENSION}x{MIN_DIMENSION}"
            )));
        }
        Ok(MazeGrid {
            width,
            height,
            cells: vec![Cell::Unvisited; width * height],
        })
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn in_bounds(&self, point: &Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }
    /// True if the point lies on the outermost ring of the grid.
    pub fn on_border(&self, point: &Point) -> bool {
        self.in_bounds(point)
            && (point.x == 0
                || point.y == 0
                || point.x as usize == self.width - 1
                || point.y as usize == self.height - 1)
    }
    /// The four axis-adjacent coordinates (east, west, north, south), unfiltered.
    pub fn orthogonal_neighbors(&self, point: &Point) -> [Point; 4] {
        orthogonal_neighbors(point)
    }
    fn ix(&self, point: &Point) -> usize {
        point.y as usize * self.width + point.x as usize
    }
    /// State of the cell, or [None] when the point is off the grid.
    pub fn get(&self, point: &Point) -> Option<Cell> {
        if self.in_bounds(point) {
            Some(self.cells[self.ix(point)])
        } else {
            None
        }
    }
    /// True if the point is on the grid and holds `cell`.
    pub fn is(&self, point: &Point, cell: Cell) -> bool {
        self.get(point) == Some(cell)
    }
    pub(crate) fn set(&mut self, point: &Point, cell: Cell) {
        debug_assert!(self.in_bounds(point));
        let ix = self.ix(point);
        self.cells[ix] = cell;
    }
    /// Every coordinate of the grid in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        (0..self.height as i32)
            .cartesian_product(0..self.width as i32)
            .map(|(y, x)| Point::new(x, y))
    }
    /// Number of orthogonal neighbours currently marked [Cell::Passage].
    pub fn passage_neighbor_count(&self, point: &Point) -> usize {
        orthogonal_neighbors(point)
            .iter()
            .filter(|p| self.is(p, Cell::Passage))
            .count()
    }
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }
    pub fn passage_count(&self) -> usize {
        self.count(Cell::Passage)
    }
    /// Number of unordered Passage-Passage pairs that are orthogonally adjacent.
    pub fn passage_edges(&self) -> usize {
        self.points()
            .filter(|p| self.is(p, Cell::Passage))
            .map(|p| {
                [Point::new(p.x + 1, p.y), Point::new(p.x, p.y + 1)]
                    .iter()
                    .filter(|n| self.is(n, Cell::Passage))
                    .count()
            })
            .sum()
    }
    /// Border cells that are not walls. In a finished maze these are exactly the start and goal.
    pub fn open_border_cells(&self) -> Vec<Point> {
        self.points()
            .filter(|p| self.on_border(p) && !self.is(p, Cell::Wall))
            .collect()
    }
    /// Checks that the passages form a single tree: connected, and one fewer adjacency than
    /// there are passages.
    pub fn is_perfect(&self) -> bool {
        let passages = self.passage_count();
        if passages == 0 {
            return false;
        }
        if self.passage_edges() != passages - 1 {
            return false;
        }
        let mut components = UnionFind::new(self.cells.len());
        for p in self.points().filter(|p| self.is(p, Cell::Passage)) {
            for n in [Point::new(p.x + 1, p.y), Point::new(p.x, p.y + 1)] {
                if self.is(&n, Cell::Passage) {
                    components.union(self.ix(&p), self.ix(&n));
                }
            }
        }
        self.points()
            .filter(|p| self.is(p, Cell::Passage))
            .map(|p| components.find(self.ix(&p)))
            .all_equal()
    }
    /// One string per row, using [WALL_SYMBOL], [PASSAGE_SYMBOL] and [UNVISITED_SYMBOL].
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
