use crate::solver::SearchGraph;
use crate::{orthogonal_neighbors, Cell, MazeError, MazeGrid, DEFAULT_WEIGHT, WALL_SYMBOL};
use core::fmt;
use fxhash::FxHashMap;
use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use std::iter;

/// [WeightedGrid] is the view the search runs on: a [BoolGrid] of obstructed ([true]) and free
/// ([false]) locations plus optional per-location traversal weights. Connected components of the
/// free locations are kept in a [UnionFind] so that unreachable goals are rejected without
/// flooding the grid.
#[derive(Clone, Debug)]
pub struct WeightedGrid {
    obstructions: BoolGrid,
    weights: FxHashMap<Point, u32>,
    components: UnionFind<usize>,
}

impl WeightedGrid {
    /// An unobstructed grid with uniform cost.
    pub fn new(width: usize, height: usize) -> Result<WeightedGrid, MazeError> {
        Self::from_obstructions(width, height, iter::empty(), iter::empty())
    }

    /// Obstructs every cell of the maze that is a [Cell::Wall]. No weights are set.
    pub fn from_maze(maze: &MazeGrid) -> WeightedGrid {
        let mut obstructions = BoolGrid::new(maze.width(), maze.height(), false);
        for p in maze.points() {
            if maze.is(&p, Cell::Wall) {
                obstructions.set(p.x as usize, p.y as usize, true);
            }
        }
        Self::with_components(obstructions)
    }

    /// Builds the grid from an explicit wall list and weight overrides. Every location has to
    /// lie on the grid and every weight has to be at least 1.
    pub fn from_obstructions<O, W>(
        width: usize,
        height: usize,
        obstructions: O,
        weights: W,
    ) -> Result<WeightedGrid, MazeError>
    where
        O: IntoIterator<Item = Point>,
        W: IntoIterator<Item = (Point, u32)>,
    {
        if width == 0 || height == 0 {
            return Err(MazeError::configuration(format!(
                "weighted grid of {width}x{height} has no cells"
            )));
        }
        let mut blocked = BoolGrid::new(width, height, false);
        for p in obstructions {
            if !Self::contains(width, height, &p) {
                return Err(MazeError::configuration(format!(
                    "obstruction {p} lies outside the {width}x{height} grid"
                )));
            }
            blocked.set(p.x as usize, p.y as usize, true);
        }
        let mut grid = Self::with_components(blocked);
        for (p, weight) in weights {
            grid.set_weight(p, weight)?;
        }
        Ok(grid)
    }

    /// Parses text rows where [WALL_SYMBOL] is a wall and any other character a passage. Rows are
    /// addressed row-major, so the character at column `x` of row `y` is location `(x, y)`. The
    /// grid is as wide as the longest row; shorter rows are open past their end.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<WeightedGrid, MazeError> {
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let walls = rows.iter().enumerate().flat_map(|(y, row)| {
            row.as_ref()
                .chars()
                .enumerate()
                .filter(|(_, c)| *c == WALL_SYMBOL)
                .map(move |(x, _)| Point::new(x as i32, y as i32))
        });
        let grid = Self::from_obstructions(width, rows.len(), walls, iter::empty())?;
        info!(
            "Loaded {}x{} maze with {} walls",
            grid.width(),
            grid.height(),
            grid.obstruction_count()
        );
        Ok(grid)
    }

    /// Same as [from_rows](Self::from_rows) on the lines of `text`.
    pub fn from_text(text: &str) -> Result<WeightedGrid, MazeError> {
        Self::from_rows(&text.lines().collect::<Vec<_>>())
    }

    fn with_components(obstructions: BoolGrid) -> WeightedGrid {
        let mut grid = WeightedGrid {
            components: UnionFind::new(0),
            obstructions,
            weights: FxHashMap::default(),
        };
        grid.generate_components();
        grid
    }

    fn contains(width: usize, height: usize, point: &Point) -> bool {
        point.x >= 0 && point.y >= 0 && (point.x as usize) < width && (point.y as usize) < height
    }

    fn ix(&self, point: &Point) -> usize {
        point.y as usize * self.width() + point.x as usize
    }

    /// Links every pair of orthogonally adjacent free locations into one component.
    fn generate_components(&mut self) {
        let w = self.width() as i32;
        let h = self.height() as i32;
        self.components = UnionFind::new(self.width() * self.height());
        for x in 0..w {
            for y in 0..h {
                let point = Point::new(x, y);
                if !self.traversable(&point) {
                    continue;
                }
                let parent_ix = self.ix(&point);
                for n in [Point::new(x + 1, y), Point::new(x, y + 1)] {
                    if self.in_bounds(&n) && self.traversable(&n) {
                        let ix = self.ix(&n);
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }

    pub fn width(&self) -> usize {
        self.obstructions.width()
    }
    pub fn height(&self) -> usize {
        self.obstructions.height()
    }
    pub fn in_bounds(&self, point: &Point) -> bool {
        Self::contains(self.width(), self.height(), point)
    }
    /// False only for locations in the obstruction set.
    pub fn traversable(&self, point: &Point) -> bool {
        !(self.in_bounds(point) && self.obstructions.get(point.x as usize, point.y as usize))
    }
    pub fn obstruction_count(&self) -> usize {
        (0..self.height())
            .map(|y| {
                (0..self.width())
                    .filter(|&x| self.obstructions.get(x, y))
                    .count()
            })
            .sum()
    }

    /// In-bounds, traversable orthogonal neighbours. On cells where `x + y` is even they come in
    /// south, north, west, east order and otherwise east, west, north, south, which straightens
    /// out paths between equal-cost alternatives.
    pub fn neighbors(&self, point: &Point) -> SmallVec<[Point; 4]> {
        let mut neighbors = orthogonal_neighbors(point);
        if (point.x + point.y).rem_euclid(2) == 0 {
            neighbors.reverse();
        }
        neighbors
            .into_iter()
            .filter(|p| self.in_bounds(p) && self.traversable(p))
            .collect()
    }

    /// Cost of stepping onto `to`: its weight if one was set, [DEFAULT_WEIGHT] otherwise. The
    /// origin does not influence the cost.
    pub fn cost(&self, _from: &Point, to: &Point) -> u32 {
        self.weight(to).unwrap_or(DEFAULT_WEIGHT)
    }
    pub fn weight(&self, point: &Point) -> Option<u32> {
        self.weights.get(point).copied()
    }
    /// Overrides the traversal cost of a location. Weights below 1 are rejected.
    pub fn set_weight(&mut self, point: Point, weight: u32) -> Result<(), MazeError> {
        if weight == 0 {
            return Err(MazeError::configuration(format!(
                "weight of {point} has to be positive"
            )));
        }
        if !self.in_bounds(&point) {
            return Err(MazeError::configuration(format!(
                "weighted location {point} lies outside the grid"
            )));
        }
        self.weights.insert(point, weight);
        Ok(())
    }

    /// Checks if start and goal are free and in the same connected component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        self.in_bounds(start)
            && self.in_bounds(goal)
            && self.traversable(start)
            && self.traversable(goal)
            && self.components.equiv(self.ix(start), self.ix(goal))
    }
}

impl SearchGraph for WeightedGrid {
    type Neighbors = SmallVec<[Point; 4]>;

    fn neighbors(&self, point: &Point) -> Self::Neighbors {
        WeightedGrid::neighbors(self, point)
    }
    fn cost(&self, from: &Point, to: &Point) -> u32 {
        WeightedGrid::cost(self, from, to)
    }
}

impl fmt::Display for WeightedGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height() {
            let row = (0..self.width())
                .map(|x| {
                    if self.obstructions.get(x, y) {
                        WALL_SYMBOL
                    } else {
                        '.'
                    }
                })
                .collect::<String>();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_order_depends_on_parity() {
        let grid = WeightedGrid::new(3, 3).unwrap();
        // (1, 1): x + y even, south north west east
        assert_eq!(
            grid.neighbors(&Point::new(1, 1)).to_vec(),
            vec![
                Point::new(1, 2),
                Point::new(1, 0),
                Point::new(0, 1),
                Point::new(2, 1)
            ]
        );
        // (1, 0): x + y odd, east west north south with north off the grid
        assert_eq!(
            grid.neighbors(&Point::new(1, 0)).to_vec(),
            vec![Point::new(2, 0), Point::new(0, 0), Point::new(1, 1)]
        );
    }

    #[test]
    fn neighbors_skip_obstructions() {
        let grid = WeightedGrid::from_rows(&["#.#", "...", "#.#"]).unwrap();
        assert_eq!(grid.obstruction_count(), 4);
        assert!(!grid.traversable(&Point::new(0, 0)));
        assert!(grid.traversable(&Point::new(1, 0)));
        assert_eq!(
            grid.neighbors(&Point::new(0, 1)).to_vec(),
            vec![Point::new(1, 1)]
        );
    }

    #[test]
    fn cost_defaults_to_one() {
        let mut grid = WeightedGrid::new(4, 4).unwrap();
        grid.set_weight(Point::new(2, 2), 5).unwrap();
        assert_eq!(grid.cost(&Point::new(2, 1), &Point::new(2, 2)), 5);
        assert_eq!(grid.cost(&Point::new(0, 0), &Point::new(2, 2)), 5);
        assert_eq!(grid.cost(&Point::new(2, 2), &Point::new(2, 1)), 1);
        assert!(grid.set_weight(Point::new(1, 1), 0).is_err());
        assert!(grid.set_weight(Point::new(4, 1), 2).is_err());
    }

    #[test]
    fn rejects_off_grid_obstruction() {
        let err = WeightedGrid::from_obstructions(3, 3, [Point::new(3, 0)], iter::empty())
            .unwrap_err();
        assert!(matches!(err, MazeError::Configuration { .. }));
        assert!(WeightedGrid::new(0, 3).is_err());
    }

    #[test]
    fn text_rows_are_row_major() {
        let grid = WeightedGrid::from_text("##\n  #\n").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(!grid.traversable(&Point::new(1, 0)));
        assert!(!grid.traversable(&Point::new(2, 1)));
        assert!(grid.traversable(&Point::new(2, 0)));
        assert!(grid.traversable(&Point::new(0, 1)));
        assert_eq!(grid.to_string(), "##.\n..#\n");
    }

    #[test]
    fn components_split_by_walls() {
        //  .#.
        //  .#.
        let grid = WeightedGrid::from_rows(&[".#.", ".#."]).unwrap();
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(0, 1)));
        assert!(!grid.reachable(&Point::new(0, 0), &Point::new(2, 1)));
        assert!(!grid.reachable(&Point::new(0, 0), &Point::new(1, 0)));
        assert!(!grid.reachable(&Point::new(0, 0), &Point::new(5, 0)));
    }

    #[test]
    fn from_maze_obstructs_walls() {
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(5);
        let maze = crate::MazeGenerator::new()
            .generate(7, 5, &mut rng)
            .unwrap();
        let grid = WeightedGrid::from_maze(&maze.grid);
        for p in maze.grid.points() {
            assert_eq!(grid.traversable(&p), maze.grid.is(&p, Cell::Passage));
        }
        assert!(grid.reachable(&maze.start, &maze.goal));
    }
}
