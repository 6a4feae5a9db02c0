//! # maze_pathfinding
//!
//! Builds [perfect mazes](https://en.wikipedia.org/wiki/Maze_generation_algorithm) on a
//! rectangular grid using
//! [randomized Prim](https://en.wikipedia.org/wiki/Maze_generation_algorithm#Iterative_randomized_Prim's_algorithm_(without_stack,_without_sets))
//! spanning-tree carving, then finds a shortest route between the two border openings with
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) over a weighted obstruction map.
//!
//! The pipeline is
//! [MazeGrid] → [MazeGenerator] → [WeightedGrid] → [PathFinder] → [retrace]:
//!
//! ```no_run
//! use maze_pathfinding::{retrace, MazeGenerator, PathFinder, WeightedGrid};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let maze = MazeGenerator::new().generate(31, 15, &mut rng).unwrap();
//! let weighted = WeightedGrid::from_maze(&maze.grid);
//! let tree = PathFinder::new().search(&weighted, maze.start, maze.goal);
//! let path = retrace(&tree, maze.start, maze.goal).unwrap();
//! println!("{} steps from {} to {}", path.len(), maze.start, maze.goal);
//! ```
//!
//! Randomness is always injected as a [rand::Rng] so that generation is reproducible from a
//! seed. Nothing here is threaded; finished grids are read-only and can be shared freely.
mod astar;
mod error;
mod generator;
mod maze_grid;
mod retrace;
mod solver;
mod weighted_grid;

pub use astar::SearchTree;
pub use error::MazeError;
pub use generator::{GeneratorState, Maze, MazeBuilder, MazeGenerator};
pub use grid_util::point::Point;
pub use maze_grid::{Cell, MazeGrid};
pub use retrace::{path_cost, retrace};
pub use solver::{Heuristic, PathFinder, SearchGraph};
pub use weighted_grid::WeightedGrid;

/// Smallest accepted grid side: one interior cell plus a border on both sides.
pub const MIN_DIMENSION: usize = 3;
/// Text symbol for a [Cell::Wall].
pub const WALL_SYMBOL: char = '#';
/// Text symbol for a [Cell::Passage].
pub const PASSAGE_SYMBOL: char = ' ';
/// Text symbol for a [Cell::Unvisited] cell, only seen while a maze is being carved.
pub const UNVISITED_SYMBOL: char = 'u';
/// Traversal cost of a location without an explicit weight.
pub const DEFAULT_WEIGHT: u32 = 1;

/// The four axis-adjacent coordinates in east, west, north, south order. North is `y - 1`.
/// Not filtered by bounds.
pub fn orthogonal_neighbors(point: &Point) -> [Point; 4] {
    [
        Point::new(point.x + 1, point.y),
        Point::new(point.x - 1, point.y),
        Point::new(point.x, point.y - 1),
        Point::new(point.x, point.y + 1),
    ]
}
