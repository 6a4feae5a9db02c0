//! Randomized Prim maze carving.
//!
//! Starting from a single interior seed, walls adjacent to the carved region are kept in a
//! frontier. A frontier wall picked at random becomes a passage only if it extends the carved
//! region along a straight line into untouched space and touches fewer than two passages, so
//! the passages always form a spanning tree. Once the frontier is empty, leftover pockets are
//! walled in and two border cells are opened as start and goal.
use crate::{orthogonal_neighbors, Cell, MazeError, MazeGrid};
use grid_util::point::Point;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

/// Phase of an in-progress generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorState {
    Seeding,
    Carving,
    Finalized,
}

/// A finished maze. The grid contains no [Cell::Unvisited] cells and its border is walled except
/// at `start` and `goal`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    pub grid: MazeGrid,
    pub start: Point,
    pub goal: Point,
}

/// Generator settings. With `seed_cell` left at [None] a uniformly random interior cell is used.
#[derive(Clone, Debug, Default)]
pub struct MazeGenerator {
    pub seed_cell: Option<Point>,
}

impl MazeGenerator {
    pub fn new() -> MazeGenerator {
        MazeGenerator { seed_cell: None }
    }
    /// Pins the cell carving starts from. It has to be an interior cell.
    pub fn with_seed_cell(seed_cell: Point) -> MazeGenerator {
        MazeGenerator {
            seed_cell: Some(seed_cell),
        }
    }
    /// Allocates a fresh grid and generates a maze on it.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<Maze, MazeError> {
        self.generate_on(MazeGrid::new(width, height)?, rng)
    }
    /// Generates a maze on an existing, fully unvisited grid.
    pub fn generate_on<R: Rng + ?Sized>(
        &self,
        grid: MazeGrid,
        rng: &mut R,
    ) -> Result<Maze, MazeError> {
        self.begin(grid, rng)?.finish(rng)
    }
    /// Wraps `grid` in a [MazeBuilder] in the [GeneratorState::Seeding] phase. Nothing is placed
    /// on the grid until the first [step](MazeBuilder::step).
    pub fn builder(&self, grid: MazeGrid) -> MazeBuilder {
        MazeBuilder {
            grid,
            frontier: Vec::new(),
            state: GeneratorState::Seeding,
            seed: self.seed_cell,
            endpoints: None,
            iterations: 0,
        }
    }
    /// Seeds the grid and returns a [MazeBuilder] in the [GeneratorState::Carving] phase, which
    /// can be advanced one frontier entry at a time.
    pub fn begin<R: Rng + ?Sized>(
        &self,
        grid: MazeGrid,
        rng: &mut R,
    ) -> Result<MazeBuilder, MazeError> {
        let mut builder = self.builder(grid);
        builder.step(rng)?;
        Ok(builder)
    }
}

/// Border used when searching for an opening.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    TopBottom,
    LeftRight,
}

impl Edge {
    fn opposite(self) -> Edge {
        match self {
            Edge::TopBottom => Edge::LeftRight,
            Edge::LeftRight => Edge::TopBottom,
        }
    }
}

/// True if exactly one of the pair is a passage and the other is still unvisited. Off-grid
/// points never match.
fn extends_passage(grid: &MazeGrid, a: &Point, b: &Point) -> bool {
    (grid.is(a, Cell::Passage) && grid.is(b, Cell::Unvisited))
        || (grid.is(a, Cell::Unvisited) && grid.is(b, Cell::Passage))
}

/// In-progress generation over an owned grid.
#[derive(Clone, Debug)]
pub struct MazeBuilder {
    grid: MazeGrid,
    frontier: Vec<Point>,
    state: GeneratorState,
    seed: Option<Point>,
    endpoints: Option<(Point, Point)>,
    iterations: usize,
}

impl MazeBuilder {
    pub fn state(&self) -> GeneratorState {
        self.state
    }
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }
    /// The cell carving starts from. [None] while seeding is pending and no cell was pinned.
    pub fn seed(&self) -> Option<Point> {
        self.seed
    }
    /// Walls currently awaiting evaluation.
    pub fn frontier(&self) -> &[Point] {
        &self.frontier
    }

    /// Advances the state machine by one unit of work: places the seed, evaluates one random
    /// frontier wall while carving, or finalizes the maze once the frontier is exhausted. Does
    /// nothing when already finalized.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GeneratorState, MazeError> {
        match self.state {
            GeneratorState::Seeding => self.plant_seed(rng)?,
            GeneratorState::Carving if !self.frontier.is_empty() => {
                let ix = rng.gen_range(0..self.frontier.len());
                let candidate = self.frontier.swap_remove(ix);
                self.iterations += 1;
                self.carve(&candidate);
            }
            GeneratorState::Carving => self.finalize(rng)?,
            GeneratorState::Finalized => {}
        }
        Ok(self.state)
    }

    /// Runs the remaining steps and hands out the finished maze.
    pub fn finish<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<Maze, MazeError> {
        while self.step(rng)? != GeneratorState::Finalized {}
        let (start, goal) = self
            .endpoints
            .ok_or_else(|| MazeError::configuration("maze was finalized without endpoints"))?;
        Ok(Maze {
            grid: self.grid,
            start,
            goal,
        })
    }

    /// Turns the pinned or a random interior cell into the first passage and walls in its
    /// neighbours.
    fn plant_seed<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MazeError> {
        let seed = match self.seed {
            Some(seed) => {
                if !self.grid.in_bounds(&seed) || self.grid.on_border(&seed) {
                    return Err(MazeError::configuration(format!(
                        "seed cell {seed} is not an interior cell"
                    )));
                }
                seed
            }
            None => Point::new(
                rng.gen_range(1..self.grid.width() as i32 - 1),
                rng.gen_range(1..self.grid.height() as i32 - 1),
            ),
        };
        self.grid.set(&seed, Cell::Passage);
        self.visit_neighbors(&seed);
        if self.frontier.is_empty() {
            return Err(MazeError::configuration(format!(
                "no walls surround seed cell {seed}"
            )));
        }
        info!(
            "Seeded {}x{} maze at {}",
            self.grid.width(),
            self.grid.height(),
            seed
        );
        self.seed = Some(seed);
        self.state = GeneratorState::Carving;
        Ok(())
    }

    /// Marks every unvisited neighbour as a wall and queues it for evaluation.
    fn visit_neighbors(&mut self, point: &Point) {
        for n in orthogonal_neighbors(point) {
            if self.grid.is(&n, Cell::Unvisited) {
                self.grid.set(&n, Cell::Wall);
                self.frontier.push(n);
            }
        }
    }

    fn carve(&mut self, candidate: &Point) -> bool {
        let [east, west, north, south] = orthogonal_neighbors(candidate);
        let extends = extends_passage(&self.grid, &west, &east)
            || extends_passage(&self.grid, &north, &south);
        if extends && self.grid.passage_neighbor_count(candidate) < 2 {
            self.grid.set(candidate, Cell::Passage);
            self.visit_neighbors(candidate);
            true
        } else {
            false
        }
    }

    fn finalize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MazeError> {
        debug!(
            "Carving finished after {} frontier evaluations",
            self.iterations
        );
        for p in self.grid.points().collect::<Vec<_>>() {
            if self.grid.is(&p, Cell::Unvisited) {
                self.grid.set(&p, Cell::Wall);
            }
        }

        let first_edge = if rng.gen_bool(0.5) {
            Edge::TopBottom
        } else {
            Edge::LeftRight
        };
        let (first, first_edge) = self
            .pick_opening(first_edge, None, rng)
            .map(|p| (p, first_edge))
            .or_else(|| {
                self.pick_opening(first_edge.opposite(), None, rng)
                    .map(|p| (p, first_edge.opposite()))
            })
            .ok_or_else(|| MazeError::configuration("no border cell can open onto a passage"))?;
        let second = self
            .pick_opening(first_edge.opposite(), Some(&first), rng)
            .or_else(|| self.pick_opening(first_edge, Some(&first), rng))
            .ok_or_else(|| MazeError::configuration("only one border cell can be opened"))?;

        self.grid.set(&first, Cell::Passage);
        self.grid.set(&second, Cell::Passage);
        let (start, goal) = if rng.gen_bool(0.5) {
            (first, second)
        } else {
            (second, first)
        };
        info!("Maze finalized with start {} and goal {}", start, goal);
        self.endpoints = Some((start, goal));
        self.state = GeneratorState::Finalized;
        Ok(())
    }

    /// Border cells on `edge` (corners excluded) whose single interior neighbour is a passage.
    fn openings(&self, edge: Edge) -> Vec<Point> {
        let w = self.grid.width() as i32;
        let h = self.grid.height() as i32;
        let pairs = match edge {
            Edge::TopBottom => (1..w - 1)
                .flat_map(|x| {
                    [
                        (Point::new(x, 0), Point::new(x, 1)),
                        (Point::new(x, h - 1), Point::new(x, h - 2)),
                    ]
                })
                .collect::<Vec<_>>(),
            Edge::LeftRight => (1..h - 1)
                .flat_map(|y| {
                    [
                        (Point::new(0, y), Point::new(1, y)),
                        (Point::new(w - 1, y), Point::new(w - 2, y)),
                    ]
                })
                .collect::<Vec<_>>(),
        };
        pairs
            .into_iter()
            .filter(|(_, inner)| self.grid.is(inner, Cell::Passage))
            .map(|(border, _)| border)
            .collect()
    }

    fn pick_opening<R: Rng + ?Sized>(
        &self,
        edge: Edge,
        exclude: Option<&Point>,
        rng: &mut R,
    ) -> Option<Point> {
        // Two adjacent openings would join into a loop around the border
        let candidates = self
            .openings(edge)
            .into_iter()
            .filter(|p| exclude.map_or(true, |e| (p.x - e.x).abs() + (p.y - e.y).abs() > 1))
            .collect::<Vec<_>>();
        candidates.choose(rng).copied()
    }
}
