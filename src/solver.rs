use crate::astar::{astar, SearchTree};
use crate::{retrace, MazeError, WeightedGrid};
use grid_util::point::Point;
use log::info;

/// Anything the search can walk: traversable neighbours of a location and the cost of stepping
/// between two of them.
pub trait SearchGraph {
    type Neighbors: IntoIterator<Item = Point>;

    fn neighbors(&self, point: &Point) -> Self::Neighbors;
    fn cost(&self, from: &Point, to: &Point) -> u32;
}

/// Distance estimate towards the goal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Straight-line distance. Never exceeds the grid distance, so it stays admissible for
    /// orthogonal moves costing at least 1.
    #[default]
    Euclidean,
    /// Grid distance `|dx| + |dy|`. Tighter on 4-connected grids, but can produce different
    /// shapes than [Heuristic::Euclidean] once weights are involved.
    Manhattan,
}

impl Heuristic {
    pub fn distance(&self, p1: &Point, p2: &Point) -> f64 {
        let dx = (p1.x - p2.x) as f64;
        let dy = (p1.y - p2.y) as f64;
        match self {
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Manhattan => dx.abs() + dy.abs(),
        }
    }
}

/// A* pathfinder over a [SearchGraph].
#[derive(Clone, Debug)]
pub struct PathFinder {
    pub heuristic: Heuristic,
    /// Scales the heuristic. Above 1.0 the search gets greedier and may return longer paths.
    pub heuristic_factor: f64,
}

impl Default for PathFinder {
    fn default() -> PathFinder {
        PathFinder::new()
    }
}

impl PathFinder {
    pub fn new() -> PathFinder {
        PathFinder {
            heuristic: Heuristic::Euclidean,
            heuristic_factor: 1.0,
        }
    }
    pub fn with_heuristic(heuristic: Heuristic) -> PathFinder {
        PathFinder {
            heuristic,
            ..PathFinder::new()
        }
    }

    /// Runs A* from `start` until `goal` is popped or the frontier is empty. The returned tree
    /// lacks `goal` exactly when no path exists. Step costs are summed as [u64].
    pub fn search<G: SearchGraph>(
        &self,
        graph: &G,
        start: Point,
        goal: Point,
    ) -> SearchTree<Point, u64> {
        astar(
            &start,
            |node| {
                graph
                    .neighbors(node)
                    .into_iter()
                    .map(move |to| (to, u64::from(graph.cost(node, &to))))
                    .collect::<Vec<_>>()
            },
            |point| self.heuristic.distance(point, &goal) * self.heuristic_factor,
            |point| *point == goal,
        )
    }

    /// Searches and reconstructs the route in one go. Goals in a different connected component
    /// than the start are rejected with [MazeError::PathNotFound] before searching.
    pub fn find_path(
        &self,
        grid: &WeightedGrid,
        start: Point,
        goal: Point,
    ) -> Result<Vec<Point>, MazeError> {
        if !grid.reachable(&start, &goal) {
            info!("{} is not reachable from {}", goal, start);
            return Err(MazeError::PathNotFound { start, goal });
        }
        let tree = self.search(grid, start, goal);
        if !tree.contains(&goal) {
            return Err(MazeError::PathNotFound { start, goal });
        }
        let path = retrace(&tree, start, goal)?;
        info!(
            "Found path of {} steps from {} to {}",
            path.len(),
            start,
            goal
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristics() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert_eq!(Heuristic::Euclidean.distance(&a, &b), 5.0);
        assert_eq!(Heuristic::Manhattan.distance(&a, &b), 7.0);
        assert_eq!(Heuristic::default(), Heuristic::Euclidean);
    }

    /// Asserts that the optimal 5 step solution is found around a single obstacle.
    #[test]
    fn solve_simple_problem() {
        //  ___
        // |S  |
        // | # |
        // |  G|
        //  ___
        let grid = WeightedGrid::from_rows(&["   ", " # ", "   "]).unwrap();
        let path = PathFinder::new()
            .find_path(&grid, Point::new(0, 0), Point::new(2, 2))
            .unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Point::new(0, 0));
        assert_eq!(path[4], Point::new(2, 2));
    }

    #[test]
    fn equal_start_goal() {
        let grid = WeightedGrid::new(1, 1).unwrap();
        let start = Point::new(0, 0);
        let tree = PathFinder::new().search(&grid, start, start);
        assert_eq!(tree.len(), 1);
        let path = PathFinder::new().find_path(&grid, start, start).unwrap();
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn walled_off_goal() {
        //  ___
        // |S# |
        // |## |
        // |  G|
        //  ___
        let grid = WeightedGrid::from_rows(&[" # ", "## ", "   "]).unwrap();
        let start = Point::new(0, 0);
        let goal = Point::new(2, 2);
        let tree = PathFinder::new().search(&grid, start, goal);
        assert!(!tree.contains(&goal));
        assert_eq!(
            PathFinder::new().find_path(&grid, start, goal),
            Err(MazeError::PathNotFound { start, goal })
        );
    }

    #[test]
    fn avoids_heavy_cells() {
        // Straight route along the top row is cheaper unless its middle is heavy.
        let mut grid = WeightedGrid::from_rows(&["     ", " ### ", "     "]).unwrap();
        let start = Point::new(0, 0);
        let goal = Point::new(4, 0);
        let tree = PathFinder::new().search(&grid, start, goal);
        assert_eq!(tree.cost(&goal), Some(4));

        grid.set_weight(Point::new(2, 0), 10).unwrap();
        for heuristic in [Heuristic::Euclidean, Heuristic::Manhattan] {
            let tree = PathFinder::with_heuristic(heuristic).search(&grid, start, goal);
            assert_eq!(tree.cost(&goal), Some(8));
            let path = retrace(&tree, start, goal).unwrap();
            assert!(!path.contains(&Point::new(2, 0)));
        }
    }

    #[test]
    fn heavy_weights_do_not_overflow() {
        let mut grid = WeightedGrid::new(3, 1).unwrap();
        grid.set_weight(Point::new(1, 0), u32::MAX).unwrap();
        grid.set_weight(Point::new(2, 0), u32::MAX).unwrap();
        let start = Point::new(0, 0);
        let goal = Point::new(2, 0);
        let tree = PathFinder::new().search(&grid, start, goal);
        assert_eq!(tree.cost(&goal), Some(2 * u64::from(u32::MAX)));
        let path = PathFinder::new().find_path(&grid, start, goal).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(crate::path_cost(&grid, &path), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn greedy_factor_still_reaches_goal() {
        //  _______
        // |S      |
        // |#####  |
        // |       |
        // |  #####|
        // |G      |
        //  _______
        let rows = ["       ", "#####  ", "       ", "  #####", "       "];
        let grid = WeightedGrid::from_rows(&rows).unwrap();
        let start = Point::new(0, 0);
        let goal = Point::new(0, 4);
        let optimal = PathFinder::new().search(&grid, start, goal);
        assert_eq!(optimal.cost(&goal), Some(14));
        for heuristic in [Heuristic::Euclidean, Heuristic::Manhattan] {
            let finder = PathFinder {
                heuristic,
                heuristic_factor: 3.0,
            };
            let path = finder.find_path(&grid, start, goal).unwrap();
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&goal));
            for (a, b) in path.iter().zip(path.iter().skip(1)) {
                assert_eq!((a.x - b.x).abs() + (a.y - b.y).abs(), 1);
                assert!(grid.traversable(b));
            }
            // May settle for a detour, never for less than the optimum
            let greedy = finder.search(&grid, start, goal).cost(&goal).unwrap();
            assert!(greedy >= 14);
            assert_eq!(greedy, path.len() as u64 - 1);
        }
    }
}
