use crate::astar::SearchTree;
use crate::solver::SearchGraph;
use crate::MazeError;
use grid_util::point::Point;
use itertools::Itertools;
use log::debug;

/// Walks the predecessor chain from `goal` back to `start` and returns the route from `start` to
/// `goal`, both included.
///
/// Fails with [MazeError::Unreachable] when the tree never reached `goal`, and with
/// [MazeError::CorruptPath] when the chain breaks off or loops without reaching `start`.
pub fn retrace<C: Copy>(
    tree: &SearchTree<Point, C>,
    start: Point,
    goal: Point,
) -> Result<Vec<Point>, MazeError> {
    if !tree.contains(&goal) {
        return Err(MazeError::Unreachable { goal });
    }
    let mut path = Vec::new();
    let mut at = goal;
    while at != start {
        // A well-formed chain visits every node at most once.
        if path.len() >= tree.len() {
            return Err(MazeError::CorruptPath { goal });
        }
        path.push(at);
        at = match tree.predecessor(&at) {
            Some(parent) => *parent,
            None => return Err(MazeError::CorruptPath { goal }),
        };
    }
    path.push(start);
    path.reverse();
    debug!("Retraced {} steps from {} to {}", path.len(), start, goal);
    Ok(path)
}

/// Sum of the step costs along consecutive locations of `path`, widened to [u64] like the
/// costs recorded by [PathFinder::search](crate::PathFinder::search).
pub fn path_cost<G: SearchGraph>(graph: &G, path: &[Point]) -> u64 {
    path.iter()
        .tuple_windows()
        .map(|(from, to)| u64::from(graph.cost(from, to)))
        .sum()
}
