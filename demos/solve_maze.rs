use maze_pathfinding::{path_cost, retrace, MazeGenerator, PathFinder, WeightedGrid};
use rand::rngs::StdRng;
use rand::SeedableRng;

// Generates an 80x40 maze from a fixed seed, solves it and prints it with the route marked.

fn main() {
    let mut rng = StdRng::seed_from_u64(2021);
    let maze = MazeGenerator::new().generate(80, 40, &mut rng).unwrap();
    let weighted = WeightedGrid::from_maze(&maze.grid);
    let tree = PathFinder::new().search(&weighted, maze.start, maze.goal);
    let path = retrace(&tree, maze.start, maze.goal).unwrap();

    let mut rows = maze
        .grid
        .rows()
        .into_iter()
        .map(|row| row.chars().collect::<Vec<_>>())
        .collect::<Vec<_>>();
    for p in &path {
        rows[p.y as usize][p.x as usize] = '.';
    }
    rows[maze.start.y as usize][maze.start.x as usize] = 'S';
    rows[maze.goal.y as usize][maze.goal.x as usize] = 'G';
    for row in rows {
        println!("{}", row.into_iter().collect::<String>());
    }
    println!(
        "start {} goal {}: {} steps, cost {}, {} nodes expanded",
        maze.start,
        maze.goal,
        path.len(),
        path_cost(&weighted, &path),
        tree.expanded()
    );
}
