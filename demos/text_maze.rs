use maze_pathfinding::{PathFinder, Point, WeightedGrid};

// In this example a path is found on a maze given as text
//  _______
// |S  #   |
// |## # # |
// |     #E|
//  _______
// where
// - # marks a wall
// - S marks the start
// - E marks the end
//
// Any character other than # is walkable.

fn main() {
    let grid = WeightedGrid::from_rows(&["S  #   ", "## # # ", "     #E"]).unwrap();
    println!("{}", grid);
    let start = Point::new(0, 0);
    let end = Point::new(6, 2);
    let path = PathFinder::new().find_path(&grid, start, end).unwrap();
    println!("Path:");
    for p in path {
        println!("{:?}", p);
    }
}
