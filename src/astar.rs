//! Generic A* over any node type, in the shape of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html),
//! except that the full search tree is handed back instead of a single path so that callers can
//! reconstruct routes themselves or inspect the explored region.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, warn};
use num_traits::{SaturatingAdd, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

struct SmallestCostHolder<K> {
    estimated_cost: f64,
    cost: K,
    index: usize,
    sequence: usize,
}

impl<K> Eq for SmallestCostHolder<K> {}

impl<K> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimate first, then first pushed among equal estimates
        match other.estimated_cost.total_cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

/// Predecessor map produced by one search. Every visited node records the node it was reached
/// from ([None] for the start) and the best known accumulated cost. Iteration follows the order
/// in which nodes were first discovered.
#[derive(Clone, Debug)]
pub struct SearchTree<N: Eq + Hash, C> {
    nodes: FxIndexMap<N, (Option<N>, C)>,
    expanded: usize,
}

impl<N: Eq + Hash, C: Copy> SearchTree<N, C> {
    pub fn new() -> Self {
        SearchTree {
            nodes: FxIndexMap::default(),
            expanded: 0,
        }
    }
    /// Records `node` as reached from `parent` at `cost`, replacing any earlier entry.
    pub fn insert(&mut self, node: N, parent: Option<N>, cost: C) {
        self.nodes.insert(node, (parent, cost));
    }
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains_key(node)
    }
    /// The node `node` was reached from. [None] for the start and for unvisited nodes.
    pub fn predecessor(&self, node: &N) -> Option<&N> {
        self.nodes.get(node).and_then(|(parent, _)| parent.as_ref())
    }
    /// Best accumulated cost from the start, if the node was visited.
    pub fn cost(&self, node: &N) -> Option<C> {
        self.nodes.get(node).map(|&(_, cost)| cost)
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    /// Number of nodes popped and expanded before the search stopped.
    pub fn expanded(&self) -> usize {
        self.expanded
    }
    pub fn iter(&self) -> impl Iterator<Item = (&N, Option<&N>)> {
        self.nodes
            .iter()
            .map(|(node, (parent, _))| (node, parent.as_ref()))
    }
}

impl<N: Eq + Hash, C: Copy> Default for SearchTree<N, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-first search from `start` ordered by `cost + heuristic`. Stops as soon as a node
/// satisfying `success` is popped; if the frontier runs dry first, the returned tree simply does
/// not contain any such node. Nodes may be pushed several times; stale entries whose cost is
/// above the recorded best are skipped when popped. Accumulated costs saturate at the maximum
/// of `C` instead of wrapping.
pub fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> SearchTree<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy + SaturatingAdd + ToPrimitive,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> f64,
    FS: FnMut(&N) -> bool,
{
    let mut tree = SearchTree::new();
    let mut to_see = BinaryHeap::new();
    let mut sequence = 0;
    to_see.push(SmallestCostHolder {
        estimated_cost: heuristic(start),
        cost: C::zero(),
        index: 0,
        sequence,
    });
    tree.nodes.insert(start.clone(), (None, C::zero()));
    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let (node, successors) = {
            let Some((node, &(_, c))) = tree.nodes.get_index(index) else {
                continue;
            };
            if success(node) {
                debug!("Goal popped after expanding {} nodes", tree.expanded);
                return tree;
            }
            // We may have inserted a node several times into the binary heap if we found
            // a better way to access it. Ensure that we are currently dealing with the
            // best path and discard the others.
            if cost > c {
                continue;
            }
            (node.clone(), successors(node))
        };
        tree.expanded += 1;
        for (successor, move_cost) in successors {
            let new_cost = cost.saturating_add(&move_cost);
            let h; // heuristic(&successor)
            let n; // index for successor
            match tree.nodes.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert((Some(node.clone()), new_cost));
                }
                Occupied(mut e) => {
                    if new_cost < e.get().1 {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((Some(node.clone()), new_cost));
                    } else {
                        continue;
                    }
                }
            }
            sequence += 1;
            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost.to_f64().unwrap_or(f64::INFINITY) + h,
                cost: new_cost,
                index: n,
                sequence,
            });
        }
    }
    warn!(
        "Search frontier exhausted after expanding {} nodes without reaching the goal",
        tree.expanded
    );
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Line graph 0 - 1 - 2 - ... - 9 with unit costs.
    fn line_successors(n: &i32) -> Vec<(i32, u32)> {
        [n - 1, n + 1]
            .into_iter()
            .filter(|m| (0..10).contains(m))
            .map(|m| (m, 1))
            .collect()
    }

    #[test]
    fn finds_goal_on_a_line() {
        let tree = astar(&0, line_successors, |n| (7 - n).abs() as f64, |n| *n == 7);
        assert_eq!(tree.cost(&7), Some(7));
        assert_eq!(tree.predecessor(&7), Some(&6));
        assert_eq!(tree.predecessor(&0), None);
        assert!(tree.contains(&0));
    }

    #[test]
    fn start_is_goal() {
        let tree = astar(&3, line_successors, |_| 0.0, |n| *n == 3);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.expanded(), 0);
    }

    #[test]
    fn missing_goal_leaves_no_entry() {
        let tree = astar(&0, line_successors, |_| 0.0, |n| *n == 42);
        assert!(!tree.contains(&42));
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.expanded(), 10);
    }

    #[test]
    fn relaxes_to_cheaper_route() {
        // 0 -> 1 costs 10, 0 -> 2 -> 1 costs 2
        let successors = |n: &u8| -> Vec<(u8, u32)> {
            match n {
                0 => vec![(1, 10), (2, 1)],
                2 => vec![(1, 1)],
                _ => vec![],
            }
        };
        let tree = astar(&0u8, successors, |_| 0.0, |n| *n == 1);
        assert_eq!(tree.cost(&1), Some(2));
        assert_eq!(tree.predecessor(&1), Some(&2));
    }

    #[test]
    fn costs_saturate_instead_of_wrapping() {
        let successors = |n: &u8| -> Vec<(u8, u32)> {
            match n {
                0 => vec![(1, u32::MAX)],
                1 => vec![(2, u32::MAX)],
                _ => vec![],
            }
        };
        let tree = astar(&0u8, successors, |_| 0.0, |n| *n == 2);
        assert_eq!(tree.cost(&1), Some(u32::MAX));
        assert_eq!(tree.cost(&2), Some(u32::MAX));
        assert_eq!(tree.predecessor(&2), Some(&1));
    }

    #[test]
    fn equal_estimates_pop_in_insertion_order() {
        let mut heap = BinaryHeap::new();
        for sequence in 0..4 {
            heap.push(SmallestCostHolder {
                estimated_cost: 2.0,
                cost: 0u32,
                index: sequence,
                sequence,
            });
        }
        heap.push(SmallestCostHolder {
            estimated_cost: 1.5,
            cost: 0u32,
            index: 9,
            sequence: 9,
        });
        let order = std::iter::from_fn(|| heap.pop().map(|h| h.index)).collect::<Vec<_>>();
        assert_eq!(order, vec![9, 0, 1, 2, 3]);
    }

    #[test]
    fn discovery_order_is_kept() {
        let mut tree: SearchTree<char, u32> = SearchTree::new();
        tree.insert('a', None, 0);
        tree.insert('c', Some('a'), 1);
        tree.insert('b', Some('c'), 2);
        let order = tree.iter().map(|(n, _)| *n).collect::<String>();
        assert_eq!(order, "acb");
    }
}
