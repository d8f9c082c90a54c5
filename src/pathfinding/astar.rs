use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

// =============================================================================
// A* SEARCH
// =============================================================================
///
/// The graph an `AStarSearch` runs over.
///
/// Keeps the search map-independent: anything with neighbours, step costs and
/// an admissible heuristic can be searched. Node equality comes from `Eq`.
pub trait SearchGraph {
    type Node: Copy + Eq + Hash;

    /// Push every node reachable in one step from `node` into `out`.
    fn neighbors(&self, node: Self::Node, out: &mut Vec<Self::Node>);

    /// Cost of stepping from `from` to its neighbour `to`.
    fn cost(&self, from: Self::Node, to: Self::Node) -> u32;

    /// Estimated remaining cost from `node` to `goal`. Must not overestimate.
    fn heuristic(&self, node: Self::Node, goal: Self::Node) -> u32;
}

/// Where a search stands after a `search_step`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    Searching,
    Succeeded,
    Failed,
    /// The node pool filled up before the goal was reached.
    OutOfMemory,
}

struct NodeRecord<N> {
    node: N,
    g: u32,
    parent: Option<usize>,
    closed: bool,
}

/// Incremental A* search, advanced one expansion at a time.
///
/// ```text
/// SEARCHING ─┬─> SUCCEEDED
///            ├─> FAILED        (open list exhausted, or cancelled)
///            └─> OUT_OF_MEMORY (node pool full)
/// ```
///
/// Callers drive `search_step` until the state is terminal and enforce their
/// own step budget with `cancel_search`.
pub struct AStarSearch<'g, G: SearchGraph> {
    graph: &'g G,
    goal: G::Node,
    // (f, h, insertion order, record index); insertion order keeps ties FIFO.
    open: BinaryHeap<Reverse<(u32, u32, u64, usize)>>,
    records: Vec<NodeRecord<G::Node>>,
    index: HashMap<G::Node, usize>,
    scratch: Vec<G::Node>,
    goal_record: Option<usize>,
    state: SearchState,
    steps: usize,
    pushes: u64,
    node_capacity: usize,
    cancel_requested: bool,
}

impl<'g, G: SearchGraph> AStarSearch<'g, G> {
    /// Start a search from `start` to `goal`, holding at most `node_capacity`
    /// node records at once.
    pub fn new(graph: &'g G, start: G::Node, goal: G::Node, node_capacity: usize) -> Self {
        let mut search = Self {
            graph,
            goal,
            open: BinaryHeap::new(),
            records: Vec::new(),
            index: HashMap::new(),
            scratch: Vec::with_capacity(8),
            goal_record: None,
            state: SearchState::Searching,
            steps: 0,
            pushes: 0,
            node_capacity: node_capacity.max(1),
            cancel_requested: false,
        };
        search.records.push(NodeRecord { node: start, g: 0, parent: None, closed: false });
        search.index.insert(start, 0);
        let h = graph.heuristic(start, goal);
        search.push_open(h, h, 0);
        search
    }

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Number of nodes expanded so far.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps
    }

    /// Request cancellation; the next `search_step` ends in `Failed`.
    pub fn cancel_search(&mut self) {
        self.cancel_requested = true;
    }

    /// Expand the best open node. Returns the resulting state.
    pub fn search_step(&mut self) -> SearchState {
        if self.state != SearchState::Searching {
            return self.state;
        }
        if self.cancel_requested {
            return self.finish(SearchState::Failed);
        }

        // Skip stale heap entries left behind by cheaper re-discoveries.
        let current = loop {
            match self.open.pop() {
                None => return self.finish(SearchState::Failed),
                Some(Reverse((_, _, _, idx))) if self.records[idx].closed => continue,
                Some(Reverse((_, _, _, idx))) => break idx,
            }
        };

        self.steps += 1;
        let node = self.records[current].node;
        if node == self.goal {
            self.goal_record = Some(current);
            return self.finish(SearchState::Succeeded);
        }
        self.records[current].closed = true;

        let current_g = self.records[current].g;
        let mut neighbors = std::mem::take(&mut self.scratch);
        neighbors.clear();
        self.graph.neighbors(node, &mut neighbors);

        let mut out_of_memory = false;
        for &next in &neighbors {
            let new_g = current_g.saturating_add(self.graph.cost(node, next));
            let idx = match self.index.get(&next).copied() {
                Some(idx) => {
                    let record = &mut self.records[idx];
                    if record.closed || new_g >= record.g {
                        continue;
                    }
                    record.g = new_g;
                    record.parent = Some(current);
                    idx
                }
                None => {
                    if self.records.len() >= self.node_capacity {
                        out_of_memory = true;
                        break;
                    }
                    let idx = self.records.len();
                    self.records.push(NodeRecord { node: next, g: new_g, parent: Some(current), closed: false });
                    self.index.insert(next, idx);
                    idx
                }
            };
            let h = self.graph.heuristic(next, self.goal);
            self.push_open(new_g.saturating_add(h), h, idx);
        }

        self.scratch = neighbors;
        if out_of_memory {
            return self.finish(SearchState::OutOfMemory);
        }
        SearchState::Searching
    }

    /// Solution path from goal back to start, consuming the search so its
    /// node storage is released. Empty unless the search succeeded.
    pub fn into_solution(self) -> Vec<G::Node> {
        let mut path = Vec::new();
        let mut cursor = self.goal_record;
        while let Some(idx) = cursor {
            let record = &self.records[idx];
            path.push(record.node);
            cursor = record.parent;
        }
        path
    }

    fn push_open(&mut self, f: u32, h: u32, idx: usize) {
        self.open.push(Reverse((f, h, self.pushes, idx)));
        self.pushes += 1;
    }

    fn finish(&mut self, state: SearchState) -> SearchState {
        self.state = state;
        if state != SearchState::Succeeded {
            self.records.clear();
            self.index.clear();
        }
        self.open.clear();
        state
    }
}

/// Run a search to completion, cancelling once `max_steps` nodes have been
/// expanded.
///
/// Returns the path from goal back to start, or `None` if the search failed,
/// ran out of node storage, or hit the step budget.
pub fn astar<G: SearchGraph>(
    graph: &G,
    start: G::Node,
    goal: G::Node,
    max_steps: usize,
    node_capacity: usize,
) -> Option<Vec<G::Node>> {
    let mut search = AStarSearch::new(graph, start, goal, node_capacity);
    let state = loop {
        let state = search.search_step();
        if state != SearchState::Searching {
            break state;
        }
        if search.step_count() >= max_steps {
            search.cancel_search();
        }
    };
    (state == SearchState::Succeeded).then(|| search.into_solution())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open 4-connected grid with optional walls.
    struct Grid {
        width: i32,
        height: i32,
        walls: Vec<(i32, i32)>,
    }

    impl SearchGraph for Grid {
        type Node = (i32, i32);

        fn neighbors(&self, (x, y): (i32, i32), out: &mut Vec<(i32, i32)>) {
            for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                let next = (x + dx, y + dy);
                if next.0 >= 0
                    && next.1 >= 0
                    && next.0 < self.width
                    && next.1 < self.height
                    && !self.walls.contains(&next)
                {
                    out.push(next);
                }
            }
        }

        fn cost(&self, _: (i32, i32), _: (i32, i32)) -> u32 {
            1
        }

        fn heuristic(&self, a: (i32, i32), b: (i32, i32)) -> u32 {
            ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as u32
        }
    }

    fn open_grid(width: i32, height: i32) -> Grid {
        Grid { width, height, walls: Vec::new() }
    }

    #[test]
    fn trivial_same_start_and_goal() {
        let grid = open_grid(5, 5);
        assert_eq!(astar(&grid, (2, 2), (2, 2), 100, 100), Some(vec![(2, 2)]));
    }

    #[test]
    fn straight_line_goal_first() {
        let grid = open_grid(10, 10);
        let path = astar(&grid, (0, 0), (4, 0), 200, 200).unwrap();
        assert_eq!(path.first(), Some(&(4, 0)));
        assert_eq!(path.last(), Some(&(0, 0)));
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn walled_off_goal_fails() {
        let walls = (0..5).map(|y| (2, y)).collect();
        let grid = Grid { width: 5, height: 5, walls };
        let mut search = AStarSearch::new(&grid, (0, 0), (4, 0), 1000);
        while search.search_step() == SearchState::Searching {}
        assert_eq!(search.state(), SearchState::Failed);
        assert!(search.into_solution().is_empty());
    }

    #[test]
    fn cancel_ends_in_failure() {
        let grid = open_grid(50, 50);
        let mut search = AStarSearch::new(&grid, (0, 0), (49, 49), 10_000);
        assert_eq!(search.search_step(), SearchState::Searching);
        search.cancel_search();
        assert_eq!(search.search_step(), SearchState::Failed);
        assert_eq!(search.search_step(), SearchState::Failed);
    }

    #[test]
    fn node_pool_exhaustion() {
        let grid = open_grid(50, 50);
        let mut search = AStarSearch::new(&grid, (0, 0), (49, 49), 4);
        while search.search_step() == SearchState::Searching {}
        assert_eq!(search.state(), SearchState::OutOfMemory);
    }

    #[test]
    fn step_budget_returns_none() {
        let grid = open_grid(100, 100);
        assert!(astar(&grid, (0, 0), (99, 99), 1, 100_000).is_none());
    }
}
