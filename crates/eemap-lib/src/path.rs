use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use crate::starmap::{Edge, Starmap, SystemId};

/// Breadth-first search over outgoing edges in insertion order. Edge weights
/// are ignored.
pub fn find_route_bfs(starmap: &Starmap, start: SystemId, goal: SystemId) -> Option<Vec<SystemId>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut parents: HashMap<SystemId, Option<SystemId>> = HashMap::new();
    let mut queue = VecDeque::new();

    parents.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for edge in starmap.outgoing(current) {
            let next = edge.target;
            if parents.contains_key(&next) {
                continue;
            }

            parents.insert(next, Some(current));
            if next == goal {
                return Some(reconstruct_path(&parents, start, goal));
            }
            queue.push_back(next);
        }
    }

    None
}

/// Run Dijkstra's algorithm with the given non-negative edge weight.
pub fn find_route_dijkstra<W>(
    starmap: &Starmap,
    start: SystemId,
    goal: SystemId,
    weight: W,
) -> Option<Vec<SystemId>>
where
    W: Fn(&Edge) -> f64,
{
    if start == goal {
        return Some(vec![start]);
    }

    let mut distances: HashMap<SystemId, f64> = HashMap::new();
    let mut parents: HashMap<SystemId, Option<SystemId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let current_distance = match distances.get(&entry.node) {
            Some(distance) if *distance < entry.cost.0 => continue,
            Some(distance) => *distance,
            None => continue,
        };

        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }

        for edge in starmap.outgoing(entry.node) {
            let next = edge.target;
            let next_cost = current_distance + weight(edge);
            if next_cost < *distances.get(&next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, Some(entry.node));
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    None
}

/// Hop distances from `start` to every reachable system.
pub fn hop_distances(starmap: &Starmap, start: SystemId) -> HashMap<SystemId, usize> {
    let mut distances = HashMap::new();
    let mut queue = VecDeque::new();
    distances.insert(start, 0usize);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let depth = distances[&current];
        for edge in starmap.outgoing(current) {
            if !distances.contains_key(&edge.target) {
                distances.insert(edge.target, depth + 1);
                queue.push_back(edge.target);
            }
        }
    }

    distances
}

/// Consecutive pairs along a path.
pub fn path_edges(path: &[SystemId]) -> Vec<(SystemId, SystemId)> {
    path.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Distinct constellations on a path, in path order.
pub fn visited_constellations(starmap: &Starmap, path: &[SystemId]) -> Vec<String> {
    let mut constellations: Vec<String> = Vec::new();
    for node in path.iter().filter_map(|&id| starmap.system(id)) {
        if !constellations
            .iter()
            .any(|existing| existing == node.constellation())
        {
            constellations.push(node.constellation().to_string());
        }
    }
    constellations
}

/// Cumulative cost along a path using the cheapest parallel edge for every
/// hop. `None` when some consecutive pair has no connecting edge.
pub fn path_cost<W>(starmap: &Starmap, path: &[SystemId], weight: W) -> Option<f64>
where
    W: Fn(&Edge) -> f64,
{
    let mut total = 0.0;
    for (source, target) in path_edges(path) {
        let cheapest = starmap
            .edges_between(source, target)
            .map(&weight)
            .min_by(|a, b| a.total_cmp(b))?;
        total += cheapest;
    }
    Some(total)
}

/// Cumulative `risk_cost` along a path.
pub fn path_risk(starmap: &Starmap, path: &[SystemId]) -> Option<f64> {
    path_cost(starmap, path, |edge| edge.risk_cost)
}

fn reconstruct_path(
    parents: &HashMap<SystemId, Option<SystemId>>,
    start: SystemId,
    goal: SystemId,
) -> Vec<SystemId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: SystemId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: SystemId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
