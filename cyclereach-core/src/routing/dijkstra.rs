use std::{cmp::Ordering, collections::BinaryHeap};

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use crate::{Minutes, model::StreetGraph};

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: Minutes,
    node: NodeIndex,
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap)
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra's algorithm over cycling travel times.
///
/// Search starts from every `(node, initial cost)` in `sources`, which lets a
/// point lying inside an edge start from both edge endpoints. Edges without a
/// travel time are impassable. The search stops once every node in `targets`
/// is settled, or when the frontier exceeds `max_cost` or runs empty. An
/// empty (or out of range) `targets` set settles nothing.
///
/// Returns settled and tentatively labelled nodes with their cost in minutes;
/// labels of nodes in `targets` are final.
pub fn dijkstra_path_weights(
    graph: &StreetGraph,
    sources: &[(NodeIndex, Minutes)],
    targets: Option<&[NodeIndex]>,
    max_cost: Option<Minutes>,
) -> HashMap<NodeIndex, Minutes> {
    let node_count = graph.node_count();
    let mut distances: HashMap<NodeIndex, Minutes> = HashMap::with_capacity(node_count.min(1024));
    let mut settled = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::new();

    let mut pending = FixedBitSet::with_capacity(node_count);
    if let Some(targets) = targets {
        for target in targets.iter().filter(|t| t.index() < node_count) {
            pending.insert(target.index());
        }
    }
    let mut remaining = pending.count_ones(..);
    if targets.is_some() && remaining == 0 {
        return distances;
    }

    for &(node, cost) in sources {
        if node.index() >= node_count || !(cost >= 0.0) {
            continue;
        }
        let best = distances.entry(node).or_insert(cost);
        if cost <= *best {
            *best = cost;
            heap.push(State { cost, node });
        }
    }

    while let Some(State { cost, node }) = heap.pop() {
        // Skip if we've found a better path
        if settled.put(node.index()) {
            continue;
        }

        // Check max cost constraint
        if let Some(max) = max_cost {
            if cost > max {
                break;
            }
        }

        if targets.is_some() && pending.contains(node.index()) {
            pending.set(node.index(), false);
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }

        // Examine neighbors
        for edge in graph.edges(node) {
            let Some(travel_time) = edge.weight().travel_time() else {
                continue;
            };
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }
            let next_cost = cost + travel_time;

            // Add or update distance if better using Entry API
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    if let Some(max) = max_cost {
        distances.retain(|_, cost| *cost <= max);
    }
    distances
}
