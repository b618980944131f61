use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::IndexedRandom;

use super::graph::Graph;
use super::types::NodeId;

/// Lowest total-distance path from `start` to `end`, both inclusive.
///
/// Dijkstra over the unvisited frontier, stopping as soon as `end` is the
/// closest unvisited node or the closest one is unreachable. When several
/// frontier nodes share the minimum distance one of them is picked with `rng`,
/// so equal-cost alternatives may come back in any order; the path cost does
/// not depend on the choice.
///
/// Returns an empty path when either endpoint is missing or `end` cannot be
/// reached, and `[start]` when `start == end`.
pub fn shortest_path(graph: &Graph, start: NodeId, end: NodeId, rng: &mut impl Rng) -> Vec<NodeId> {
	if !graph.contains(start) || !graph.contains(end) {
		return Vec::new();
	}

	let mut distances: HashMap<NodeId, f64> = graph
		.node_ids()
		.iter()
		.map(|&id| (id, f64::INFINITY))
		.collect();
	let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
	let mut frontier: HashSet<NodeId> = graph.node_ids().iter().copied().collect();
	distances.insert(start, 0.0);

	let mut closest = Vec::new();
	while !frontier.is_empty() {
		let smallest = frontier
			.iter()
			.map(|id| distances[id])
			.fold(f64::INFINITY, f64::min);
		if smallest == f64::INFINITY {
			break;
		}

		// Sorted so the seeded choice does not depend on hash order.
		closest.clear();
		closest.extend(frontier.iter().copied().filter(|id| distances[id] == smallest));
		closest.sort_unstable();
		let Some(&current) = closest.choose(rng) else {
			break;
		};
		if current == end {
			break;
		}
		frontier.remove(&current);

		for neighbor in graph.neighbors(current) {
			if !frontier.contains(&neighbor.node) {
				continue;
			}
			let alt = smallest + neighbor.weight;
			if alt < distances[&neighbor.node] {
				distances.insert(neighbor.node, alt);
				previous.insert(neighbor.node, current);
			}
		}
	}

	if distances[&end] == f64::INFINITY {
		return Vec::new();
	}

	let mut path = vec![end];
	let mut current = end;
	while let Some(&prev) = previous.get(&current) {
		path.push(prev);
		current = prev;
	}
	path.reverse();
	path
}

/// Sum of edge weights along `path`, or `None` if two consecutive ids are
/// not adjacent.
pub fn path_cost(graph: &Graph, path: &[NodeId]) -> Option<f64> {
	path.windows(2)
		.map(|pair| graph.weight(pair[0], pair[1]))
		.sum()
}
