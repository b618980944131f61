use std::collections::HashMap;

use log::info;

use super::types::{Node, NodeId, Point};

/// One directed half of an undirected edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
	pub node: NodeId,
	pub weight: f64,
}

/// Complete weighted graph over a snapshot of node positions.
///
/// Every unordered pair of distinct nodes is joined by one edge whose weight is
/// the Euclidean distance between them, listed in both adjacency lists. The
/// graph is never mutated after construction; a layout change builds a new one.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	/// Node ids in build order.
	nodes: Vec<NodeId>,
	/// Positions captured at build time.
	positions: HashMap<NodeId, Point>,
	/// Adjacency list: for each node, the list of (neighbor, weight).
	adjacency: HashMap<NodeId, Vec<Neighbor>>,
}

impl Graph {
	/// Build the complete graph over `nodes`, weighted by Euclidean distance.
	///
	/// Costs O(n²) time and space. Input nodes are not modified.
	pub fn build(nodes: &[Node]) -> Self {
		Self::build_with(nodes, |a, b| a.distance_to(b))
	}

	/// Build the complete graph with `weight` computed once per pair of positions.
	pub fn build_with(nodes: &[Node], weight: impl Fn(&Point, &Point) -> f64) -> Self {
		let mut adjacency: HashMap<NodeId, Vec<Neighbor>> = nodes
			.iter()
			.map(|n| (n.id, Vec::with_capacity(nodes.len().saturating_sub(1))))
			.collect();

		for (i, a) in nodes.iter().enumerate() {
			for b in &nodes[i + 1..] {
				let weight = weight(&a.position, &b.position);
				if let Some(list) = adjacency.get_mut(&a.id) {
					list.push(Neighbor { node: b.id, weight });
				}
				if let Some(list) = adjacency.get_mut(&b.id) {
					list.push(Neighbor { node: a.id, weight });
				}
			}
		}

		let graph = Self {
			nodes: nodes.iter().map(|n| n.id).collect(),
			positions: nodes.iter().map(|n| (n.id, n.position)).collect(),
			adjacency,
		};
		info!(
			"Graph built with {} nodes and {} edges",
			graph.node_count(),
			graph.edge_count()
		);
		graph
	}

	pub fn node_ids(&self) -> &[NodeId] {
		&self.nodes
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of undirected edges.
	pub fn edge_count(&self) -> usize {
		self.adjacency.values().map(Vec::len).sum::<usize>() / 2
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.adjacency.contains_key(&id)
	}

	pub fn neighbors(&self, id: NodeId) -> &[Neighbor] {
		static EMPTY: &[Neighbor] = &[];
		self.adjacency.get(&id).map_or(EMPTY, |v| v.as_slice())
	}

	/// Weight of the edge between `a` and `b`, if there is one.
	pub fn weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
		self.neighbors(a)
			.iter()
			.find(|n| n.node == b)
			.map(|n| n.weight)
	}

	/// Position of `id` when the graph was built.
	pub fn position(&self, id: NodeId) -> Option<Point> {
		self.positions.get(&id).copied()
	}
}
