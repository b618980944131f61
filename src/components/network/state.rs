use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use super::config::CanvasConfig;
use super::error::{AnimationError, ConfigError};
use super::graph::Graph;
use super::point::random_point;
use super::types::{LineKind, Node, NodeId, NodeStatus, Point};

pub const LINE_MIN_DRAW_MS: u32 = 500;
pub const LINE_DRAW_JITTER_MS: u32 = 500;
/// Pause between a line finishing its draw and starting to fade.
pub const LINE_FADE_DELAY_MS: u32 = 100;
pub const LINE_FADE_MS: u32 = 1_000;
const DOTTED_CHANCE: f64 = 0.5;
const AMBIENT_PULSE_CHANCE: f64 = 0.4;
const AMBIENT_BLINK_CHANCE: f64 = 0.2;

/// Canvas state shared between the render loop and the animation tasks.
pub type SharedState = Rc<RefCell<CanvasState>>;

/// A transient line growing from `from` to `to`.
#[derive(Clone, Debug)]
pub struct CanvasLine {
	pub from: Point,
	pub to: Point,
	pub kind: LineKind,
	pub dotted: bool,
	pub started_at: f64,
	pub duration_ms: f64,
}

impl CanvasLine {
	/// Drawn fraction in `[0, 1]` at time `now`.
	pub fn progress(&self, now: f64) -> f64 {
		((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
	}

	pub fn drawn_at(&self) -> f64 {
		self.started_at + self.duration_ms
	}

	pub fn opacity(&self, now: f64) -> f64 {
		if !self.kind.fades() {
			return 1.0;
		}
		let fade_start = self.drawn_at() + LINE_FADE_DELAY_MS as f64;
		(1.0 - (now - fade_start) / LINE_FADE_MS as f64).clamp(0.0, 1.0)
	}

	pub fn expired(&self, now: f64) -> bool {
		self.kind.fades()
			&& now >= self.drawn_at() + (LINE_FADE_DELAY_MS + LINE_FADE_MS) as f64
	}
}

/// Side effects the ambient tick asks the caller to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AmbientTick {
	pub pulse: Option<NodeId>,
	pub blink: Option<NodeId>,
}

/// Owns the nodes, the current graph and everything drawn on the canvas.
pub struct CanvasState {
	config: CanvasConfig,
	pub width: f64,
	pub height: f64,
	nodes: Vec<Node>,
	graph: Rc<Graph>,
	lines: Vec<CanvasLine>,
	overclock_active: bool,
	rng: StdRng,
}

impl CanvasState {
	/// Lay out `config.node_count` nodes with dense ids `0..count` and build
	/// their graph.
	pub fn new(
		config: CanvasConfig,
		width: f64,
		height: f64,
		mut rng: StdRng,
	) -> Result<Self, ConfigError> {
		config.validate()?;
		let nodes = (0..config.node_count)
			.map(|i| {
				let position = random_point(width, height, config.justification, &mut rng);
				Node::new(NodeId(i), position)
			})
			.collect();
		Ok(Self::with_nodes(config, width, height, nodes, rng))
	}

	/// Use an existing layout as is.
	pub fn with_nodes(
		config: CanvasConfig,
		width: f64,
		height: f64,
		nodes: Vec<Node>,
		rng: StdRng,
	) -> Self {
		let graph = Rc::new(Graph::build(&nodes));
		Self {
			config,
			width,
			height,
			nodes,
			graph,
			lines: Vec::new(),
			overclock_active: false,
			rng,
		}
	}

	pub fn config(&self) -> &CanvasConfig {
		&self.config
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, AnimationError> {
		self.nodes
			.iter_mut()
			.find(|n| n.id == id)
			.ok_or(AnimationError::UnknownNode(id))
	}

	/// The graph of the current layout. Holders keep the snapshot they got
	/// even if the layout is rebuilt meanwhile.
	pub fn graph(&self) -> Rc<Graph> {
		Rc::clone(&self.graph)
	}

	pub fn lines(&self) -> &[CanvasLine] {
		&self.lines
	}

	/// Independent random source seeded from this state's one.
	pub fn fork_rng(&mut self) -> StdRng {
		StdRng::seed_from_u64(self.rng.random())
	}

	/// Re-lay every node out for the new size and rebuild the graph.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		let justification = self.config.justification;
		for node in &mut self.nodes {
			node.position = random_point(width, height, justification, &mut self.rng);
		}
		self.graph = Rc::new(Graph::build(&self.nodes));
	}

	/// Set a node's status, returning the previous one.
	pub fn set_status(
		&mut self,
		id: NodeId,
		status: NodeStatus,
	) -> Result<NodeStatus, AnimationError> {
		let node = self.node_mut(id)?;
		Ok(std::mem::replace(&mut node.status, status))
	}

	/// Put a node back to its resting status once a pulse or blink lets go.
	pub fn rest(&mut self, id: NodeId) -> Result<(), AnimationError> {
		let node = self.node_mut(id)?;
		node.status = node.resting_status();
		Ok(())
	}

	/// Mark or unmark the nodes of `path`. The origin is `Sending` while marked.
	/// Unmarking also removes the path's lines.
	///
	/// An `Active` origin stays `Active`; it settles on the new resting status
	/// when its pulse or blink ends.
	pub fn set_path_highlight(&mut self, path: &[NodeId], on: bool) -> Result<(), AnimationError> {
		for (i, &id) in path.iter().enumerate() {
			let node = self.node_mut(id)?;
			node.on_path = on;
			if i == 0 {
				node.sending = on;
				if node.status != NodeStatus::Active {
					node.status = node.resting_status();
				}
			}
		}
		if !on {
			self.lines.retain(|l| l.kind != LineKind::Path);
		}
		Ok(())
	}

	/// Start drawing a line at `now`; returns its draw duration.
	pub fn add_line(&mut self, from: Point, to: Point, kind: LineKind, now: f64) -> u32 {
		let duration = LINE_MIN_DRAW_MS + self.rng.random_range(0..LINE_DRAW_JITTER_MS);
		let dotted = self.rng.random_bool(DOTTED_CHANCE);
		self.lines.push(CanvasLine {
			from,
			to,
			kind,
			dotted,
			started_at: now,
			duration_ms: duration as f64,
		});
		duration
	}

	/// Drop faded lines.
	pub fn prune_lines(&mut self, now: f64) {
		self.lines.retain(|l| !l.expired(now));
	}

	/// Two distinct random nodes, if there are at least two.
	pub fn random_pair(&mut self) -> Option<(NodeId, NodeId)> {
		if self.nodes.len() < 2 {
			return None;
		}
		let picked = index::sample(&mut self.rng, self.nodes.len(), 2);
		Some((self.nodes[picked.index(0)].id, self.nodes[picked.index(1)].id))
	}

	/// One ambient animation step: a line between two random nodes and maybe a
	/// pulse or blink on the first of them.
	pub fn ambient_tick(&mut self, now: f64) -> AmbientTick {
		let Some((start, end)) = self.random_pair() else {
			return AmbientTick::default();
		};
		let mut tick = AmbientTick::default();
		if self.rng.random_bool(AMBIENT_PULSE_CHANCE) {
			tick.pulse = Some(start);
		}
		if self.rng.random_bool(AMBIENT_BLINK_CHANCE) {
			tick.blink = Some(start);
		}
		if let (Some(from), Some(to)) = (self.node(start), self.node(end)) {
			let (from, to) = (from.position, to.position);
			self.add_line(from, to, LineKind::Ambient, now);
		}
		tick
	}

	/// Delay until the next ambient tick.
	pub fn next_tick_delay(&mut self) -> u32 {
		let jitter = match self.config.tick_jitter_ms {
			0 => 0,
			max => self.rng.random_range(0..max),
		};
		self.config.tick_frequency_ms + jitter
	}

	pub fn overclock_active(&self) -> bool {
		self.overclock_active
	}

	/// Roll for an overclock burst. Returns `true` and arms the flag when one
	/// should start; never while one is already active.
	pub fn try_begin_overclock(&mut self) -> bool {
		let chance = self.config.overclock.trigger_chance;
		if self.overclock_active() || !self.rng.random_bool(chance) {
			return false;
		}
		self.overclock_active = true;
		true
	}

	/// Draw the burst lines of an overclock; returns how many were added.
	pub fn overclock_burst(&mut self, now: f64) -> usize {
		let count = (self.nodes.len() as f64 * self.config.overclock.fraction_of_nodes) as usize;
		let mut drawn = 0;
		for _ in 0..count {
			let Some((a, b)) = self.random_pair() else {
				break;
			};
			if let (Some(from), Some(to)) = (self.node(a), self.node(b)) {
				let (from, to) = (from.position, to.position);
				self.add_line(from, to, LineKind::Overclock, now);
				drawn += 1;
			}
		}
		debug!("Overclock burst drew {drawn} lines");
		drawn
	}

	pub fn end_overclock(&mut self) {
		self.overclock_active = false;
	}

	/// Swap in a graph with custom weights over the same nodes.
	#[cfg(test)]
	pub fn set_graph(&mut self, graph: Graph) {
		self.graph = Rc::new(graph);
	}
}
