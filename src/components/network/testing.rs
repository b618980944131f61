//! Fixtures shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::CanvasConfig;
use super::error::AnimationError;
use super::graph::Graph;
use super::primitives::{AnimationPrimitives, Clock};
use super::state::{CanvasState, SharedState};
use super::types::{LineKind, Node, NodeId, Point};

pub fn nodes_at(coords: &[(f64, f64)]) -> Vec<Node> {
	coords
		.iter()
		.enumerate()
		.map(|(i, &(x, y))| Node::new(NodeId(i), Point::new(x, y)))
		.collect()
}

/// Unit square scaled by 10, ids 0..3 counter-clockwise from the origin.
pub fn square_nodes() -> Vec<Node> {
	nodes_at(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
}

/// Square whose edges cost the cube of their length, so going around beats the
/// diagonal.
pub fn cubed_square_graph() -> Graph {
	Graph::build_with(&square_nodes(), |a, b| a.distance_to(b).powi(3))
}

pub fn square_state(config: CanvasConfig) -> CanvasState {
	CanvasState::with_nodes(config, 100.0, 100.0, square_nodes(), StdRng::seed_from_u64(5))
}

pub fn shared_square_state(config: CanvasConfig) -> SharedState {
	Rc::new(RefCell::new(square_state(config)))
}

/// Square state whose graph routes `0 -> 2` and `1 -> 3` over two edges.
pub fn shared_cubed_square_state(config: CanvasConfig) -> SharedState {
	let mut state = square_state(config);
	state.set_graph(cubed_square_graph());
	Rc::new(RefCell::new(state))
}

/// Future that returns `Pending` once so other tasks get to run.
#[derive(Default)]
pub struct YieldNow(bool);

impl Future for YieldNow {
	type Output = ();

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
		if self.0 {
			return Poll::Ready(());
		}
		self.0 = true;
		cx.waker().wake_by_ref();
		Poll::Pending
	}
}

#[derive(Default)]
struct ClockInner {
	now: Cell<f64>,
	sleeps: RefCell<Vec<u32>>,
	budget: Cell<Option<usize>>,
}

/// Clock whose sleeps advance time instantly. With a budget, sleeps fail once
/// it is used up, which is how tests stop the periodic loops.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<ClockInner>);

impl ManualClock {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_budget(sleeps: usize) -> Self {
		let clock = Self::default();
		clock.0.budget.set(Some(sleeps));
		clock
	}

	pub fn sleeps(&self) -> Vec<u32> {
		self.0.sleeps.borrow().clone()
	}
}

impl Clock for ManualClock {
	fn now(&self) -> f64 {
		self.0.now.get()
	}

	async fn sleep(&self, ms: u32) -> Result<(), AnimationError> {
		match self.0.budget.get() {
			Some(0) => return Err(AnimationError::Timer("budget exhausted".into())),
			Some(left) => self.0.budget.set(Some(left - 1)),
			None => {}
		}
		self.0.now.set(self.0.now.get() + ms as f64);
		self.0.sleeps.borrow_mut().push(ms);
		YieldNow::default().await;
		Ok(())
	}
}

#[derive(Default)]
struct GateInner {
	open: Cell<bool>,
	waiting: RefCell<Vec<Waker>>,
}

/// Clock whose sleeps stay suspended until `release` is called, so tests can
/// change state in the middle of an animation.
#[derive(Clone, Default)]
pub struct GatedClock(Rc<GateInner>);

impl GatedClock {
	pub fn release(&self) {
		self.0.open.set(true);
		for waker in self.0.waiting.borrow_mut().drain(..) {
			waker.wake();
		}
	}
}

struct Gate(Rc<GateInner>);

impl Future for Gate {
	type Output = ();

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
		if self.0.open.get() {
			return Poll::Ready(());
		}
		self.0.waiting.borrow_mut().push(cx.waker().clone());
		Poll::Pending
	}
}

impl Clock for GatedClock {
	fn now(&self) -> f64 {
		0.0
	}

	async fn sleep(&self, _ms: u32) -> Result<(), AnimationError> {
		Gate(Rc::clone(&self.0)).await;
		Ok(())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
	Pulse(NodeId, u32),
	Draw(Point, Point, LineKind),
	Highlight(Vec<NodeId>, bool),
	Delay(u32),
}

#[derive(Default)]
struct RecorderInner {
	calls: RefCell<Vec<Call>>,
	draws: Cell<usize>,
	fail_on_draw: Cell<Option<usize>>,
	fail_unhighlight: Cell<bool>,
}

/// Primitives that only record what they were asked to do.
#[derive(Clone, Default)]
pub struct RecordingPrimitives(Rc<RecorderInner>);

impl RecordingPrimitives {
	pub fn new() -> Self {
		Self::default()
	}

	/// Make the `nth` draw (1-based) fail.
	pub fn failing_on_draw(nth: usize) -> Self {
		let primitives = Self::default();
		primitives.0.fail_on_draw.set(Some(nth));
		primitives
	}

	/// Also make clearing a highlight fail.
	pub fn failing_unhighlight(self) -> Self {
		self.0.fail_unhighlight.set(true);
		self
	}

	pub fn calls(&self) -> Vec<Call> {
		self.0.calls.borrow().clone()
	}

	fn record(&self, call: Call) {
		self.0.calls.borrow_mut().push(call);
	}
}

impl AnimationPrimitives for RecordingPrimitives {
	async fn pulse(&self, node: NodeId, times: u32, _interval_ms: u32) -> Result<(), AnimationError> {
		self.record(Call::Pulse(node, times));
		YieldNow::default().await;
		Ok(())
	}

	async fn draw_line(&self, from: Point, to: Point, kind: LineKind) -> Result<(), AnimationError> {
		let nth = self.0.draws.get() + 1;
		self.0.draws.set(nth);
		if self.0.fail_on_draw.get() == Some(nth) {
			return Err(AnimationError::Timer(format!("draw {nth} failed")));
		}
		self.record(Call::Draw(from, to, kind));
		YieldNow::default().await;
		Ok(())
	}

	fn set_path_highlight(&self, path: &[NodeId], on: bool) -> Result<(), AnimationError> {
		self.record(Call::Highlight(path.to_vec(), on));
		if !on && self.0.fail_unhighlight.get() {
			return Err(AnimationError::Timer("unhighlight failed".into()));
		}
		Ok(())
	}

	async fn delay(&self, ms: u32) -> Result<(), AnimationError> {
		self.record(Call::Delay(ms));
		YieldNow::default().await;
		Ok(())
	}
}
