use std::future::Future;
use std::rc::Rc;

use super::error::AnimationError;
use super::state::{LINE_FADE_DELAY_MS, SharedState};
use super::types::{LineKind, NodeId, NodeStatus, Point};

/// Source of time and of suspending delays.
pub trait Clock {
	/// Milliseconds on a monotonic timeline.
	fn now(&self) -> f64;

	fn sleep(&self, ms: u32) -> impl Future<Output = Result<(), AnimationError>>;
}

/// Suspendable visual operations a path animation is made of.
pub trait AnimationPrimitives {
	/// Flip `node` Active then back, `times` times, `interval_ms` apart.
	fn pulse(
		&self,
		node: NodeId,
		times: u32,
		interval_ms: u32,
	) -> impl Future<Output = Result<(), AnimationError>>;

	/// Resolves once the line's draw phase is over. Path lines stay on the
	/// canvas; others fade out on their own.
	fn draw_line(
		&self,
		from: Point,
		to: Point,
		kind: LineKind,
	) -> impl Future<Output = Result<(), AnimationError>>;

	fn set_path_highlight(&self, path: &[NodeId], on: bool) -> Result<(), AnimationError>;

	fn delay(&self, ms: u32) -> impl Future<Output = Result<(), AnimationError>>;
}

impl<P: AnimationPrimitives> AnimationPrimitives for Rc<P> {
	fn pulse(
		&self,
		node: NodeId,
		times: u32,
		interval_ms: u32,
	) -> impl Future<Output = Result<(), AnimationError>> {
		(**self).pulse(node, times, interval_ms)
	}

	fn draw_line(
		&self,
		from: Point,
		to: Point,
		kind: LineKind,
	) -> impl Future<Output = Result<(), AnimationError>> {
		(**self).draw_line(from, to, kind)
	}

	fn set_path_highlight(&self, path: &[NodeId], on: bool) -> Result<(), AnimationError> {
		(**self).set_path_highlight(path, on)
	}

	fn delay(&self, ms: u32) -> impl Future<Output = Result<(), AnimationError>> {
		(**self).delay(ms)
	}
}

/// Animation primitives acting on the shared canvas state.
pub struct CanvasAnimator<C> {
	state: SharedState,
	clock: C,
}

impl<C: Clock> CanvasAnimator<C> {
	pub fn new(state: SharedState, clock: C) -> Self {
		Self { state, clock }
	}

	pub fn clock(&self) -> &C {
		&self.clock
	}

	/// Hold `node` Active for `ms`, then let it rest.
	pub async fn blink(&self, node: NodeId, ms: u32) -> Result<(), AnimationError> {
		self.hold_active(node, ms).await
	}

	/// The resting status is looked up when the hold ends, so a highlight
	/// change in between is not undone.
	async fn hold_active(&self, node: NodeId, ms: u32) -> Result<(), AnimationError> {
		self.state
			.borrow_mut()
			.set_status(node, NodeStatus::Active)?;
		let slept = self.clock.sleep(ms).await;
		self.state.borrow_mut().rest(node)?;
		slept
	}
}

impl<C: Clock> AnimationPrimitives for CanvasAnimator<C> {
	async fn pulse(&self, node: NodeId, times: u32, interval_ms: u32) -> Result<(), AnimationError> {
		for _ in 0..times {
			self.hold_active(node, interval_ms).await?;
			self.clock.sleep(interval_ms).await?;
		}
		Ok(())
	}

	async fn draw_line(&self, from: Point, to: Point, kind: LineKind) -> Result<(), AnimationError> {
		let now = self.clock.now();
		let duration = self.state.borrow_mut().add_line(from, to, kind, now);
		self.clock.sleep(duration).await?;
		if kind.fades() {
			self.clock.sleep(LINE_FADE_DELAY_MS).await?;
		}
		Ok(())
	}

	fn set_path_highlight(&self, path: &[NodeId], on: bool) -> Result<(), AnimationError> {
		self.state.borrow_mut().set_path_highlight(path, on)
	}

	async fn delay(&self, ms: u32) -> Result<(), AnimationError> {
		self.clock.sleep(ms).await
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::{LocalPool, block_on};
	use futures::task::LocalSpawnExt;

	use super::*;
	use crate::components::network::config::CanvasConfig;
	use crate::components::network::testing::{GatedClock, ManualClock, shared_square_state};

	#[test]
	fn pulse_toggles_and_waits() {
		let state = shared_square_state(CanvasConfig::default());
		let clock = ManualClock::new();
		let animator = CanvasAnimator::new(state.clone(), clock.clone());

		block_on(animator.pulse(NodeId(1), 3, 300)).unwrap();

		assert_eq!(clock.sleeps(), vec![300; 6]);
		assert_eq!(clock.now(), 1_800.0);
		assert_eq!(
			state.borrow().node(NodeId(1)).unwrap().status,
			NodeStatus::Idle
		);
	}

	#[test]
	fn pulse_restores_sending_origin() {
		let state = shared_square_state(CanvasConfig::default());
		state
			.borrow_mut()
			.set_path_highlight(&[NodeId(0), NodeId(1)], true)
			.unwrap();
		let animator = CanvasAnimator::new(state.clone(), ManualClock::new());

		block_on(animator.pulse(NodeId(0), 1, 100)).unwrap();
		assert_eq!(
			state.borrow().node(NodeId(0)).unwrap().status,
			NodeStatus::Sending
		);
	}

	#[test]
	fn pulse_unknown_node_fails() {
		let state = shared_square_state(CanvasConfig::default());
		let animator = CanvasAnimator::new(state, ManualClock::new());
		assert_eq!(
			block_on(animator.pulse(NodeId(7), 1, 100)),
			Err(AnimationError::UnknownNode(NodeId(7)))
		);
	}

	#[test]
	fn draw_waits_for_draw_phase() {
		let state = shared_square_state(CanvasConfig::default());
		let clock = ManualClock::new();
		let animator = CanvasAnimator::new(state.clone(), clock.clone());
		let (a, b) = (Point::new(0.0, 0.0), Point::new(10.0, 0.0));

		block_on(animator.draw_line(a, b, LineKind::Path)).unwrap();
		let drawn_at = state.borrow().lines()[0].drawn_at();
		assert_eq!(clock.now(), drawn_at);

		block_on(animator.draw_line(a, b, LineKind::Ambient)).unwrap();
		let drawn_at = state.borrow().lines()[1].drawn_at();
		assert_eq!(clock.now(), drawn_at + LINE_FADE_DELAY_MS as f64);
	}

	#[test]
	fn failed_timer_still_restores_status() {
		let state = shared_square_state(CanvasConfig::default());
		let clock = ManualClock::with_budget(0);
		let animator = CanvasAnimator::new(state.clone(), clock);

		assert!(matches!(
			block_on(animator.blink(NodeId(2), 300)),
			Err(AnimationError::Timer(_))
		));
		assert_eq!(
			state.borrow().node(NodeId(2)).unwrap().status,
			NodeStatus::Idle
		);
	}

	fn blink_across_highlight_change(highlighted_before: bool) -> NodeStatus {
		let state = shared_square_state(CanvasConfig::default());
		let path = [NodeId(0), NodeId(1)];
		if highlighted_before {
			state.borrow_mut().set_path_highlight(&path, true).unwrap();
		}
		let clock = GatedClock::default();
		let animator = Rc::new(CanvasAnimator::new(state.clone(), clock.clone()));
		let mut pool = LocalPool::new();
		let blinking = Rc::clone(&animator);
		pool.spawner()
			.spawn_local(async move {
				blinking.blink(NodeId(0), 300).await.unwrap();
			})
			.unwrap();

		pool.run_until_stalled();
		assert_eq!(
			state.borrow().node(NodeId(0)).unwrap().status,
			NodeStatus::Active
		);
		state
			.borrow_mut()
			.set_path_highlight(&path, !highlighted_before)
			.unwrap();
		clock.release();
		pool.run();

		let node = state.borrow().node(NodeId(0)).unwrap().clone();
		assert_eq!(node.on_path, !highlighted_before);
		node.status
	}

	#[test]
	fn blink_spanning_unhighlight_rests_idle() {
		assert_eq!(blink_across_highlight_change(true), NodeStatus::Idle);
	}

	#[test]
	fn blink_spanning_highlight_rests_sending() {
		assert_eq!(blink_across_highlight_change(false), NodeStatus::Sending);
	}
}
