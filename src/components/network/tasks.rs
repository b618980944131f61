use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::task::{LocalSpawn, LocalSpawnExt, SpawnError};
use log::{debug, error, warn};

use super::error::AnimationError;
use super::primitives::{AnimationPrimitives, CanvasAnimator, Clock};
use super::queue::{AnimationQueue, PathRunner};
use super::state::SharedState;
use super::types::{NodeId, PathRequest};

/// How long an ambient pulse or blink holds a node Active.
const AMBIENT_PULSE_MS: u32 = 300;

/// The periodic animations running alongside path animations: ambient lines,
/// overclock bursts and the path trigger. They stop once `running` is cleared.
pub struct BackgroundTasks<C, S> {
	state: SharedState,
	animator: Rc<CanvasAnimator<C>>,
	spawner: S,
	running: Arc<AtomicBool>,
}

impl<C, S> BackgroundTasks<C, S>
where
	C: Clock + 'static,
	S: LocalSpawn + Clone + 'static,
{
	pub fn new(
		state: SharedState,
		animator: Rc<CanvasAnimator<C>>,
		spawner: S,
		running: Arc<AtomicBool>,
	) -> Self {
		Self {
			state,
			animator,
			spawner,
			running,
		}
	}

	fn is_running(&self) -> bool {
		self.running.load(Ordering::Relaxed)
	}

	/// Spawn all three loops.
	pub fn start<R>(self: &Rc<Self>, queue: Rc<AnimationQueue<R, S>>) -> Result<(), SpawnError>
	where
		R: PathRunner + 'static,
	{
		self.spawner.spawn_local(Rc::clone(self).ambient_loop())?;
		self.spawner.spawn_local(Rc::clone(self).overclock_loop())?;
		self.spawner
			.spawn_local(Rc::clone(self).path_trigger_loop(queue))?;
		Ok(())
	}

	/// A random line every tick, with the odd pulse or blink.
	pub async fn ambient_loop(self: Rc<Self>) {
		while self.is_running() {
			let now = self.animator.clock().now();
			let tick = self.state.borrow_mut().ambient_tick(now);
			if let Some(node) = tick.pulse {
				self.detach(node, |animator, node| async move {
					animator.pulse(node, 1, AMBIENT_PULSE_MS).await
				});
			}
			if let Some(node) = tick.blink {
				self.detach(node, |animator, node| async move {
					animator.blink(node, AMBIENT_PULSE_MS).await
				});
			}

			let delay = self.state.borrow_mut().next_tick_delay();
			if let Err(err) = self.animator.clock().sleep(delay).await {
				error!("Ambient animation stopped: {err}");
				break;
			}
		}
	}

	/// Every overclock interval, maybe burst a batch of lines.
	pub async fn overclock_loop(self: Rc<Self>) {
		let (interval, duration) = {
			let state = self.state.borrow();
			let overclock = &state.config().overclock;
			(overclock.interval_ms, overclock.duration_ms)
		};
		loop {
			if let Err(err) = self.animator.clock().sleep(interval).await {
				error!("Overclock stopped: {err}");
				break;
			}
			if !self.is_running() {
				break;
			}
			if !self.state.borrow_mut().try_begin_overclock() {
				continue;
			}

			let now = self.animator.clock().now();
			let drawn = self.state.borrow_mut().overclock_burst(now);
			debug!("Overclock active for {duration} ms ({drawn} lines)");

			let this = Rc::clone(&self);
			let cooldown = async move {
				if let Err(err) = this.animator.clock().sleep(duration).await {
					warn!("Overclock cooldown cut short: {err}");
				}
				this.state.borrow_mut().end_overclock();
			};
			if let Err(err) = self.spawner.spawn_local(cooldown) {
				warn!("Could not schedule overclock cooldown: {err}");
				self.state.borrow_mut().end_overclock();
			}
		}
	}

	/// Every path interval, queue a path animation between two random nodes.
	pub async fn path_trigger_loop<R>(self: Rc<Self>, queue: Rc<AnimationQueue<R, S>>)
	where
		R: PathRunner + 'static,
	{
		let interval = self.state.borrow().config().path_animation_interval_ms;
		loop {
			if let Err(err) = self.animator.clock().sleep(interval).await {
				error!("Path animation trigger stopped: {err}");
				break;
			}
			if !self.is_running() {
				break;
			}
			let pair = self.state.borrow_mut().random_pair();
			if let Some((start, end)) = pair {
				drop(queue.enqueue(PathRequest::new(start, end)));
			}
		}
	}

	/// Run a node animation without waiting for it.
	fn detach<F, Fut>(&self, node: NodeId, animate: F)
	where
		F: FnOnce(Rc<CanvasAnimator<C>>, NodeId) -> Fut,
		Fut: Future<Output = Result<(), AnimationError>> + 'static,
	{
		let task = animate(Rc::clone(&self.animator), node);
		let spawned = self.spawner.spawn_local(async move {
			if let Err(err) = task.await {
				warn!("Node {node} animation failed: {err}");
			}
		});
		if let Err(err) = spawned {
			warn!("Could not animate node {node}: {err}");
		}
	}
}
