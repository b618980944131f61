use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::task::{LocalSpawn, LocalSpawnExt};
use log::{debug, error};

use super::types::PathRequest;

/// Something that can carry out one queued path request.
pub trait PathRunner {
	/// Resolves when the run is over, whatever its outcome.
	fn run(&self, request: PathRequest) -> impl Future<Output = ()>;
}

struct Queued {
	request: PathRequest,
	done: oneshot::Sender<()>,
}

struct QueueInner<R> {
	pending: RefCell<VecDeque<Queued>>,
	animating: Cell<bool>,
	runner: R,
}

/// FIFO of path requests with at most one run in flight.
///
/// Requests are never dropped or merged; the same pair enqueued twice runs
/// twice.
pub struct AnimationQueue<R, S> {
	inner: Rc<QueueInner<R>>,
	spawner: S,
}

impl<R: PathRunner + 'static, S: LocalSpawn> AnimationQueue<R, S> {
	pub fn new(runner: R, spawner: S) -> Self {
		Self {
			inner: Rc::new(QueueInner {
				pending: RefCell::new(VecDeque::new()),
				animating: Cell::new(false),
				runner,
			}),
			spawner,
		}
	}

	/// Append `request`. The returned receiver resolves once its run is done.
	pub fn enqueue(&self, request: PathRequest) -> oneshot::Receiver<()> {
		let (done, receiver) = oneshot::channel();
		self.inner
			.pending
			.borrow_mut()
			.push_back(Queued { request, done });
		debug!(
			"Queued path animation {} -> {} ({} waiting, busy: {})",
			request.start,
			request.end,
			self.len(),
			self.is_animating()
		);
		self.process();
		receiver
	}

	/// Whether a run is in flight.
	pub fn is_animating(&self) -> bool {
		self.inner.animating.get()
	}

	/// Requests waiting to start.
	pub fn len(&self) -> usize {
		self.inner.pending.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn process(&self) {
		if self.inner.animating.get() || self.is_empty() {
			return;
		}
		self.inner.animating.set(true);
		if let Err(err) = self.spawner.spawn_local(drain(Rc::clone(&self.inner))) {
			error!("Could not start path animation: {err}");
			self.inner.animating.set(false);
		}
	}
}

/// Run queued requests one by one until none are left.
async fn drain<R: PathRunner>(inner: Rc<QueueInner<R>>) {
	loop {
		let next = inner.pending.borrow_mut().pop_front();
		let Some(Queued { request, done }) = next else {
			break;
		};
		inner.runner.run(request).await;
		let _ = done.send(());
	}
	inner.animating.set(false);
}
