use log::{debug, error, warn};
use rand::Rng;

use super::config::SequenceTiming;
use super::error::AnimationError;
use super::graph::Graph;
use super::path::{path_cost, shortest_path};
use super::primitives::AnimationPrimitives;
use super::queue::PathRunner;
use super::state::SharedState;
use super::types::{LineKind, NodeId, PathRequest};

/// Stages of one path animation run, in the order they are visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceStage {
	Idle,
	PulsingOrigin,
	PulsingDestination,
	HighlightingNodes,
	/// Drawing the edge from `path[i]` to `path[i + 1]`.
	DrawingEdge(usize),
	PulsingDestinationAgain,
	UnhighlightingNodes,
	Done,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SequenceOutcome {
	Completed,
	/// Nothing to animate: no path, or start and end are the same node.
	NoPath,
	/// A primitive failed; the run was cut short.
	Failed {
		stage: SequenceStage,
		error: AnimationError,
	},
}

/// Drives the stages of a path animation one after the other.
pub struct PathSequencer<P> {
	primitives: P,
	timing: SequenceTiming,
}

impl<P: AnimationPrimitives> PathSequencer<P> {
	pub fn new(primitives: P, timing: SequenceTiming) -> Self {
		Self { primitives, timing }
	}

	/// Animate the shortest path of `request` over `graph`.
	///
	/// Always returns once the run is over; a failing primitive ends the run
	/// early, is logged, and the path highlight is cleared on a best-effort
	/// basis. `rng` only decides ties between equal-cost paths.
	pub async fn run(
		&self,
		graph: &Graph,
		request: PathRequest,
		rng: &mut impl Rng,
	) -> SequenceOutcome {
		let path = shortest_path(graph, request.start, request.end, rng);
		if path.len() < 2 {
			return SequenceOutcome::NoPath;
		}
		if let Some(cost) = path_cost(graph, &path) {
			debug!(
				"Animating {} -> {} over {} edges (cost {cost:.1})",
				request.start,
				request.end,
				path.len() - 1
			);
		}

		let mut stage = SequenceStage::Idle;
		while stage != SequenceStage::Done {
			match self.advance(stage, graph, &path).await {
				Ok(next) => stage = next,
				Err(error) => {
					error!(
						"Path animation {} -> {} failed while {:?}: {}",
						request.start, request.end, stage, error
					);
					if let Err(err) = self.primitives.set_path_highlight(&path, false) {
						warn!("Could not clear path highlight: {err}");
					}
					return SequenceOutcome::Failed { stage, error };
				}
			}
		}
		SequenceOutcome::Completed
	}

	/// Perform the work of `stage` and return the stage after it.
	async fn advance(
		&self,
		stage: SequenceStage,
		graph: &Graph,
		path: &[NodeId],
	) -> Result<SequenceStage, AnimationError> {
		let timing = &self.timing;
		let (origin, destination) = (path[0], path[path.len() - 1]);

		let next = match stage {
			SequenceStage::Idle => SequenceStage::PulsingOrigin,
			SequenceStage::PulsingOrigin => {
				self.primitives
					.pulse(origin, timing.origin_pulses, timing.pulse_interval_ms)
					.await?;
				SequenceStage::PulsingDestination
			}
			SequenceStage::PulsingDestination => {
				self.primitives
					.pulse(destination, timing.destination_pulses, timing.pulse_interval_ms)
					.await?;
				SequenceStage::HighlightingNodes
			}
			SequenceStage::HighlightingNodes => {
				self.primitives.set_path_highlight(path, true)?;
				SequenceStage::DrawingEdge(0)
			}
			SequenceStage::DrawingEdge(i) => {
				let (from, to) = (path[i], path[i + 1]);
				let from = graph.position(from).ok_or(AnimationError::UnknownNode(from))?;
				let to = graph.position(to).ok_or(AnimationError::UnknownNode(to))?;
				self.primitives.draw_line(from, to, LineKind::Path).await?;
				if i + 2 < path.len() {
					SequenceStage::DrawingEdge(i + 1)
				} else {
					SequenceStage::PulsingDestinationAgain
				}
			}
			SequenceStage::PulsingDestinationAgain => {
				self.primitives
					.pulse(destination, timing.final_pulses, timing.pulse_interval_ms)
					.await?;
				SequenceStage::UnhighlightingNodes
			}
			SequenceStage::UnhighlightingNodes => {
				self.primitives.delay(timing.unhighlight_delay_ms).await?;
				self.primitives.set_path_highlight(path, false)?;
				SequenceStage::Done
			}
			SequenceStage::Done => SequenceStage::Done,
		};
		Ok(next)
	}
}

/// Runs queued path requests against the canvas' current graph.
pub struct CanvasPathRunner<P> {
	state: SharedState,
	sequencer: PathSequencer<P>,
}

impl<P: AnimationPrimitives> CanvasPathRunner<P> {
	pub fn new(state: SharedState, sequencer: PathSequencer<P>) -> Self {
		Self { state, sequencer }
	}
}

impl<P: AnimationPrimitives> PathRunner for CanvasPathRunner<P> {
	async fn run(&self, request: PathRequest) {
		// The graph is captured once; a resize during the run does not affect it.
		let (graph, mut rng) = {
			let mut state = self.state.borrow_mut();
			(state.graph(), state.fork_rng())
		};
		let outcome = self.sequencer.run(&graph, request, &mut rng).await;
		debug!(
			"Path animation {} -> {} finished: {:?}",
			request.start, request.end, outcome
		);
	}
}
