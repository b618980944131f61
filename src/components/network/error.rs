use thiserror::Error;

use super::types::NodeId;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
	#[error("node count must be positive")]
	NoNodes,
	#[error("{name} must be a positive number of milliseconds")]
	ZeroInterval { name: &'static str },
	#[error("{name} must lie within [0, 1], got {value}")]
	RatioOutOfRange { name: &'static str, value: f64 },
	#[error("unknown justification {0:?}, expected random, center or corner")]
	UnknownJustification(String),
}

/// Failure to mount the canvas. Reported once; never retried.
#[derive(Debug, Error)]
pub enum CanvasError {
	#[error("canvas element not found")]
	CanvasNotFound,
	#[error("window is not available")]
	NoWindow,
	#[error("2d rendering context unavailable: {0}")]
	Context(String),
	#[error("invalid configuration: {0}")]
	Config(#[from] ConfigError),
	#[error("could not start background animations: {0}")]
	Spawn(#[from] futures::task::SpawnError),
}

/// Failure of an awaited animation primitive.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
	#[error("node {0} does not exist")]
	UnknownNode(NodeId),
	#[error("timer could not be scheduled: {0}")]
	Timer(String),
}
