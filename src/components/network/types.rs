use std::fmt;

/// Identifier of a node within one layout generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A position on the canvas, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance_to(&self, other: &Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Point at fraction `t` along the segment towards `other`.
	pub fn lerp(&self, other: &Point, t: f64) -> Point {
		Point::new(
			self.x + (other.x - self.x) * t,
			self.y + (other.y - self.y) * t,
		)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeStatus {
	#[default]
	Idle,
	Active,
	Sending,
}

#[derive(Clone, Debug)]
pub struct Node {
	pub id: NodeId,
	pub position: Point,
	pub status: NodeStatus,
	/// Marked as part of the path currently being animated.
	pub on_path: bool,
	/// Origin of the highlighted path. Rests as `Sending` instead of `Idle`.
	pub sending: bool,
}

impl Node {
	pub fn new(id: NodeId, position: Point) -> Self {
		Self {
			id,
			position,
			status: NodeStatus::Idle,
			on_path: false,
			sending: false,
		}
	}

	/// Status to show when no pulse or blink holds the node.
	pub fn resting_status(&self) -> NodeStatus {
		if self.sending {
			NodeStatus::Sending
		} else {
			NodeStatus::Idle
		}
	}
}

/// Request to animate the shortest path between two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRequest {
	pub start: NodeId,
	pub end: NodeId,
}

impl PathRequest {
	pub fn new(start: NodeId, end: NodeId) -> Self {
		Self { start, end }
	}
}

/// What a transient line was drawn for; decides its colour and lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
	Ambient,
	Overclock,
	/// Part of a highlighted path; stays until the highlight is cleared.
	Path,
}

impl LineKind {
	pub fn fades(&self) -> bool {
		!matches!(self, LineKind::Path)
	}
}
