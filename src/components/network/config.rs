use std::str::FromStr;

use super::error::ConfigError;

/// Where generated node positions cluster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Justification {
	Random,
	Center,
	#[default]
	Corner,
}

impl FromStr for Justification {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"random" => Ok(Self::Random),
			"center" | "centre" => Ok(Self::Center),
			"corner" => Ok(Self::Corner),
			_ => Err(ConfigError::UnknownJustification(s.to_string())),
		}
	}
}

/// Periodic burst of extra random lines.
#[derive(Clone, Debug, PartialEq)]
pub struct OverclockConfig {
	pub interval_ms: u32,
	pub duration_ms: u32,
	pub trigger_chance: f64,
	pub fraction_of_nodes: f64,
}

impl Default for OverclockConfig {
	fn default() -> Self {
		Self {
			interval_ms: 10_000,
			duration_ms: 5_000,
			trigger_chance: 0.25,
			fraction_of_nodes: 0.75,
		}
	}
}

/// Pulse counts and delays of one path animation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceTiming {
	pub origin_pulses: u32,
	pub destination_pulses: u32,
	pub final_pulses: u32,
	pub pulse_interval_ms: u32,
	/// Delay between the final pulse and clearing the path highlight.
	pub unhighlight_delay_ms: u32,
}

impl Default for SequenceTiming {
	fn default() -> Self {
		Self {
			origin_pulses: 3,
			destination_pulses: 3,
			final_pulses: 2,
			pulse_interval_ms: 300,
			unhighlight_delay_ms: 500,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasConfig {
	pub node_count: usize,
	/// Base interval between ambient animations.
	pub tick_frequency_ms: u32,
	/// Upper bound of the random delay added to each ambient interval.
	pub tick_jitter_ms: u32,
	pub justification: Justification,
	pub overclock: OverclockConfig,
	pub path_animation_interval_ms: u32,
	pub timing: SequenceTiming,
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			node_count: 50,
			tick_frequency_ms: 1_000,
			tick_jitter_ms: 200,
			justification: Justification::default(),
			overclock: OverclockConfig::default(),
			path_animation_interval_ms: 15_000,
			timing: SequenceTiming::default(),
		}
	}
}

impl CanvasConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.node_count == 0 {
			return Err(ConfigError::NoNodes);
		}
		for (name, value) in [
			("tick frequency", self.tick_frequency_ms),
			("overclock interval", self.overclock.interval_ms),
			("path animation interval", self.path_animation_interval_ms),
		] {
			if value == 0 {
				return Err(ConfigError::ZeroInterval { name });
			}
		}
		for (name, value) in [
			("overclock trigger chance", self.overclock.trigger_chance),
			("overclock node fraction", self.overclock.fraction_of_nodes),
		] {
			if !(0.0..=1.0).contains(&value) {
				return Err(ConfigError::RatioOutOfRange { name, value });
			}
		}
		Ok(())
	}
}
