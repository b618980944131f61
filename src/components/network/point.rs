use rand::Rng;

use super::config::Justification;
use super::types::Point;

/// Chance that an axis follows the justification policy instead of
/// being spread uniformly.
const JUSTIFIED_AXIS_CHANCE: f64 = 0.7;

/// Generate a node position inside a `width` x `height` canvas.
pub fn random_point(
	width: f64,
	height: f64,
	justification: Justification,
	rng: &mut impl Rng,
) -> Point {
	Point::new(
		random_axis(width, justification, rng),
		random_axis(height, justification, rng),
	)
}

fn random_axis(extent: f64, justification: Justification, rng: &mut impl Rng) -> f64 {
	if rng.random_bool(JUSTIFIED_AXIS_CHANCE) {
		justify(extent, justification, rng)
	} else {
		rng.random::<f64>() * extent
	}
}

fn justify(extent: f64, justification: Justification, rng: &mut impl Rng) -> f64 {
	match justification {
		Justification::Random => rng.random::<f64>() * extent,
		Justification::Center => (rng.random::<f64>() - 0.5) * (extent * 0.4) + extent / 2.0,
		// Outer fifth on either side.
		Justification::Corner => {
			let offset = rng.random::<f64>() * (extent * 0.2);
			if rng.random_bool(0.5) {
				offset
			} else {
				offset + extent * 0.8
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn points_stay_inside_canvas() {
		let mut rng = StdRng::seed_from_u64(7);
		for justification in [
			Justification::Random,
			Justification::Center,
			Justification::Corner,
		] {
			for _ in 0..500 {
				let p = random_point(800.0, 600.0, justification, &mut rng);
				assert!((0.0..800.0).contains(&p.x), "{justification:?} x={}", p.x);
				assert!((0.0..600.0).contains(&p.y), "{justification:?} y={}", p.y);
			}
		}
	}

	#[test]
	fn center_policy_stays_in_middle_band() {
		let mut rng = StdRng::seed_from_u64(11);
		for _ in 0..500 {
			let x = justify(1000.0, Justification::Center, &mut rng);
			assert!((300.0..=700.0).contains(&x), "x={x}");
		}
	}

	#[test]
	fn corner_policy_avoids_middle() {
		let mut rng = StdRng::seed_from_u64(13);
		for _ in 0..500 {
			let x = justify(1000.0, Justification::Corner, &mut rng);
			assert!(x < 200.0 || x >= 800.0, "x={x}");
		}
	}
}
