use std::f64::consts::PI;

use super::config::MapConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComputedLayout {
	pub center: Point,
	pub satellites: Vec<Point>,
}

/// Places the server at the canvas midpoint and `count` satellites on an
/// outward spiral.
///
/// Satellites are placed greedily in input order. A candidate that crowds the
/// server or an earlier satellite, or falls outside the padded canvas, is
/// pushed outwards (and from the sixth attempt on, nudged sideways) up to
/// `max_attempts` times. Whatever is left over is clamped into bounds, so
/// dense inputs can still overlap.
pub fn compute_layout(count: usize, width: f64, height: f64, config: &MapConfig) -> ComputedLayout {
	let center = Point::new(width / 2.0, height / 2.0);
	let (radius_x, radius_y) = (width * config.spread, height * config.spread);
	let step = if count > 0 { 2.0 * PI / count as f64 } else { 0.0 };
	let padding = config.padding();

	let on_spiral = |factor: f64, angle: f64| {
		Point::new(
			center.x + radius_x * factor * angle.cos(),
			center.y + radius_y * factor * angle.sin(),
		)
	};

	let mut satellites: Vec<Point> = Vec::with_capacity(count);
	for i in 0..count {
		let angle = i as f64 * step;
		let factor = (0.65 + (i as f64 / count as f64) * 0.35).min(0.9);
		let mut candidate = on_spiral(factor, angle);

		let fits = |p: Point, placed: &[Point]| {
			!overlaps(p, center, placed, config) && in_bounds(p, width, height, padding)
		};

		if !fits(candidate, &satellites) {
			let mut placed = false;
			'attempts: for attempt in 1..=config.max_attempts {
				let adjusted = (factor + 0.05 * attempt as f64).min(0.85);
				candidate = on_spiral(adjusted, angle);
				if fits(candidate, &satellites) {
					placed = true;
					break;
				}
				if attempt > 5 {
					let nudge = (attempt - 5) as f64 * 0.03;
					for jittered in [angle + nudge, angle - nudge] {
						candidate = on_spiral(adjusted, jittered);
						if fits(candidate, &satellites) {
							placed = true;
							break 'attempts;
						}
					}
				}
			}
			if !placed {
				candidate = clamp_to_bounds(candidate, width, height, padding);
			}
		}
		satellites.push(candidate);
	}

	ComputedLayout { center, satellites }
}

fn overlaps(p: Point, center: Point, placed: &[Point], config: &MapConfig) -> bool {
	if p.distance(center) < config.server_min_distance() {
		return true;
	}
	let min = config.min_separation();
	placed.iter().any(|other| p.distance(*other) < min)
}

fn in_bounds(p: Point, width: f64, height: f64, padding: f64) -> bool {
	p.x >= padding && p.x <= width - padding && p.y >= padding && p.y <= height - padding
}

/// Keeps `p` at least `margin` away from every edge. An axis shorter than
/// twice the margin has no such position, so the point is centered on it.
pub fn clamp_to_bounds(p: Point, width: f64, height: f64, margin: f64) -> Point {
	Point::new(
		clamp_axis(p.x, width, margin),
		clamp_axis(p.y, height, margin),
	)
}

fn clamp_axis(value: f64, extent: f64, margin: f64) -> f64 {
	if extent < 2.0 * margin {
		extent / 2.0
	} else {
		value.clamp(margin, extent - margin)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_input_only_has_the_center() {
		let layout = compute_layout(0, 800.0, 600.0, &MapConfig::default());
		assert_eq!(layout.center, Point::new(400.0, 300.0));
		assert!(layout.satellites.is_empty());
	}

	#[test]
	fn first_satellite_sits_on_the_positive_x_axis() {
		let config = MapConfig::default();
		let layout = compute_layout(4, 800.0, 600.0, &config);
		let first = layout.satellites[0];
		assert!((first.x - (400.0 + 320.0 * 0.65)).abs() < 1e-9);
		assert!((first.y - 300.0).abs() < 1e-9);
	}

	#[test]
	fn positions_stay_inside_padded_bounds() {
		let config = MapConfig::default();
		let padding = config.padding();
		for (width, height) in [(800.0, 600.0), (1280.0, 720.0), (400.0, 300.0)] {
			for n in 1..60 {
				let layout = compute_layout(n, width, height, &config);
				assert_eq!(layout.satellites.len(), n);
				for p in &layout.satellites {
					assert!(
						p.x >= padding && p.x <= width - padding,
						"x={} out of bounds for n={n} on {width}x{height}",
						p.x
					);
					assert!(
						p.y >= padding && p.y <= height - padding,
						"y={} out of bounds for n={n} on {width}x{height}",
						p.y
					);
				}
			}
		}
	}

	#[test]
	fn sparse_layouts_keep_their_distance() {
		let config = MapConfig::default();
		for n in 1..=10 {
			let layout = compute_layout(n, 1280.0, 800.0, &config);
			for (i, a) in layout.satellites.iter().enumerate() {
				assert!(a.distance(layout.center) >= config.server_min_distance());
				for b in &layout.satellites[i + 1..] {
					assert!(
						a.distance(*b) >= config.min_separation(),
						"satellites too close for n={n}"
					);
				}
			}
		}
	}

	#[test]
	fn layout_is_deterministic() {
		let config = MapConfig::default();
		assert_eq!(
			compute_layout(25, 1024.0, 768.0, &config),
			compute_layout(25, 1024.0, 768.0, &config)
		);
	}

	#[test]
	fn tiny_canvas_centers_nodes() {
		assert_eq!(
			clamp_to_bounds(Point::new(2.0, 9.0), 10.0, 10.0, 24.0),
			Point::new(5.0, 5.0)
		);
		// Only the short axis is centered.
		assert_eq!(
			clamp_to_bounds(Point::new(-40.0, 9.0), 400.0, 10.0, 24.0),
			Point::new(24.0, 5.0)
		);

		let layout = compute_layout(5, 10.0, 10.0, &MapConfig::default());
		assert_eq!(layout.satellites, vec![Point::new(5.0, 5.0); 5]);
	}
}
