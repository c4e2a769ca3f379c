use std::collections::BTreeSet;

use log::warn;

use super::config::MapConfig;
use super::layout::{Point, clamp_to_bounds, compute_layout};
use super::storage::{FractionalPosition, PositionMap};
use super::types::ProxyDescriptor;

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	Server { label: String },
	Proxy(ProxyDescriptor),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub kind: NodeKind,
}

impl Node {
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	fn contains(&self, x: f64, y: f64) -> bool {
		self.position().distance(Point::new(x, y)) <= self.radius
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
	Server,
	Proxy(usize),
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub offset_x: f64,
	pub offset_y: f64,
}

/// Names that occur more than once, each reported once in sorted order.
pub fn duplicate_names(proxies: &[ProxyDescriptor]) -> Vec<String> {
	let mut seen = BTreeSet::new();
	let mut repeated = BTreeSet::new();
	for proxy in proxies {
		if !seen.insert(proxy.name.as_str()) {
			repeated.insert(proxy.name.as_str());
		}
	}
	repeated.into_iter().map(str::to_string).collect()
}

/// Everything the renderer reads and the mouse handlers mutate.
pub struct MapState {
	pub server: Node,
	pub proxies: Vec<Node>,
	pub drag: DragState,
	pub hover: Option<HitTarget>,
	pub width: f64,
	pub height: f64,
	pub config: MapConfig,
	/// Timestamp of the current frame in milliseconds, drives link pulses.
	pub clock: f64,
	dirty: bool,
	last_paint: Option<f64>,
}

impl MapState {
	pub fn new(proxies: &[ProxyDescriptor], width: f64, height: f64, config: MapConfig) -> Self {
		let repeated = duplicate_names(proxies);
		if !repeated.is_empty() {
			warn!(
				"Proxy names are not unique ({}), saved positions will be shared between them",
				repeated.join(", ")
			);
		}
		let server = Node {
			x: width / 2.0,
			y: height / 2.0,
			radius: config.server_radius,
			kind: NodeKind::Server {
				label: config.server_label.clone(),
			},
		};
		let proxies = proxies
			.iter()
			.map(|proxy| Node {
				x: 0.0,
				y: 0.0,
				radius: config.proxy_radius,
				kind: NodeKind::Proxy(proxy.clone()),
			})
			.collect();

		let mut state = Self {
			server,
			proxies,
			drag: DragState::default(),
			hover: None,
			width,
			height,
			config,
			clock: 0.0,
			dirty: true,
			last_paint: None,
		};
		state.reset_positions();
		state
	}

	/// Recomputes the default spiral layout.
	pub fn reset_positions(&mut self) {
		let layout = compute_layout(self.proxies.len(), self.width, self.height, &self.config);
		self.server.x = layout.center.x;
		self.server.y = layout.center.y;
		for (node, point) in self.proxies.iter_mut().zip(layout.satellites) {
			node.x = point.x;
			node.y = point.y;
		}
		self.dirty = true;
	}

	pub fn proxy_name(&self, idx: usize) -> Option<&str> {
		match &self.proxies.get(idx)?.kind {
			NodeKind::Proxy(proxy) => Some(&proxy.name),
			NodeKind::Server { .. } => None,
		}
	}

	pub fn node(&self, target: HitTarget) -> Option<&Node> {
		match target {
			HitTarget::Server => Some(&self.server),
			HitTarget::Proxy(idx) => self.proxies.get(idx),
		}
	}

	pub fn fractional_positions(&self) -> PositionMap {
		if self.width <= 0.0 || self.height <= 0.0 {
			return PositionMap::new();
		}
		(0..self.proxies.len())
			.filter_map(|idx| {
				let node = &self.proxies[idx];
				let name = self.proxy_name(idx)?;
				Some((
					name.to_string(),
					FractionalPosition {
						x: node.x / self.width,
						y: node.y / self.height,
					},
				))
			})
			.collect()
	}

	/// Moves every proxy with a stored entry and returns how many matched.
	pub fn apply_positions(&mut self, positions: &PositionMap) -> usize {
		let (width, height) = (self.width, self.height);
		let mut applied = 0;
		for node in &mut self.proxies {
			let NodeKind::Proxy(proxy) = &node.kind else {
				continue;
			};
			if let Some(pos) = positions.get(&proxy.name) {
				let point = clamp_to_bounds(
					Point::new(pos.x * width, pos.y * height),
					width,
					height,
					node.radius,
				);
				node.x = point.x;
				node.y = point.y;
				applied += 1;
			}
		}
		if applied > 0 {
			self.dirty = true;
		}
		applied
	}

	/// Server first, then the nearest proxy whose disc contains the point.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<HitTarget> {
		if self.server.contains(x, y) {
			return Some(HitTarget::Server);
		}
		let target = Point::new(x, y);
		self.proxies
			.iter()
			.enumerate()
			.filter(|(_, node)| node.contains(x, y))
			.min_by(|(_, a), (_, b)| {
				a.position()
					.distance(target)
					.total_cmp(&b.position().distance(target))
			})
			.map(|(idx, _)| HitTarget::Proxy(idx))
	}

	/// Starts dragging the proxy under the pointer, if any.
	pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
		let Some(HitTarget::Proxy(idx)) = self.node_at_position(x, y) else {
			return false;
		};
		let node = &self.proxies[idx];
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			offset_x: node.x - x,
			offset_y: node.y - y,
		};
		self.hover = None;
		self.dirty = true;
		true
	}

	pub fn drag_to(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			return;
		}
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let (width, height) = (self.width, self.height);
		let (offset_x, offset_y) = (self.drag.offset_x, self.drag.offset_y);
		if let Some(node) = self.proxies.get_mut(idx) {
			let point = clamp_to_bounds(
				Point::new(x + offset_x, y + offset_y),
				width,
				height,
				node.radius,
			);
			node.x = point.x;
			node.y = point.y;
			self.dirty = true;
		}
	}

	/// Ends a drag; `true` when one was in progress and positions should be saved.
	pub fn end_drag(&mut self) -> bool {
		let was_dragging = self.drag.active;
		self.drag = DragState::default();
		if was_dragging {
			self.dirty = true;
		}
		was_dragging
	}

	pub fn set_hover(&mut self, target: Option<HitTarget>) {
		if self.hover != target {
			self.hover = target;
			self.dirty = true;
		}
	}

	/// Keeps every node at the same fraction of the canvas.
	pub fn resize(&mut self, width: f64, height: f64) {
		if width <= 0.0 || height <= 0.0 {
			return;
		}
		let positions = self.fractional_positions();
		self.width = width;
		self.height = height;
		self.server.x = width / 2.0;
		self.server.y = height / 2.0;
		self.apply_positions(&positions);
		self.dirty = true;
	}

	/// Paints on change or while dragging, otherwise every `idle_repaint_ms`.
	pub fn should_paint(&self, now: f64) -> bool {
		self.dirty
			|| self.drag.active
			|| self
				.last_paint
				.is_none_or(|last| now - last >= self.config.idle_repaint_ms)
	}

	pub fn painted(&mut self, now: f64) {
		self.last_paint = Some(now);
		self.dirty = false;
	}
}
