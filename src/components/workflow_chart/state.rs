use std::collections::HashSet;

use log::debug;

use super::connector::{Connector, connectors};
use super::layout::{Layout, compute_layout};
use super::types::WorkflowGraph;
use super::zoom::{ZoomEvent, ZoomState, auto_zoom};

/// Delay between consecutive nodes appearing, in seconds.
pub const ENTRANCE_STAGGER: f64 = 0.12;
pub const ENTRANCE_DURATION: f64 = 0.5;
pub const CONNECTOR_DELAY: f64 = 0.3;
pub const CONNECTOR_DURATION: f64 = 0.6;
/// Seconds for the flow dot to travel one connector.
pub const FLOW_PERIOD: f64 = 1.8;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub offset_start_x: f64,
	pub offset_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<String>,
	pub neighbors: HashSet<String>,
	pub highlight_t: f64,
	pub prev_node: Option<String>,
	pub prev_neighbors: HashSet<String>,
	delay_t: f64,
}

pub struct WorkflowChartState {
	pub graph: WorkflowGraph,
	pub layout: Layout,
	pub connectors: Vec<Connector>,
	pub zoom: ZoomState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	/// Manual pan offset added on top of the centering transform.
	pub offset_x: f64,
	pub offset_y: f64,
	pub elapsed: f64,
}

impl WorkflowChartState {
	pub fn new(graph: &WorkflowGraph, width: f64, height: f64) -> Self {
		let layout = compute_layout(graph);
		let connectors = connectors(graph, &layout);
		let zoom = ZoomState::fitted(auto_zoom(
			layout.canvas_width,
			layout.canvas_height,
			width,
			height,
		));
		debug!(
			"workflow layout: {} nodes, {} columns, {} connectors, canvas {}x{}, zoom {:.2}",
			layout.positions.len(),
			layout.columns,
			connectors.len(),
			layout.canvas_width,
			layout.canvas_height,
			zoom.effective()
		);

		Self {
			graph: graph.clone(),
			layout,
			connectors,
			zoom,
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			offset_x: 0.0,
			offset_y: 0.0,
			elapsed: 0.0,
		}
	}

	/// Replace the graph; the view opens fitted again.
	pub fn load(&mut self, graph: &WorkflowGraph) {
		*self = Self::new(graph, self.width, self.height);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.zoom = self.zoom.refit(auto_zoom(
			self.layout.canvas_width,
			self.layout.canvas_height,
			width,
			height,
		));
	}

	pub fn apply_zoom(&mut self, event: ZoomEvent) {
		self.zoom = self.zoom.apply(event);
		if event == ZoomEvent::Reset {
			self.offset_x = 0.0;
			self.offset_y = 0.0;
		}
	}

	/// Scale plus translation that centers the scaled canvas when it fits.
	pub fn transform(&self) -> ViewTransform {
		let k = self.zoom.effective();
		ViewTransform {
			x: ((self.width - self.layout.canvas_width * k) / 2.0).max(0.0) + self.offset_x,
			y: ((self.height - self.layout.canvas_height * k) / 2.0).max(0.0) + self.offset_y,
			k,
		}
	}

	pub fn screen_to_canvas(&self, sx: f64, sy: f64) -> (f64, f64) {
		let t = self.transform();
		((sx - t.x) / t.k, (sy - t.y) / t.k)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<&str> {
		let (cx, cy) = self.screen_to_canvas(sx, sy);
		self.layout
			.positions
			.iter()
			.find(|(_, rect)| rect.contains(cx, cy))
			.map(|(id, _)| id.as_str())
	}

	pub fn start_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			offset_start_x: self.offset_x,
			offset_start_y: self.offset_y,
		};
	}

	pub fn drag_pan(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.offset_x = self.pan.offset_start_x + (sx - self.pan.start_x);
			self.offset_y = self.pan.offset_start_y + (sy - self.pan.start_y);
		}
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	pub fn set_hover(&mut self, node: Option<&str>) {
		if self.hover.node.as_deref() == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the old highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node.map(str::to_owned);
		self.hover.neighbors.clear();

		if let Some(id) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for c in &self.connectors {
				if c.from == id {
					self.hover.neighbors.insert(c.to.clone());
				} else if c.to == id {
					self.hover.neighbors.insert(c.from.clone());
				}
			}
		}
	}

	pub fn is_highlighted(&self, id: &str) -> bool {
		self.is_hovered(id)
			|| self.hover.neighbors.contains(id)
			|| self.hover.prev_neighbors.contains(id)
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		self.hover.node.as_deref() == Some(id) || self.hover.prev_node.as_deref() == Some(id)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Opacity ramp for the `index`-th node's entrance, in `[0, 1]`.
	pub fn entrance_progress(&self, index: usize) -> f64 {
		((self.elapsed - index as f64 * ENTRANCE_STAGGER) / ENTRANCE_DURATION).clamp(0.0, 1.0)
	}

	/// Draw-in progress of connector `index`, in `[0, 1]`.
	pub fn connector_progress(&self, index: usize) -> f64 {
		((self.elapsed - CONNECTOR_DELAY - index as f64 * ENTRANCE_STAGGER) / CONNECTOR_DURATION)
			.clamp(0.0, 1.0)
	}

	/// Position of the travelling dot along connector `index`, once it has drawn in.
	pub fn flow_fraction(&self, index: usize) -> Option<f64> {
		let start = CONNECTOR_DELAY + CONNECTOR_DURATION + index as f64 * ENTRANCE_STAGGER;
		(self.elapsed >= start).then(|| ((self.elapsed - start) % FLOW_PERIOD) / FLOW_PERIOD)
	}

	pub fn tick(&mut self, dt: f64) {
		self.elapsed += dt;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::layout::{LEFT_PADDING, NODE_HEIGHT, TOP_PADDING};
	use super::super::types::{NodeKind, WorkflowEdge, WorkflowNode};
	use super::*;

	fn chain(ids: &[&str]) -> WorkflowGraph {
		WorkflowGraph {
			nodes: ids
				.iter()
				.enumerate()
				.map(|(i, id)| WorkflowNode {
					id: (*id).into(),
					kind: if i == 0 { NodeKind::Entry } else { NodeKind::Process },
					label: id.to_uppercase(),
					description: Some(format!("step {i}")),
				})
				.collect(),
			edges: ids
				.windows(2)
				.map(|w| WorkflowEdge {
					from: w[0].into(),
					to: w[1].into(),
				})
				.collect(),
		}
	}

	#[test]
	fn opens_fitted() {
		// 3 columns: 3 * 280 + 40 = 880 wide, 170 tall
		let state = WorkflowChartState::new(&chain(&["a", "b", "c"]), 440.0, 600.0);
		assert_eq!(state.zoom.effective(), 0.5);
		assert!(!state.zoom.manual_override);

		let t = state.transform();
		assert_eq!(t.k, 0.5);
		assert_eq!(t.x, 0.0);
		assert_eq!(t.y, (600.0 - 170.0 * 0.5) / 2.0);
	}

	#[test]
	fn loading_a_new_graph_clears_manual_zoom() {
		let mut state = WorkflowChartState::new(&chain(&["a", "b"]), 2000.0, 1000.0);
		state.apply_zoom(ZoomEvent::In);
		state.start_pan(0.0, 0.0);
		state.drag_pan(30.0, 10.0);
		state.end_pan();
		assert!(state.zoom.manual_override);
		assert_eq!(state.offset_x, 30.0);

		state.load(&chain(&["x", "y", "z", "w"]));
		assert!(!state.zoom.manual_override);
		assert_eq!(state.zoom.effective(), 1.0);
		assert_eq!(state.offset_x, 0.0);
		assert_eq!(state.layout.columns, 4);
	}

	#[test]
	fn reset_clears_pan_and_override() {
		let mut state = WorkflowChartState::new(&chain(&["a", "b"]), 2000.0, 1000.0);
		state.apply_zoom(ZoomEvent::Out);
		state.start_pan(10.0, 10.0);
		state.drag_pan(50.0, 60.0);
		assert_eq!((state.offset_x, state.offset_y), (40.0, 50.0));

		state.apply_zoom(ZoomEvent::Reset);
		assert!(!state.zoom.manual_override);
		assert_eq!((state.offset_x, state.offset_y), (0.0, 0.0));
	}

	#[test]
	fn hit_testing_uses_canvas_coordinates() {
		let state = WorkflowChartState::new(&chain(&["a", "b"]), 600.0, 300.0);
		let t = state.transform();
		let sx = t.x + (LEFT_PADDING + 10.0) * t.k;
		let sy = t.y + (TOP_PADDING + NODE_HEIGHT / 2.0) * t.k;
		assert_eq!(state.node_at_position(sx, sy), Some("a"));
		assert_eq!(state.node_at_position(t.x + 1.0, t.y + 1.0), None);
	}

	#[test]
	fn hover_highlights_direct_neighbors() {
		let mut state = WorkflowChartState::new(&chain(&["a", "b", "c", "d"]), 800.0, 600.0);
		state.set_hover(Some("b"));
		assert!(state.is_hovered("b"));
		assert!(state.is_highlighted("a"));
		assert!(state.is_highlighted("c"));
		assert!(!state.is_highlighted("d"));

		state.set_hover(None);
		assert!(state.has_active_highlight());
		assert!(state.is_highlighted("c"));
	}

	#[test]
	fn highlight_fades_out_after_leave() {
		let mut state = WorkflowChartState::new(&chain(&["a", "b"]), 800.0, 600.0);
		state.set_hover(Some("a"));
		for _ in 0..60 {
			state.tick(0.016);
		}
		assert!(state.hover.highlight_t > 0.5);

		state.set_hover(None);
		for _ in 0..600 {
			state.tick(0.016);
		}
		assert_eq!(state.hover.highlight_t, 0.0);
		assert!(!state.has_active_highlight());
	}

	#[test]
	fn entrance_is_staggered() {
		let mut state = WorkflowChartState::new(&chain(&["a", "b", "c"]), 800.0, 600.0);
		assert_eq!(state.entrance_progress(0), 0.0);
		state.tick(0.25);
		assert_eq!(state.entrance_progress(0), 0.5);
		assert!(state.entrance_progress(1) < state.entrance_progress(0));
		assert_eq!(state.flow_fraction(0), None);
		assert_eq!(state.connector_progress(0), 0.0);
		state.tick(1.0);
		assert_eq!(state.connector_progress(0), 1.0);
		assert_eq!(state.entrance_progress(2), 1.0);
		assert!(state.flow_fraction(0).is_some());
	}

	#[test]
	fn resize_refits_without_dropping_manual_zoom() {
		let mut state = WorkflowChartState::new(&chain(&["a", "b", "c"]), 2000.0, 1000.0);
		state.resize(440.0, 1000.0);
		assert_eq!(state.zoom.effective(), 0.5);

		state.apply_zoom(ZoomEvent::In);
		state.resize(2000.0, 1000.0);
		assert!(state.zoom.manual_override);
		assert_eq!(state.zoom.auto_factor, 1.0);
	}
}
