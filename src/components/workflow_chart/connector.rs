use super::layout::{Layout, Rect};
use super::types::{NodeKind, WorkflowGraph};

pub type Point = (f64, f64);

/// A drawable edge: an axis-aligned elbow from source to target.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
	pub from: String,
	pub to: String,
	/// Kind of the source node; selects the stroke color.
	pub kind: NodeKind,
	pub points: [Point; 4],
}

/// Right-center of `from` to left-center of `to`, bending at the horizontal midpoint.
pub fn route_elbow(from: &Rect, to: &Rect) -> [Point; 4] {
	let (x1, y1) = (from.right(), from.center_y());
	let (x2, y2) = (to.x, to.center_y());
	let mid_x = (x1 + x2) / 2.0;
	[(x1, y1), (mid_x, y1), (mid_x, y2), (x2, y2)]
}

/// One connector per edge whose endpoints both have a position.
pub fn connectors(graph: &WorkflowGraph, layout: &Layout) -> Vec<Connector> {
	graph
		.edges
		.iter()
		.filter_map(|edge| {
			let (from, to) = (layout.rect(&edge.from)?, layout.rect(&edge.to)?);
			let kind = graph.node(&edge.from).map(|n| n.kind).unwrap_or_default();
			Some(Connector {
				from: edge.from.clone(),
				to: edge.to.clone(),
				kind,
				points: route_elbow(from, to),
			})
		})
		.collect()
}

impl Connector {
	pub fn length(&self) -> f64 {
		self.points
			.windows(2)
			.map(|w| (w[1].0 - w[0].0).abs() + (w[1].1 - w[0].1).abs())
			.sum()
	}

	/// Point at fraction `t` of the path length, `t` clamped to `[0, 1]`.
	pub fn point_at(&self, t: f64) -> Point {
		let total = self.length();
		if total <= 0.0 {
			return self.points[0];
		}
		let mut remaining = t.clamp(0.0, 1.0) * total;
		for w in self.points.windows(2) {
			let ((ax, ay), (bx, by)) = (w[0], w[1]);
			let seg = (bx - ax).abs() + (by - ay).abs();
			if remaining <= seg && seg > 0.0 {
				let f = remaining / seg;
				return (ax + (bx - ax) * f, ay + (by - ay) * f);
			}
			remaining -= seg;
		}
		self.points[3]
	}

	/// Leading part of the path covering fraction `t` of its length.
	pub fn prefix(&self, t: f64) -> Vec<Point> {
		let total = self.length();
		let mut remaining = t.clamp(0.0, 1.0) * total;
		let mut out = vec![self.points[0]];
		for w in self.points.windows(2) {
			let seg = (w[1].0 - w[0].0).abs() + (w[1].1 - w[0].1).abs();
			if remaining >= seg {
				out.push(w[1]);
				remaining -= seg;
			} else {
				let f = remaining / seg;
				out.push((w[0].0 + (w[1].0 - w[0].0) * f, w[0].1 + (w[1].1 - w[0].1) * f));
				break;
			}
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::super::layout::compute_layout;
	use super::super::types::{WorkflowEdge, WorkflowNode};
	use super::*;

	fn rect(x: f64, y: f64) -> Rect {
		Rect {
			x,
			y,
			width: 200.0,
			height: 90.0,
		}
	}

	fn sample() -> WorkflowGraph {
		let node = |id: &str, kind| WorkflowNode {
			id: id.into(),
			kind,
			label: id.into(),
			description: None,
		};
		let edge = |from: &str, to: &str| WorkflowEdge {
			from: from.into(),
			to: to.into(),
		};
		WorkflowGraph {
			nodes: vec![
				node("a", NodeKind::Entry),
				node("b", NodeKind::Api),
				node("c", NodeKind::Output),
			],
			edges: vec![edge("a", "b"), edge("b", "c"), edge("b", "missing"), edge("b", "c")],
		}
	}

	#[test]
	fn elbow_bends_at_midpoint() {
		let points = route_elbow(&rect(40.0, 40.0), &rect(320.0, 170.0));
		assert_eq!(
			points,
			[(240.0, 85.0), (280.0, 85.0), (280.0, 215.0), (320.0, 215.0)]
		);
	}

	#[test]
	fn unknown_targets_are_dropped() {
		let graph = sample();
		let layout = compute_layout(&graph);
		let list = connectors(&graph, &layout);

		assert_eq!(list.len(), 3);
		assert!(list.iter().all(|c| c.to != "missing"));
		assert_eq!(list[0].kind, NodeKind::Entry);
		assert_eq!(list[1].kind, NodeKind::Api);
		// parallel edges are kept and routed identically
		assert_eq!(list[1].points, list[2].points);
	}

	#[test]
	fn point_at_walks_the_polyline() {
		let connector = Connector {
			from: "a".into(),
			to: "b".into(),
			kind: NodeKind::Process,
			points: [(0.0, 0.0), (10.0, 0.0), (10.0, 20.0), (20.0, 20.0)],
		};
		assert_eq!(connector.length(), 40.0);
		assert_eq!(connector.point_at(0.0), (0.0, 0.0));
		assert_eq!(connector.point_at(0.25), (10.0, 0.0));
		assert_eq!(connector.point_at(0.5), (10.0, 10.0));
		assert_eq!(connector.point_at(1.0), (20.0, 20.0));
		assert_eq!(connector.point_at(3.0), (20.0, 20.0));
	}

	#[test]
	fn prefix_cuts_inside_a_segment() {
		let connector = Connector {
			from: "a".into(),
			to: "b".into(),
			kind: NodeKind::Process,
			points: [(0.0, 0.0), (10.0, 0.0), (10.0, 20.0), (20.0, 20.0)],
		};
		assert_eq!(connector.prefix(0.5), vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
		assert_eq!(connector.prefix(1.0).len(), 4);
		assert_eq!(connector.prefix(0.0), vec![(0.0, 0.0), (0.0, 0.0)]);
	}

	#[test]
	fn straight_connector_has_flat_bend() {
		let points = route_elbow(&rect(40.0, 40.0), &rect(320.0, 40.0));
		assert_eq!(points[1].1, points[2].1);
		let connector = Connector {
			from: "a".into(),
			to: "b".into(),
			kind: NodeKind::Process,
			points,
		};
		assert_eq!(connector.point_at(0.5), (280.0, 85.0));
	}
}
