//! Column layout for workflow graphs.
//!
//! Nodes are layered by breadth-first distance from the entry node; each
//! layer becomes a column and nodes stack top to bottom in input order.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use super::types::{NodeKind, WorkflowGraph};

pub const NODE_WIDTH: f64 = 200.0;
pub const NODE_HEIGHT: f64 = 90.0;
pub const COLUMN_GAP: f64 = 80.0;
pub const ROW_GAP: f64 = 40.0;
pub const LEFT_PADDING: f64 = 40.0;
pub const TOP_PADDING: f64 = 40.0;
pub const CANVAS_MARGIN: f64 = 40.0;
pub const MIN_CANVAS_WIDTH: f64 = 400.0;
pub const MIN_CANVAS_HEIGHT: f64 = 300.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	pub fn center_y(&self) -> f64 {
		self.y + self.height / 2.0
	}

	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
	/// Node rectangles keyed by id, in input node order.
	pub positions: IndexMap<String, Rect>,
	pub depths: IndexMap<String, usize>,
	pub columns: usize,
	pub canvas_width: f64,
	pub canvas_height: f64,
}

impl Layout {
	fn empty() -> Self {
		Self {
			positions: IndexMap::new(),
			depths: IndexMap::new(),
			columns: 0,
			canvas_width: MIN_CANVAS_WIDTH,
			canvas_height: MIN_CANVAS_HEIGHT,
		}
	}

	pub fn rect(&self, id: &str) -> Option<&Rect> {
		self.positions.get(id)
	}
}

/// Lays out `graph` into columns. Never fails: edges naming unknown ids are
/// ignored and an empty graph yields the minimum canvas.
pub fn compute_layout(graph: &WorkflowGraph) -> Layout {
	let Some(entry) = graph
		.nodes
		.iter()
		.find(|n| n.kind == NodeKind::Entry)
		.or_else(|| graph.nodes.first())
	else {
		return Layout::empty();
	};

	let depths = assign_depths(graph, &entry.id);
	let columns = depths.values().copied().max().map_or(0, |d| d + 1);

	let mut rows = vec![0usize; columns];
	let mut positions = IndexMap::with_capacity(depths.len());
	for (id, &depth) in &depths {
		let row = rows[depth];
		rows[depth] += 1;
		positions.insert(
			id.clone(),
			Rect {
				x: depth as f64 * (NODE_WIDTH + COLUMN_GAP) + LEFT_PADDING,
				y: TOP_PADDING + row as f64 * (NODE_HEIGHT + ROW_GAP),
				width: NODE_WIDTH,
				height: NODE_HEIGHT,
			},
		);
	}

	let canvas_width = columns as f64 * (NODE_WIDTH + COLUMN_GAP) + CANVAS_MARGIN;
	let canvas_height = positions
		.values()
		.map(Rect::bottom)
		.fold(0.0, f64::max)
		+ CANVAS_MARGIN;

	Layout {
		positions,
		depths,
		columns,
		canvas_width,
		canvas_height,
	}
}

/// Breadth-first depth from `entry`. The first time a node is reached fixes
/// its depth; nodes never reached land one column past the deepest one.
fn assign_depths(graph: &WorkflowGraph, entry: &str) -> IndexMap<String, usize> {
	let known: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

	let mut successors: IndexMap<&str, Vec<&str>> = IndexMap::new();
	for edge in &graph.edges {
		if known.contains(edge.from.as_str()) && known.contains(edge.to.as_str()) {
			successors
				.entry(edge.from.as_str())
				.or_default()
				.push(edge.to.as_str());
		}
	}

	let mut reached: IndexMap<&str, usize> = IndexMap::new();
	let mut queue = VecDeque::new();
	reached.insert(entry, 0);
	queue.push_back(entry);

	while let Some(id) = queue.pop_front() {
		let depth = reached[id];
		for &next in successors.get(id).into_iter().flatten() {
			if !reached.contains_key(next) {
				reached.insert(next, depth + 1);
				queue.push_back(next);
			}
		}
	}

	let orphan_depth = reached.values().copied().max().unwrap_or(0) + 1;

	// Re-key in input order so columns keep the node list's ordering.
	let mut depths = IndexMap::with_capacity(graph.nodes.len());
	for node in &graph.nodes {
		if depths.contains_key(&node.id) {
			continue;
		}
		let depth = reached
			.get(node.id.as_str())
			.copied()
			.unwrap_or(orphan_depth);
		depths.insert(node.id.clone(), depth);
	}
	depths
}
