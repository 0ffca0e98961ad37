use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::connector::Point;
use super::layout::Rect;
use super::state::WorkflowChartState;
use super::types::{NodeShape, WorkflowNode};

const BACKGROUND: &str = "#04040c";
const GRID_SIZE: f64 = 32.0;
const ARROW_SIZE: f64 = 8.0;
const CORNER_RADIUS: f64 = 16.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &WorkflowChartState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	let t = state.transform();
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_grid(state, ctx);
	draw_connectors(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_grid(state: &WorkflowChartState, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (state.layout.canvas_width, state.layout.canvas_height);
	ctx.set_stroke_style_str("rgba(157, 78, 221, 0.12)");
	ctx.set_line_width(0.5);
	ctx.begin_path();
	let mut x = 0.0;
	while x <= w {
		ctx.move_to(x, 0.0);
		ctx.line_to(x, h);
		x += GRID_SIZE;
	}
	let mut y = 0.0;
	while y <= h {
		ctx.move_to(0.0, y);
		ctx.line_to(w, y);
		y += GRID_SIZE;
	}
	ctx.stroke();
}

fn draw_connectors(state: &WorkflowChartState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);

	for (i, connector) in state.connectors.iter().enumerate() {
		let reveal = state.connector_progress(i);
		if reveal <= 0.0 {
			continue;
		}
		let is_highlighted =
			state.is_highlighted(&connector.from) && state.is_highlighted(&connector.to);
		let alpha = if !state.has_active_highlight() {
			0.85
		} else if is_highlighted {
			0.85 + 0.15 * t
		} else {
			0.85 - 0.65 * t
		};

		let color = connector.kind.palette().color;
		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_fill_style_str(color);
		ctx.set_line_width(if is_highlighted { 2.0 + t } else { 2.0 });
		ctx.set_line_cap("round");
		trace_path(&connector.prefix(ease_out_cubic(reveal)), ctx);
		ctx.stroke();

		if reveal < 1.0 {
			continue;
		}
		let (x2, y2) = connector.points[3];
		ctx.begin_path();
		ctx.move_to(x2, y2);
		ctx.line_to(x2 - ARROW_SIZE * 1.25, y2 - ARROW_SIZE * 0.75);
		ctx.line_to(x2 - ARROW_SIZE * 1.25, y2 + ARROW_SIZE * 0.75);
		ctx.close_path();
		ctx.fill();

		if let Some(f) = state.flow_fraction(i) {
			let (dx, dy) = connector.point_at(f);
			ctx.begin_path();
			let _ = ctx.arc(dx, dy, 4.0, 0.0, 2.0 * PI);
			ctx.fill();
		}
	}
	ctx.set_global_alpha(1.0);
}

fn trace_path(points: &[Point], ctx: &CanvasRenderingContext2d) {
	let Some((first, rest)) = points.split_first() else {
		return;
	};
	ctx.begin_path();
	ctx.move_to(first.0, first.1);
	for &(x, y) in rest {
		ctx.line_to(x, y);
	}
}

fn draw_nodes(state: &WorkflowChartState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	// Hovered node last so its description overlaps neighbors
	let mut order: Vec<(usize, &WorkflowNode, &Rect)> = state
		.graph
		.nodes
		.iter()
		.enumerate()
		.filter_map(|(i, n)| state.layout.rect(&n.id).map(|r| (i, n, r)))
		.collect();
	order.sort_by_key(|(_, n, _)| state.is_hovered(&n.id));

	for (i, node, rect) in order {
		let appear = ease_out_cubic(state.entrance_progress(i));
		if appear <= 0.0 {
			continue;
		}
		let dim = if has_highlight && !state.is_highlighted(&node.id) {
			1.0 - 0.7 * t
		} else {
			1.0
		};
		ctx.set_global_alpha(appear * dim);
		draw_node(state, ctx, node, rect, (1.0 - appear) * -30.0);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_node(
	state: &WorkflowChartState,
	ctx: &CanvasRenderingContext2d,
	node: &WorkflowNode,
	rect: &Rect,
	lift: f64,
) {
	let palette = node.kind.palette();
	let hovered = state.hover.node.as_deref() == Some(node.id.as_str());
	let t = ease_out_cubic(state.hover.highlight_t);
	let grow = if hovered { 1.0 + 0.06 * t } else { 1.0 };

	let (w, h) = (rect.width * grow, rect.height * grow);
	let (x, y) = (
		rect.x - (w - rect.width) / 2.0,
		rect.y - (h - rect.height) / 2.0 + lift,
	);
	let shape = palette.shape;

	// offset shadow
	ctx.save();
	ctx.set_global_alpha(ctx.global_alpha() * 0.3);
	ctx.set_fill_style_str(palette.color);
	node_path(ctx, shape, x + 5.0, y + 6.0, w, h);
	ctx.fill();
	ctx.restore();

	ctx.save();
	ctx.set_shadow_color(palette.glow);
	ctx.set_shadow_blur(if hovered { 16.0 + 16.0 * t } else { 16.0 });
	ctx.set_fill_style_str(BACKGROUND);
	node_path(ctx, shape, x, y, w, h);
	ctx.fill();
	ctx.restore();

	ctx.set_fill_style_str(palette.fill);
	ctx.set_stroke_style_str(palette.color);
	ctx.set_line_width(2.5);
	node_path(ctx, shape, x, y, w, h);
	ctx.fill();
	ctx.stroke();

	let pad = shape.text_inset(w);
	ctx.set_fill_style_str(palette.color);
	ctx.set_font("700 9px sans-serif");
	let _ = ctx.fill_text(&node.kind.as_str().to_uppercase(), x + pad, y + 28.0);

	ctx.set_fill_style_str("#f1f5f9");
	ctx.set_font("700 13px sans-serif");
	let _ = ctx.fill_text_with_max_width(&node.label, x + pad, y + 48.0, w - 2.0 * pad);

	if hovered && t > 0.01 {
		if let Some(description) = &node.description {
			draw_description(ctx, description, x, y + h + 8.0, w, t);
		}
	}
}

fn draw_description(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64, width: f64, t: f64) {
	ctx.set_font("11px sans-serif");
	let lines = wrap_text(ctx, text, width - 24.0);
	let height = 16.0 * lines.len() as f64 + 16.0;

	ctx.save();
	ctx.set_global_alpha(t);
	ctx.set_fill_style_str("rgba(20, 20, 42, 0.95)");
	rounded_rect(ctx, x, y, width, height, 10.0);
	ctx.fill();
	ctx.set_fill_style_str("#94a3b8");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + 12.0, y + 20.0 + 16.0 * i as f64);
	}
	ctx.restore();
}

fn wrap_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> Vec<String> {
	let mut lines = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		let candidate = if current.is_empty() {
			word.to_string()
		} else {
			format!("{current} {word}")
		};
		let fits = ctx
			.measure_text(&candidate)
			.map(|m| m.width() <= max_width)
			.unwrap_or(true);
		if fits || current.is_empty() {
			current = candidate;
		} else {
			lines.push(std::mem::replace(&mut current, word.to_string()));
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
}

fn node_path(ctx: &CanvasRenderingContext2d, shape: NodeShape, x: f64, y: f64, w: f64, h: f64) {
	match shape {
		NodeShape::Pill => rounded_rect(ctx, x, y, w, h, h / 2.0),
		NodeShape::Rect => rounded_rect(ctx, x, y, w, h, CORNER_RADIUS),
		NodeShape::Diamond => {
			ctx.begin_path();
			ctx.move_to(x + w / 2.0, y);
			ctx.line_to(x + w, y + h / 2.0);
			ctx.line_to(x + w / 2.0, y + h);
			ctx.line_to(x, y + h / 2.0);
			ctx.close_path();
		}
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}
