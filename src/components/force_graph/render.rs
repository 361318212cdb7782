use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NodeInfo};
use super::types::{FONT_PX, Shape};

const BACKGROUND: &str = "#fafafa";
const EDGE_RGB: &str = "132, 132, 132";
const LABEL_COLOR: &str = "#333333";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let base_width = 2.0 / state.transform.k.max(0.5);

	state.graph.visit_edges(|n1, n2, _| {
		let is_highlighted = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());
		// t=0: every edge at 0.8; t=1: highlighted edges at 1.0, the rest fade to 0.2
		let (alpha, width) = if is_highlighted {
			(0.8 + 0.2 * t, base_width * (1.0 + 0.5 * t))
		} else {
			(0.8 - 0.6 * t, base_width)
		};

		ctx.set_stroke_style_str(&format!("rgba({EDGE_RGB}, {alpha})"));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);
	ctx.set_font(&format!("{FONT_PX}px sans-serif"));

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let dimmed = has_highlight && !state.is_highlighted(idx);
		let alpha = if dimmed { 1.0 - 0.7 * t } else { 1.0 };
		let grow = if state.is_hovered(idx) { 1.0 + 0.2 * t } else { 1.0 };
		let selected = state.selected == Some(idx);

		ctx.set_global_alpha(alpha);
		draw_shape(ctx, info, x, y, grow, selected);
		ctx.set_global_alpha(1.0);
	});
}

fn draw_shape(ctx: &CanvasRenderingContext2d, info: &NodeInfo, x: f64, y: f64, grow: f64, selected: bool) {
	let (style, label) = (&info.style, info.label.as_str());
	let border_width = if selected { 4.0 } else { 2.0 };
	match style.shape {
		Shape::Box => {
			// the label sits inside the box, vis-network style
			let (hw, hh) = info.half_extents;
			let (w, h) = (2.0 * hw * grow, 2.0 * hh * grow);
			let (left, top) = (x - w / 2.0, y - h / 2.0);

			ctx.set_fill_style_str(&style.fill);
			ctx.fill_rect(left, top, w, h);
			ctx.set_stroke_style_str(&style.border);
			ctx.set_line_width(border_width);
			ctx.stroke_rect(left, top, w, h);

			ctx.set_fill_style_str("white");
			ctx.set_text_align("center");
			let _ = ctx.fill_text(label, x, y + FONT_PX / 3.0);
		}
		Shape::Dot => {
			let radius = style.radius() * grow;
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(&style.fill);
			ctx.fill();
			ctx.set_stroke_style_str(&style.border);
			ctx.set_line_width(border_width);
			ctx.stroke();

			ctx.set_fill_style_str(LABEL_COLOR);
			ctx.set_text_align("center");
			let _ = ctx.fill_text(label, x, y + radius + FONT_PX + 2.0);
		}
	}
}
