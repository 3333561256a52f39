use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::encoding::NODE_STROKE;
use super::scene::{EdgeVisual, NodeVisual, Scene, Tooltip};

const BACKGROUND: &str = "#fafafa";
const ARROW_SIZE: f64 = 8.0;
const FONT: &str = "10px sans-serif";
const LABEL_FONT: &str = "bold 10px sans-serif";
const TOOLTIP_FONT: &str = "12px sans-serif";
const TOOLTIP_LINE: f64 = 16.0;
const TOOLTIP_PAD: f64 = 6.0;

const EMPTY_TITLE: &str = "No cognitive map yet";
const EMPTY_HINT: &str = "Enter a learning problem and run task decomposition first";

/// Clear the canvas and paint a whole scene.
pub fn render(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);

	if scene.is_empty() {
		draw_empty(scene, ctx);
		return;
	}
	for edge in &scene.edges {
		draw_edge(edge, ctx);
	}
	for edge in &scene.edges {
		draw_edge_label(edge, ctx);
	}
	for node in &scene.nodes {
		draw_node(node, ctx);
	}
	if let Some(tooltip) = &scene.tooltip {
		draw_tooltip(tooltip, scene, ctx);
	}
}

fn draw_empty(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	let (cx, cy) = (scene.width / 2.0, scene.height / 2.0);
	ctx.set_fill_style_str("#777");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font("16px sans-serif");
	let _ = ctx.fill_text(EMPTY_TITLE, cx, cy - 12.0);
	ctx.set_font(TOOLTIP_FONT);
	let _ = ctx.fill_text(EMPTY_HINT, cx, cy + 12.0);
}

fn draw_edge(edge: &EdgeVisual, ctx: &CanvasRenderingContext2d) {
	let (x1, y1, x2, y2) = (edge.from.x, edge.from.y, edge.to.x, edge.to.y);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (tip_x, tip_y) = (x2 - ux * edge.target_radius, y2 - uy * edge.target_radius);

	ctx.set_stroke_style_str(edge.style.color);
	ctx.set_line_width(edge.style.width);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	ctx.stroke();

	let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.set_fill_style_str(edge.style.color);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_edge_label(edge: &EdgeVisual, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#333");
	ctx.set_font(FONT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("alphabetic");
	let _ = ctx.fill_text(&edge.label, edge.label_at.x, edge.label_at.y);
}

fn draw_node(node: &NodeVisual, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (node.center.x, node.center.y);
	ctx.begin_path();
	let _ = ctx.arc(x, y, node.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(node.fill);
	ctx.fill();
	ctx.set_stroke_style_str(NODE_STROKE);
	ctx.set_line_width(2.0);
	ctx.stroke();

	if node.pinned {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(4.0),
			&JsValue::from_f64(3.0),
		));
		ctx.begin_path();
		let _ = ctx.arc(x, y, node.radius + 4.0, 0.0, 2.0 * PI);
		ctx.set_line_width(1.5);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	ctx.set_fill_style_str("white");
	ctx.set_font(LABEL_FONT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.label, x, y);
}

fn draw_tooltip(tooltip: &Tooltip, scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_font(TOOLTIP_FONT);
	let text_width = tooltip
		.lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let (w, h) = (
		text_width + TOOLTIP_PAD * 2.0,
		tooltip.lines.len() as f64 * TOOLTIP_LINE + TOOLTIP_PAD * 2.0,
	);
	// Keep the box on the canvas.
	let x = tooltip.anchor.x.min(scene.width - w).max(0.0);
	let y = tooltip.anchor.y.min(scene.height - h).max(0.0);

	ctx.set_fill_style_str("rgba(0, 0, 0, 0.8)");
	ctx.fill_rect(x, y, w, h);
	ctx.set_fill_style_str("white");
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	for (i, line) in tooltip.lines.iter().enumerate() {
		let _ = ctx.fill_text(
			line,
			x + TOOLTIP_PAD,
			y + TOOLTIP_PAD + i as f64 * TOOLTIP_LINE,
		);
	}
}
