use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasLine, CanvasState};
use super::types::{LineKind, Node, NodeStatus};

const NODE_RADIUS: f64 = 3.0;
const BACKGROUND: &str = "#0b0f1a";

fn line_rgb(kind: LineKind) -> &'static str {
	match kind {
		LineKind::Ambient => "100, 180, 255",
		LineKind::Overclock => "255, 120, 200",
		LineKind::Path => "120, 255, 170",
	}
}

/// Paint one frame of `state` as of `now`.
pub fn render(state: &CanvasState, now: f64, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	for line in state.lines() {
		draw_line(line, now, ctx);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	for node in state.nodes() {
		draw_node(node, ctx);
	}
}

fn draw_line(line: &CanvasLine, now: f64, ctx: &CanvasRenderingContext2d) {
	let (progress, opacity) = (line.progress(now), line.opacity(now));
	if progress <= 0.0 || opacity <= 0.0 {
		return;
	}
	let tip = line.from.lerp(&line.to, progress);
	let (alpha, width) = match line.kind {
		LineKind::Path => (0.9 * opacity, 2.0),
		_ => (0.5 * opacity, 1.0),
	};

	ctx.set_stroke_style_str(&format!("rgba({}, {})", line_rgb(line.kind), alpha));
	ctx.set_line_width(width);
	if line.dotted {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(2.0),
			&JsValue::from_f64(4.0),
		));
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
	ctx.begin_path();
	ctx.move_to(line.from.x, line.from.y);
	ctx.line_to(tip.x, tip.y);
	ctx.stroke();
}

fn draw_node(node: &Node, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (node.position.x, node.position.y);
	let (fill, glow) = match node.status {
		NodeStatus::Idle => ("rgba(180, 200, 255, 0.6)", None),
		NodeStatus::Active => ("rgba(255, 255, 255, 1)", Some("255, 255, 255")),
		NodeStatus::Sending => ("rgba(120, 255, 170, 1)", Some("120, 255, 170")),
	};

	if let Some(rgb) = glow {
		let glow_radius = NODE_RADIUS * 4.0;
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, NODE_RADIUS * 0.5, x, y, glow_radius) {
			let _ = gradient.add_color_stop(0.0, &format!("rgba({rgb}, 0.45)"));
			let _ = gradient.add_color_stop(1.0, &format!("rgba({rgb}, 0)"));
			ctx.begin_path();
			let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	ctx.begin_path();
	let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(fill);
	ctx.fill();

	if node.on_path {
		ctx.set_stroke_style_str(&format!("rgba({}, 0.8)", line_rgb(LineKind::Path)));
		ctx.set_line_width(1.0);
		ctx.begin_path();
		let _ = ctx.arc(x, y, NODE_RADIUS * 2.0, 0.0, 2.0 * PI);
		ctx.stroke();
	}
}
