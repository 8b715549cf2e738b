use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::GraphViewState;

const BACKGROUND: &str = "#ffffff";
const LINK_COLOR: &str = "#999";
const PINNED_OUTLINE: &str = "#333";

pub fn render(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(LINK_COLOR);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	state.simulation.graph().visit_edges(|n1, n2, _| {
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
	});
	ctx.stroke();
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	state.simulation.graph().visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);

		ctx.begin_path();
		let _ = ctx.arc(x, y, info.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();

		// Dashed outline on the node currently held by the pointer.
		if info.pinned.is_some() {
			ctx.set_stroke_style_str(PINNED_OUTLINE);
			ctx.set_line_width(1.5 / k);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(3.0 / k),
				&JsValue::from_f64(2.0 / k),
			));
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	});
}
