use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent, Window,
};

use super::controls::SettingsPanel;
use super::legend::Legend;
use super::render;
use super::scale::Encodings;
use super::simulation::ForceSettings;
use super::state::{GraphViewConfig, GraphViewState, Release};
use super::tooltip::Tooltip;
use super::types::GraphData;

#[component]
pub fn ForceGraphCanvas(
	data: GraphData,
	#[prop(optional)] config: GraphViewConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphViewState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	let encodings = Encodings::new(&data, config.radius_range);
	let legend = encodings.legend();
	let defaults = config.settings;
	let tooltip = RwSignal::new(None::<Tooltip>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			viewport_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() = Some(GraphViewState::new(
			&data,
			&encodings,
			config.clone(),
			w,
			h,
		));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// One simulation step and one redraw per frame.
		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let canvas_point = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	// Capture the pointer on press so a drag keeps tracking outside the canvas.
	let state_md = state.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let mouse: &MouseEvent = &ev;
		let Some((x, y)) = canvas_point(mouse) else {
			return;
		};
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			let _ = canvas.set_pointer_capture(ev.pointer_id());
		}
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let mouse: &MouseEvent = &ev;
		let Some((x, y)) = canvas_point(mouse) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.drag_to(x, y);
		}
	};

	let state_mu = state.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let mut guard = state_mu.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		match s.release() {
			Release::NodeClick(idx) => {
				let viewport_width = web_sys::window()
					.map(|w| viewport_size(&w).0)
					.unwrap_or(s.width);
				if let Some(content) = s.tooltip_for(idx) {
					debug!("Showing tooltip for node {}", content.id);
					tooltip.set(Some(Tooltip::at_pointer(
						content.clone(),
						ev.page_x() as f64,
						ev.page_y() as f64,
						viewport_width,
					)));
				}
			}
			Release::BackgroundClick => tooltip.set(None),
			Release::Moved | Release::None => {}
		}
	};

	let state_pc = state.clone();
	let on_pointercancel = move |_: PointerEvent| {
		if let Some(ref mut s) = *state_pc.borrow_mut() {
			s.release();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let mouse: &MouseEvent = &ev;
		let Some((x, y)) = canvas_point(mouse) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	let state_stop = state.clone();
	let on_stop = move || {
		if let Some(ref mut s) = *state_stop.borrow_mut() {
			s.stop_layout();
		}
	};

	let state_apply = state.clone();
	let on_apply = move |settings: ForceSettings| {
		if let Some(ref mut s) = *state_apply.borrow_mut() {
			s.apply_settings(settings);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointercancel=on_pointercancel
			on:wheel=on_wheel
			style="display: block; cursor: grab; touch-action: none;"
		/>
		<div
			id="tooltip"
			class:show=move || tooltip.with(Option::is_some)
			style:right=move || {
				tooltip.with(|t| t.as_ref().map(|t| format!("{}px", t.right)).unwrap_or_default())
			}
			style:top=move || {
				tooltip.with(|t| t.as_ref().map(|t| format!("{}px", t.top)).unwrap_or_default())
			}
		>
			{move || {
				tooltip
					.get()
					.map(|t| {
						t.content
							.rows()
							.into_iter()
							.map(|(label, value)| {
								view! {
									<strong>{label}</strong>
									" "
									{value}
									<br />
								}
							})
							.collect_view()
					})
			}}
		</div>
		<Legend entries=legend />
		<SettingsPanel defaults=defaults on_apply=on_apply on_stop=on_stop />
	}
}

fn viewport_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}
