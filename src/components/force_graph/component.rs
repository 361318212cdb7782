use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::{CLICK_TOLERANCE, ForceGraphState};
use super::types::RenderSet;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
	canvas
		.get_context("2d")
		.map_err(|e| format!("canvas context request failed: {e:?}"))?
		.ok_or_else(|| "canvas has no 2d context".to_string())?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| "2d context has an unexpected type".to_string())
}

/// A self-rescheduling frame callback and the id of its pending frame.
struct FrameLoop<F: 'static> {
	callback: StoredValue<Option<F>, LocalStorage>,
	pending: StoredValue<Option<i32>>,
}

impl<F: 'static> Clone for FrameLoop<F> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<F: 'static> Copy for FrameLoop<F> {}

impl<F: 'static> FrameLoop<F> {
	fn new() -> Self {
		Self {
			callback: StoredValue::new_local(None),
			pending: StoredValue::new(None),
		}
	}

	fn install(&self, callback: F) {
		self.callback.set_value(Some(callback));
	}

	/// Hands the callback to `request` and records the frame id it returns.
	/// Does nothing once stopped.
	fn schedule(&self, request: impl FnOnce(&F) -> Option<i32>) {
		let id = self
			.callback
			.try_with_value(|cb| cb.as_ref().and_then(request))
			.flatten();
		if id.is_some() {
			let _ = self.pending.try_set_value(id);
		}
	}

	/// Drops the callback; returns the frame that still has to be cancelled.
	fn stop(&self) -> Option<i32> {
		let _ = self.callback.try_update_value(|cb| cb.take());
		self.pending.try_update_value(|id| id.take()).flatten()
	}
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

fn pointer(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

/// Canvas force-directed graph.
///
/// `on_select` receives the id of a clicked node (press and release without a
/// drag). Setup failures are reported through `on_error` instead of panicking.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<RenderSet>,
	#[prop(into)] on_select: Callback<String>,
	#[prop(into)] on_error: Callback<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let frames = FrameLoop::<Closure<dyn FnMut()>>::new();
	let resize_cb = StoredValue::new_local(None::<Closure<dyn FnMut()>>);
	let started = Rc::new(Cell::new(false));
	let state_init = state.clone();

	on_cleanup(move || {
		let pending = frames.stop();
		if let Some(window) = web_sys::window() {
			if let Some(id) = pending {
				let _ = window.cancel_animation_frame(id);
			}
			resize_cb.try_with_value(|cb| {
				if let Some(cb) = cb {
					let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			});
		}
		let _ = resize_cb.try_update_value(|cb| cb.take());
		debug!("Graph canvas torn down");
	});

	Effect::new(move |_| {
		// tracked, so a filter change rebuilds the simulation
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = container_size(&canvas);
		*state_init.borrow_mut() = Some(ForceGraphState::new(&data, w, h));
		debug!("Graph view rebuilt with {} nodes", data.nodes.len());

		if started.get() {
			return;
		}
		let Some(window) = web_sys::window() else {
			on_error.run("no browser window available".into());
			return;
		};
		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				on_error.run(e);
				return;
			}
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		started.set(true);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		resize_cb.set_value(Some(Closure::new(move || {
			let (nw, nh) = container_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		})));
		resize_cb.with_value(|cb| {
			if let Some(cb) = cb {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		});

		let state_anim = state_init.clone();
		frames.install(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			frames.schedule(request_frame);
		}));
		frames.schedule(request_frame);
	});

	let canvas_el = move || canvas_ref.get().map(HtmlCanvasElement::from);

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_el() else {
			return;
		};
		let (x, y) = pointer(&canvas, ev.client_x(), ev.client_y());

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_el() else {
			return;
		};
		let (x, y) = pointer(&canvas, ev.client_x(), ev.client_y());

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}

			if s.drag.active {
				let (sx, sy) = (x - s.drag.start_x, y - s.drag.start_y);
				if !s.drag.moved && (sx * sx + sy * sy).sqrt() < CLICK_TOLERANCE {
					return;
				}
				s.drag.moved = true;
				if let Some(idx) = s.drag.node_idx {
					let (nx, ny) = (
						s.drag.node_start_x + (sx / s.transform.k) as f32,
						s.drag.node_start_y + (sy / s.transform.k) as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut clicked = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				if s.drag.moved {
					s.settle();
				} else if let Some(idx) = s.drag.node_idx {
					s.selected = Some(idx);
					clicked = s.node_id(idx);
				}
			}
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}
		// outside the borrow: the handler may rebuild the view
		if let Some(id) = clicked {
			on_select.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			if s.drag.moved {
				s.settle();
			}
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_el() else {
			return;
		};
		let (x, y) = pointer(&canvas, ev.client_x(), ev.client_y());

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use leptos::reactive::owner::Owner;

	use super::*;

	#[test]
	fn stopped_loop_schedules_nothing_and_hands_back_its_frame() {
		Owner::new().set();
		let frames = FrameLoop::<Box<dyn Fn() -> i32>>::new();
		frames.schedule(|_| Some(1));
		assert_eq!(frames.stop(), None);

		frames.install(Box::new(|| 7));
		frames.schedule(|cb| Some(cb()));
		assert_eq!(frames.stop(), Some(7));

		let mut requests = 0;
		frames.schedule(|_| {
			requests += 1;
			Some(8)
		});
		assert_eq!(requests, 0);
		assert_eq!(frames.stop(), None);
	}
}
