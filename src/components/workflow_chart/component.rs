use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::WorkflowChartState;
use super::types::WorkflowGraph;
use super::zoom::ZoomEvent;

type SharedState = Rc<RefCell<Option<WorkflowChartState>>>;
type FrameCallback = Closure<dyn FnMut()>;

/// Callbacks a mounted chart hands to the browser.
///
/// The animation closure holds a clone of these handles, so it keeps itself
/// alive until [`LoopHandles::stop`] takes it out. `alive` is flipped by the
/// component's cleanup; the next frame then stops the loop.
struct LoopHandles<C> {
	alive: Arc<AtomicBool>,
	animate: Rc<RefCell<Option<C>>>,
	resize: Rc<RefCell<Option<C>>>,
}

impl<C> Clone for LoopHandles<C> {
	fn clone(&self) -> Self {
		Self {
			alive: self.alive.clone(),
			animate: self.animate.clone(),
			resize: self.resize.clone(),
		}
	}
}

impl<C> LoopHandles<C> {
	fn new() -> Self {
		Self {
			alive: Arc::new(AtomicBool::new(true)),
			animate: Rc::new(RefCell::new(None)),
			resize: Rc::new(RefCell::new(None)),
		}
	}

	fn is_alive(&self) -> bool {
		self.alive.load(Ordering::Relaxed)
	}

	/// Release both callbacks. `unregister` sees the resize callback before
	/// it is dropped; the animation callback goes last since it may be the
	/// caller.
	fn stop(&self, unregister: impl FnOnce(&C)) {
		self.alive.store(false, Ordering::Relaxed);
		let resize = self.resize.borrow_mut().take();
		if let Some(cb) = &resize {
			unregister(cb);
		}
		drop(resize);
		let animate = self.animate.borrow_mut().take();
		drop(animate);
	}
}

fn viewport_size(
	canvas: &HtmlCanvasElement,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas flowchart for a workflow graph with zoom controls.
///
/// A new `data` value re-runs the layout and opens the view fitted again.
#[component]
pub fn WorkflowChart(
	#[prop(into)] data: Signal<WorkflowGraph>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let handles = LoopHandles::<FrameCallback>::new();
	let zoom_level = RwSignal::new(1.0_f64);
	let (state_init, handles_init) = (state.clone(), handles.clone());

	let alive = handles.alive.clone();
	on_cleanup(move || alive.store(false, Ordering::Relaxed));

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(s) = state_init.borrow_mut().as_mut() {
			debug!("workflow graph changed, refitting");
			s.load(&graph);
			zoom_level.set(s.zoom.effective());
			return;
		}

		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas 2d context unavailable");
			return;
		};

		let (w, h) = viewport_size(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let initial = WorkflowChartState::new(&graph, w, h);
		zoom_level.set(initial.zoom.effective());
		*state_init.borrow_mut() = Some(initial);

		let (state_resize, canvas_resize, alive_resize) =
			(state_init.clone(), canvas.clone(), handles_init.alive.clone());
		*handles_init.resize.borrow_mut() = Some(Closure::new(move || {
			if !alive_resize.load(Ordering::Relaxed) {
				return;
			}
			let (nw, nh) = viewport_size(&canvas_resize, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
				zoom_level.set(s.zoom.effective());
			}
		}));
		if let Some(ref cb) = *handles_init.resize.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, handles_anim, window_anim) =
			(state_init.clone(), handles_init.clone(), window.clone());
		*handles_init.animate.borrow_mut() = Some(Closure::new(move || {
			if !handles_anim.is_alive() {
				debug!("workflow chart unmounted, animation loop stopped");
				state_anim.borrow_mut().take();
				// drops this closure; nothing captured is touched afterwards
				handles_anim.stop(|cb| {
					let _ = window_anim
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				});
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *handles_anim.animate.borrow() {
				let _ = window_anim.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *handles_init.animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let zoom_with = {
		let state = state.clone();
		move |event: ZoomEvent| {
			if let Some(ref mut s) = *state.borrow_mut() {
				s.apply_zoom(event);
				zoom_level.set(s.zoom.effective());
			}
		}
	};
	let (zoom_in, zoom_out, zoom_reset, zoom_wheel) = (
		zoom_with.clone(),
		zoom_with.clone(),
		zoom_with.clone(),
		zoom_with,
	);

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if s.node_at_position(x, y).is_none() {
				s.start_pan(x, y);
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.drag_pan(x, y);
				return;
			}
			let hovered = s.node_at_position(x, y).map(str::to_owned);
			if let Some(canvas) = canvas_ref.get() {
				let cursor = if hovered.is_some() { "pointer" } else { "grab" };
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			}
			s.set_hover(hovered.as_deref());
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_pan();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_pan();
			s.set_hover(None);
		}
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		zoom_wheel(if ev.delta_y() > 0.0 {
			ZoomEvent::Out
		} else {
			ZoomEvent::In
		});
	};

	view! {
		<div class="workflow-chart" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="workflow-chart-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="workflow-chart-controls">
				<button title="Zoom in" on:click=move |_| zoom_in(ZoomEvent::In)>"+"</button>
				<button title="Zoom out" on:click=move |_| zoom_out(ZoomEvent::Out)>"−"</button>
				<button title="Fit to view" on:click=move |_| zoom_reset(ZoomEvent::Reset)>"Fit"</button>
				<span class="workflow-chart-zoom">
					{move || format!("{:.0}%", zoom_level.get() * 100.0)}
				</span>
			</div>
		</div>
	}
}
