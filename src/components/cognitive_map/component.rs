use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::graph::Graph;
use super::interaction::PointerEvent;
use super::render;
use super::state::MapState;
use super::types::{CanvasConfig, LayoutVariant, Point, SimulationConfig};

/// `MouseEvent.button` of the main (usually left) button.
const PRIMARY_BUTTON: i16 = 0;

type SharedState = Rc<RefCell<Option<MapState>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Owned handle to the animation-frame loop of one mounted graph.
/// Cancelling it guarantees no further frame touches the state.
struct FrameLoop {
	live: Rc<Cell<bool>>,
	request: Rc<Cell<Option<i32>>>,
	callback: FrameCallback,
}

impl FrameLoop {
	fn start(state: SharedState, ctx: CanvasRenderingContext2d) -> Option<Self> {
		let window = web_sys::window()?;
		let live = Rc::new(Cell::new(true));
		let request = Rc::new(Cell::new(None));
		let callback: FrameCallback = Rc::new(RefCell::new(None));

		let (live_cb, request_cb, callback_cb) = (live.clone(), request.clone(), callback.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			request_cb.set(None);
			let attached = ctx.canvas().is_some_and(|c| c.is_connected());
			if !live_cb.get() || !attached {
				live_cb.set(false);
				return;
			}
			if let Some(ref mut s) = *state.borrow_mut() {
				if s.tick() {
					render::render(&s.scene(), &ctx);
				}
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), callback_cb.borrow().as_ref()) {
				if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
					request_cb.set(Some(id));
				}
			}
		}));

		let id = callback
			.borrow()
			.as_ref()
			.and_then(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()).ok())?;
		request.set(Some(id));
		debug!("cognitive map: frame loop started");
		Some(Self {
			live,
			request,
			callback,
		})
	}

	fn cancel(self) {
		self.live.set(false);
		if let (Some(id), Some(window)) = (self.request.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		// Dropping the closure breaks its self-reference.
		self.callback.borrow_mut().take();
		debug!("cognitive map: frame loop cancelled");
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Pointer position in logical canvas units, compensating for CSS scaling.
fn pointer_at(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	if rect.width() <= 0.0 || rect.height() <= 0.0 {
		return None;
	}
	let (sx, sy) = (
		canvas.width() as f64 / rect.width(),
		canvas.height() as f64 / rect.height(),
	);
	Some(Point::new(
		(ev.client_x() as f64 - rect.left()) * sx,
		(ev.client_y() as f64 - rect.top()) * sy,
	))
}

#[component]
pub fn CognitiveMapCanvas(
	#[prop(into)] graph: Signal<Option<Graph>>,
	selection: RwSignal<Option<String>>,
	#[prop(into, default = Signal::stored(LayoutVariant::Force))] variant: Signal<LayoutVariant>,
	#[prop(optional)] simulation: SimulationConfig,
	#[prop(optional)] canvas: CanvasConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let cursor = RwSignal::new("default");
	let state: SharedState = Rc::new(RefCell::new(None));
	let frame: Rc<RefCell<Option<FrameLoop>>> = Rc::new(RefCell::new(None));
	let (state_fx, frame_fx) = (state.clone(), frame.clone());

	// Re-runs on mount, on every graph replacement and on variant changes.
	Effect::new(move |_| {
		let next = graph.get().unwrap_or_default();
		let variant = variant.get();
		let Some(element) = canvas_ref.get() else {
			return;
		};

		if let Some(old) = frame_fx.borrow_mut().take() {
			old.cancel();
		}
		if let Some(mut old) = state_fx.borrow_mut().take() {
			old.stop();
		}
		cursor.set("default");

		let element: HtmlCanvasElement = element.into();
		element.set_width(canvas.width as u32);
		element.set_height(canvas.height as u32);
		let Some(ctx) = context_2d(&element) else {
			warn!("cognitive map: 2d canvas context unavailable");
			return;
		};

		let mut next = MapState::new(next, variant, &simulation, canvas);
		let previous = selection.get_untracked();
		next.restore_selection(previous.as_deref());
		if next.selected_edge_id() != previous.as_deref() {
			selection.set(None);
		}
		*state_fx.borrow_mut() = Some(next);
		*frame_fx.borrow_mut() = FrameLoop::start(state_fx.clone(), ctx);
	});

	let teardown = StoredValue::new_local((state.clone(), frame.clone()));
	on_cleanup(move || {
		teardown.try_with_value(|(state, frame)| {
			if let Some(f) = frame.borrow_mut().take() {
				f.cancel();
			}
			if let Some(mut s) = state.borrow_mut().take() {
				s.stop();
			}
		});
	});

	// Events arriving after teardown find no state and do nothing.
	let dispatch = move |event: PointerEvent| {
		let (change, hint) = {
			let mut guard = state.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			(s.handle_pointer(event), s.cursor())
		};
		cursor.set(hint);
		if let Some(change) = change {
			debug!("cognitive map: selection {:?}", change);
			selection.set(change.into_id());
		}
	};

	let dispatch_md = dispatch.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != PRIMARY_BUTTON {
			return;
		}
		if let Some(at) = pointer_at(canvas_ref, &ev) {
			dispatch_md(PointerEvent::Down(at));
		}
	};

	let dispatch_mm = dispatch.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(at) = pointer_at(canvas_ref, &ev) {
			dispatch_mm(PointerEvent::Move(at));
		}
	};

	let dispatch_mu = dispatch.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if ev.button() != PRIMARY_BUTTON {
			return;
		}
		if let Some(at) = pointer_at(canvas_ref, &ev) {
			dispatch_mu(PointerEvent::Up(at));
		}
	};

	let dispatch_cl = dispatch.clone();
	let on_click = move |ev: MouseEvent| {
		if let Some(at) = pointer_at(canvas_ref, &ev) {
			dispatch_cl(PointerEvent::Click(at));
		}
	};

	let on_mouseleave = move |_: MouseEvent| dispatch(PointerEvent::Leave);

	view! {
		<canvas
			node_ref=canvas_ref
			class="cognitive-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:click=on_click
			on:mouseleave=on_mouseleave
			style=move || {
				format!(
					"display: block; width: 100%; border: 1px solid #e0e0e0; border-radius: 4px; cursor: {};",
					cursor.get(),
				)
			}
		/>
	}
}
