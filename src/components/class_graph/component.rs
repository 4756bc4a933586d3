//! Leptos component wrapping the class-graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node clicks, dragging, panning, and zooming. An animation loop
//! runs via `requestAnimationFrame`, advancing the layout engine and drawing a
//! frame each time. Browser resources (frame request, resize listener) are
//! owned by a [`MountedCanvas`] and released when the component unmounts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::adapter::Graph;
use super::camera::ViewTransform;
use super::controller::InteractionController;
use super::layout::LayoutEngine;
use super::render::GraphRenderer;
use super::search::SearchHit;
use super::theme::Theme;
use crate::config::GraphConfig;

/// Pointer travel, in pixels, beyond which a press becomes a drag or pan.
const CLICK_SLOP_PX: f64 = 3.0;

/// Commands issued by the surrounding toolbar.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphCommand {
	/// Fit the whole graph and let it resettle.
	Reset,
	/// Highlight and center a search result.
	Focus(SearchHit),
}

/// Tracks an in-progress press on the canvas.
#[derive(Clone, Debug, Default)]
struct PointerState {
	/// Node being dragged, if the press started on one.
	drag: Option<usize>,
	panning: bool,
	start: (f64, f64),
	transform_start: ViewTransform,
	moved: bool,
}

/// Everything one visualization session mutates on the UI thread.
struct GraphSession {
	engine: LayoutEngine,
	renderer: GraphRenderer,
	controller: InteractionController,
	pointer: PointerState,
}

type SharedSession = Rc<RefCell<Option<GraphSession>>>;

/// Browser-side resources for a mounted canvas. Dropping it stops the frame
/// loop, removes the resize listener and tears the session down.
struct MountedCanvas {
	session: SharedSession,
	frame: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize: Option<Closure<dyn FnMut()>>,
}

impl Drop for MountedCanvas {
	fn drop(&mut self) {
		if let Some(window) = web_sys::window() {
			if let Some(id) = self.frame.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = self.resize.take() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
		if let Some(mut s) = self.session.borrow_mut().take() {
			s.controller.on_close(&mut s.engine);
		}
		debug!("kg-class-graph: canvas unmounted");
	}
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn local_point(canvas: Option<HtmlCanvasElement>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let rect = canvas?.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders an interactive class graph on a canvas sized to its parent.
///
/// `graph` is loaded once at mount; remount the component to show another
/// graph. `entity_id` starts out highlighted. Toolbar actions arrive through
/// `command`; every new value is executed, superseding camera work in flight.
#[component]
pub fn ClassGraphCanvas(
	graph: Graph,
	#[prop(into)] entity_id: String,
	config: GraphConfig,
	#[prop(into)] command: Signal<Option<GraphCommand>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session: SharedSession = Rc::new(RefCell::new(None));
	let mounted = StoredValue::new_local(None::<MountedCanvas>);
	let tooltip = RwSignal::new(None::<(String, f64, f64)>);

	let session_init = session.clone();
	let init_graph = RefCell::new(Some(graph));
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(graph) = init_graph.borrow_mut().take() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				warn!("kg-class-graph: no 2d context, class graph disabled");
				return;
			}
		};

		let mut engine = LayoutEngine::new(config.clone(), w, h);
		engine.load(graph);
		let (padding, duration) = (config.fit_padding_px, config.fit_duration_ms);
		engine.on_converge(move |e| e.fit_to_viewport(padding, duration, js_sys::Date::now()));

		*session_init.borrow_mut() = Some(GraphSession {
			engine,
			renderer: GraphRenderer::new(&config, Theme::default()),
			controller: InteractionController::new(&config, Some(entity_id.clone())),
			pointer: PointerState::default(),
		});

		let (session_resize, canvas_resize) = (session_init.clone(), canvas.clone());
		let resize: Closure<dyn FnMut()> = Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *session_resize.borrow_mut() {
				s.controller.on_viewport_resize(&mut s.engine, nw, nh);
			}
		});
		let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());

		let frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let (session_anim, animate_inner, frame_inner) =
			(session_init.clone(), animate.clone(), frame.clone());
		let mut ctx = ctx;
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *session_anim.borrow_mut() {
				s.engine.advance(js_sys::Date::now());
				s.controller.update(&s.engine);
				s.renderer.render(&s.engine, s.controller.highlighted(), &mut ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
				}
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			frame.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}

		mounted.set_value(Some(MountedCanvas {
			session: session_init.clone(),
			frame,
			animate,
			resize: Some(resize),
		}));
	});

	on_cleanup(move || mounted.set_value(None));

	let session_cmd = session.clone();
	Effect::new(move |_| {
		let Some(cmd) = command.get() else {
			return;
		};
		let now = js_sys::Date::now();
		if let Some(ref mut s) = *session_cmd.borrow_mut() {
			match cmd {
				GraphCommand::Reset => s.controller.on_reset_click(&mut s.engine, now),
				GraphCommand::Focus(hit) => {
					let _ = s.controller.on_search_select(&mut s.engine, &hit, now);
				}
			}
		}
	});

	let session_md = session.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *session_md.borrow_mut() {
			let drag = s.engine.node_at(x, y);
			s.pointer = PointerState {
				drag,
				panning: drag.is_none(),
				start: (x, y),
				transform_start: s.engine.transform(),
				moved: false,
			};
		}
	};

	let session_mm = session.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *session_mm.borrow_mut() {
			let p = &mut s.pointer;
			let (dx, dy) = (x - p.start.0, y - p.start.1);
			if (p.drag.is_some() || p.panning) && !p.moved && dx.hypot(dy) > CLICK_SLOP_PX {
				p.moved = true;
				if p.drag.is_some() {
					s.engine.reheat(js_sys::Date::now());
				}
			}

			if let (Some(slot), true) = (s.pointer.drag, s.pointer.moved) {
				let (wx, wy) = s.engine.transform().screen_to_world(x, y);
				s.engine.pin(slot, wx, wy);
			} else if s.pointer.panning && s.pointer.moved {
				let t = s.pointer.transform_start;
				s.engine.set_transform(ViewTransform {
					x: t.x + dx,
					y: t.y + dy,
					k: t.k,
				});
			}

			if s.pointer.drag.is_none() && !s.pointer.panning {
				let hovered = s
					.engine
					.node_at(x, y)
					.and_then(|slot| s.engine.graph().node(slot))
					.filter(|n| !n.tooltip.is_empty())
					.map(|n| (n.tooltip.clone(), x, y));
				tooltip.set(hovered);
			}
		}
	};

	let session_mu = session.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *session_mu.borrow_mut() {
			let pointer = std::mem::take(&mut s.pointer);
			if let (Some(slot), false) = (pointer.drag, pointer.moved) {
				let _ = s
					.controller
					.on_node_click(&mut s.engine, slot, js_sys::Date::now());
			}
		}
	};

	let session_ml = session.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *session_ml.borrow_mut() {
			s.pointer = PointerState::default();
		}
		tooltip.set(None);
	};

	let session_wh = session.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *session_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.engine.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="class-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		{move || {
			tooltip
				.get()
				.map(|(text, x, y)| {
					view! {
						<div
							class="class-graph-tooltip"
							style=format!("position: absolute; left: {}px; top: {}px;", x + 12.0, y + 12.0)
						>
							{text}
						</div>
					}
				})
		}}
	}
}
