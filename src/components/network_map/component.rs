use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::actions::{self, LayoutAction};
use super::config::MapConfig;
use super::layout_panel::LayoutPanel;
use super::render;
use super::state::{HitTarget, MapState};
use super::storage::{LayoutStore, LayoutSummary, StoreError};
use super::tooltip::{MapTooltip, TooltipView};
use super::types::ProxyDescriptor;

type SharedState = Rc<RefCell<Option<MapState>>>;

fn window_size(window: &Window) -> (f64, f64) {
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

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn alert(message: &str) {
	if let Some(window) = web_sys::window() {
		let _ = window.alert_with_message(message);
	}
}

fn confirm(message: &str) -> bool {
	web_sys::window()
		.and_then(|window| window.confirm_with_message(message).ok())
		.unwrap_or(false)
}

/// Background persistence after a drag: failures are logged, never shown.
fn save_current(map: &MapState) {
	let result = LayoutStore::browser(&map.config.storage_prefix)
		.and_then(|mut layouts| actions::persist_current(map, &mut layouts));
	if let Err(err) = result {
		warn!("Could not persist proxy positions: {err}");
	}
}

fn cursor_for(map: &MapState) -> &'static str {
	if map.drag.active {
		"grabbing"
	} else if matches!(map.hover, Some(HitTarget::Proxy(_))) {
		"grab"
	} else if map.hover.is_some() {
		"pointer"
	} else {
		"default"
	}
}

#[component]
pub fn NetworkMapCanvas(
	#[prop(into)] proxies: Signal<Vec<ProxyDescriptor>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: MapConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	let tooltip = RwSignal::new(None::<TooltipView>);
	let cursor = RwSignal::new("default");
	let panel_open = RwSignal::new(false);
	let layouts = RwSignal::new(Vec::<LayoutSummary>::new());
	let (layout_action, dispatch) = signal(None::<LayoutAction>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
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

		let Some(ctx) = context_2d(&canvas) else {
			error!("Canvas 2d context unavailable, network map disabled");
			return;
		};

		let mut map = MapState::new(&proxies.get(), w, h, config.clone());
		match LayoutStore::browser(&map.config.storage_prefix) {
			Ok(store) => {
				let applied = map.apply_positions(&store.load_current());
				debug!("Restored {applied} saved proxy positions");
				layouts.set(store.list_layouts());
			}
			Err(err) => warn!("Saved positions unavailable: {err}"),
		}
		info!("Network map ready with {} proxies", map.proxies.len());
		*state_init.borrow_mut() = Some(map);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
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

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.should_paint(now) {
					s.clock = now;
					render::render(s, &ctx);
					s.painted(now);
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_actions = state.clone();
	Effect::new(move |_| {
		let Some(action) = layout_action.get() else {
			return;
		};
		let mut guard = state_actions.borrow_mut();
		let Some(map) = guard.as_mut() else {
			warn!("Ignoring {action:?}: network map is not initialized");
			return;
		};
		let prefix = map.config.storage_prefix.clone();
		let result = LayoutStore::browser(&prefix).and_then(|mut store| {
			actions::apply_action(map, &mut store, action, js_sys::Date::now(), |name| {
				confirm(&format!("A layout named \"{name}\" already exists. Replace it?"))
			})?;
			Ok(store.list_layouts())
		});
		match result {
			Ok(list) => layouts.set(list),
			Err(err) => {
				error!("Layout action failed: {err}");
				let message = match err {
					StoreError::NotFound(name) => format!("Layout \"{name}\" was not found."),
					other => format!("Could not update layouts: {other}"),
				};
				alert(&message);
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if s.begin_drag(x, y) {
				tooltip.set(None);
				cursor.set(cursor_for(s));
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
				return;
			}
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
			tooltip.set(hovered.and_then(|target| {
				s.node(target).map(|node| {
					TooltipView::at_pointer(ev.client_x() as f64, ev.client_y() as f64, node)
				})
			}));
			cursor.set(cursor_for(s));
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.end_drag() {
				save_current(s);
			}
			cursor.set(cursor_for(s));
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			if s.end_drag() {
				save_current(s);
			}
			s.set_hover(None);
		}
		tooltip.set(None);
		cursor.set("default");
	};

	let open_panel = move |_: MouseEvent| {
		dispatch.set(Some(LayoutAction::Refresh));
		panel_open.set(true);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style:display="block"
			style:cursor=move || cursor.get()
		/>
		<MapTooltip tooltip=tooltip />
		<div class="map-toolbar">
			<button class="map-toolbar-button" on:click=open_panel>
				"Layouts"
			</button>
		</div>
		<LayoutPanel open=panel_open layouts=layouts actions=dispatch />
	}
}
