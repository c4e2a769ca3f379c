use leptos::prelude::*;
use wasm_bindgen::JsValue;
use web_sys::{KeyboardEvent, MouseEvent};

use super::actions::LayoutAction;
use super::storage::LayoutSummary;

fn format_created(created_at: f64) -> String {
	let date = js_sys::Date::new(&JsValue::from_f64(created_at));
	String::from(date.to_locale_string("default", &JsValue::UNDEFINED))
}

/// Modal listing saved layouts, with save, load, delete and reset controls.
#[component]
pub fn LayoutPanel(
	open: RwSignal<bool>,
	#[prop(into)] layouts: Signal<Vec<LayoutSummary>>,
	actions: WriteSignal<Option<LayoutAction>>,
) -> impl IntoView {
	let name = RwSignal::new(String::new());

	let submit = move || {
		let value = name.get_untracked();
		actions.set(Some(LayoutAction::Save(value)));
		name.set(String::new());
	};

	view! {
		<Show when=move || open.get()>
			<div class="layout-modal-backdrop" on:click=move |_| open.set(false)>
				<div class="layout-modal" on:click=|ev: MouseEvent| ev.stop_propagation()>
					<div class="layout-modal-header">
						<h2>"Saved layouts"</h2>
						<button class="layout-close" on:click=move |_| open.set(false)>
							"Close"
						</button>
					</div>

					<div class="layout-save">
						<input
							type="text"
							placeholder="Layout name"
							prop:value=move || name.get()
							on:input=move |ev| name.set(event_target_value(&ev))
							on:keydown=move |ev: KeyboardEvent| {
								if ev.key() == "Enter" {
									submit();
								}
							}
						/>
						<button class="layout-save-button" on:click=move |_| submit()>
							"Save"
						</button>
					</div>

					{move || {
						let items = layouts.get();
						if items.is_empty() {
							return view! { <p class="layout-empty">"No saved layouts yet."</p> }
								.into_any();
						}
						view! {
							<ul class="layout-list">
								{items
									.into_iter()
									.map(|layout| {
										let (load_name, delete_name) = (
											layout.name.clone(),
											layout.name.clone(),
										);
										view! {
											<li class="layout-item">
												<div class="layout-meta">
													<strong>{layout.name.clone()}</strong>
													<span>
														{format!(
															"{} proxies · {}",
															layout.proxy_count,
															format_created(layout.created_at),
														)}
													</span>
												</div>
												<button on:click=move |_| {
													actions.set(Some(LayoutAction::Load(load_name.clone())))
												}>"Load"</button>
												<button
													class="layout-delete"
													on:click=move |_| {
														actions.set(Some(LayoutAction::Delete(delete_name.clone())))
													}
												>
													"Delete"
												</button>
											</li>
										}
									})
									.collect_view()}
							</ul>
						}
							.into_any()
					}}

					<div class="layout-modal-footer">
						<button
							class="layout-reset"
							on:click=move |_| actions.set(Some(LayoutAction::Reset))
						>
							"Reset to default"
						</button>
					</div>
				</div>
			</div>
		</Show>
	}
}
