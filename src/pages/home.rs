use leptos::prelude::*;
use log::{info, warn};

use crate::components::network_map::{
	NetworkMapCanvas, ProxyDescriptor, StatusCategory, parse_proxy_data,
};

/// Element carrying the serialized proxy list rendered by the dashboard.
const PROXY_DATA_ELEMENT_ID: &str = "proxy-data";
const PROXY_DATA_ATTRIBUTE: &str = "data-proxies";

/// Reads the proxy list once; `None` when the host page has no data element.
fn read_proxy_data() -> Option<Vec<ProxyDescriptor>> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(PROXY_DATA_ELEMENT_ID)?;
	let raw = element.get_attribute(PROXY_DATA_ATTRIBUTE).unwrap_or_default();
	match parse_proxy_data(&raw) {
		Ok(proxies) => Some(proxies),
		Err(err) => {
			warn!("Malformed {PROXY_DATA_ATTRIBUTE}, showing no proxies: {err}");
			Some(Vec::new())
		}
	}
}

/// Legend entry matching the canvas node colors.
#[component]
fn LegendItem(status: StatusCategory) -> impl IntoView {
	view! {
		<li class="legend-item">
			<span class="legend-swatch" style:background-color=status.color()></span>
			{status.description()}
		</li>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let Some(data) = read_proxy_data() else {
		info!("No #{PROXY_DATA_ELEMENT_ID} element on the page, network map disabled");
		return ().into_any();
	};
	let proxies = Signal::derive(move || data.clone());

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-map">
				<NetworkMapCanvas proxies=proxies fullscreen=true />
				<div class="map-overlay">
					<h1>"Proxy Network Map"</h1>
					<p class="subtitle">"Drag proxies to arrange them. Layouts are saved in this browser."</p>
					<ul class="legend">
						<LegendItem status=StatusCategory::Ok />
						<LegendItem status=StatusCategory::Warn />
						<LegendItem status=StatusCategory::Error />
					</ul>
				</div>
			</div>
		</ErrorBoundary>
	}
	.into_any()
}
