use leptos::prelude::*;

use super::state::{Node, NodeKind};
use super::types::StatusCategory;

/// Pixel gap between the pointer and the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: f64 = 5.0;

/// What the tooltip describes, copied out of the hovered node.
#[derive(Clone, Debug, PartialEq)]
pub enum TooltipContent {
	Server {
		label: String,
	},
	Proxy {
		name: String,
		status: StatusCategory,
		mode: String,
		last_access: String,
		hosts_count: u32,
	},
}

impl TooltipContent {
	pub fn for_node(node: &Node) -> Self {
		match &node.kind {
			NodeKind::Server { label } => Self::Server {
				label: label.clone(),
			},
			NodeKind::Proxy(proxy) => Self::Proxy {
				name: proxy.name.clone(),
				status: proxy.status,
				mode: proxy.mode.clone(),
				last_access: proxy.last_access.clone(),
				hosts_count: proxy.hosts_count,
			},
		}
	}

	pub fn header_class(&self) -> String {
		let accent = match self {
			Self::Server { .. } => "server",
			Self::Proxy { status, .. } => status.css_class(),
		};
		format!("tooltip-header {accent}")
	}

	pub fn title(&self) -> &str {
		match self {
			Self::Server { label } => label,
			Self::Proxy { name, .. } => name,
		}
	}
}

/// Where and what to show, in viewport coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipView {
	pub left: f64,
	pub top: f64,
	pub content: TooltipContent,
}

impl TooltipView {
	pub fn at_pointer(client_x: f64, client_y: f64, node: &Node) -> Self {
		Self {
			left: client_x + TOOLTIP_OFFSET,
			top: client_y + TOOLTIP_OFFSET,
			content: TooltipContent::for_node(node),
		}
	}
}

pub fn status_icon(status: StatusCategory) -> &'static str {
	match status {
		StatusCategory::Ok => "bi-check-circle-fill",
		StatusCategory::Warn => "bi-exclamation-triangle-fill",
		StatusCategory::Error => "bi-x-circle-fill",
	}
}

#[component]
fn TooltipRow(label: &'static str, children: Children) -> impl IntoView {
	view! {
		<div class="tooltip-row">
			<span class="tooltip-label">{label}</span>
			<span class="tooltip-value">{children()}</span>
		</div>
	}
}

/// Header and detail rows; every proxy-supplied string is rendered as text.
#[component]
pub fn TooltipBody(content: TooltipContent) -> impl IntoView {
	let header_class = content.header_class();
	match content {
		TooltipContent::Server { label } => view! {
			<div class=header_class>
				<i class="bi bi-cloud-fill me-2"></i>
				{label}
			</div>
			<div class="tooltip-body">
				<div class="tooltip-row">
					<span>"Central monitoring"</span>
				</div>
			</div>
		}
		.into_any(),
		TooltipContent::Proxy {
			name,
			status,
			mode,
			last_access,
			hosts_count,
		} => view! {
			<div class=header_class>
				<i class="bi bi-hdd-network-fill me-2"></i>
				{name}
			</div>
			<div class="tooltip-body">
				<TooltipRow label="Status:">
					<span class=status.css_class()>
						<i class=format!("bi {} me-1", status_icon(status))></i>
						{status.description()}
					</span>
				</TooltipRow>
				<TooltipRow label="Mode:">{mode}</TooltipRow>
				<TooltipRow label="Last access:">{last_access}</TooltipRow>
				<TooltipRow label="Hosts:">
					<i class="bi bi-pc-display me-1"></i>
					{hosts_count}
				</TooltipRow>
			</div>
		}
		.into_any(),
	}
}

/// Floating tooltip positioned next to the pointer, hidden while `tooltip` is `None`.
#[component]
pub fn MapTooltip(tooltip: RwSignal<Option<TooltipView>>) -> impl IntoView {
	view! {
		<div
			id="map-tooltip"
			class="map-tooltip"
			style:display=move || if tooltip.with(Option::is_some) { "block" } else { "none" }
			style:left=move || tooltip.with(|t| t.as_ref().map(|t| format!("{}px", t.left)).unwrap_or_default())
			style:top=move || tooltip.with(|t| t.as_ref().map(|t| format!("{}px", t.top)).unwrap_or_default())
		>
			{move || tooltip.get().map(|t| view! { <TooltipBody content=t.content /> })}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::network_map::types::ProxyDescriptor;

	fn proxy_node(name: &str, status: StatusCategory) -> Node {
		Node {
			x: 10.0,
			y: 20.0,
			radius: 24.0,
			kind: NodeKind::Proxy(ProxyDescriptor {
				name: name.into(),
				status,
				hosts_count: 12,
				mode: "Passivo".into(),
				last_access: "3h atrás".into(),
			}),
		}
	}

	#[test]
	fn proxy_tooltip_carries_details() {
		let content = TooltipContent::for_node(&proxy_node("proxy-poa", StatusCategory::Warn));
		assert_eq!(
			content,
			TooltipContent::Proxy {
				name: "proxy-poa".into(),
				status: StatusCategory::Warn,
				mode: "Passivo".into(),
				last_access: "3h atrás".into(),
				hosts_count: 12,
			}
		);
		assert_eq!(content.header_class(), "tooltip-header warning");
		assert_eq!(status_icon(StatusCategory::Warn), "bi-exclamation-triangle-fill");
		assert_eq!(StatusCategory::Warn.description(), "Delayed update");
	}

	#[test]
	fn markup_in_names_is_kept_as_plain_text() {
		let content = TooltipContent::for_node(&proxy_node("<b>proxy</b> & co", StatusCategory::Error));
		assert_eq!(content.title(), "<b>proxy</b> & co");
		assert_eq!(content.header_class(), "tooltip-header danger");
	}

	#[test]
	fn server_tooltip_and_offset() {
		let server = Node {
			x: 0.0,
			y: 0.0,
			radius: 35.0,
			kind: NodeKind::Server {
				label: "Zabbix Server".into(),
			},
		};
		let view = TooltipView::at_pointer(100.0, 200.0, &server);
		assert_eq!((view.left, view.top), (105.0, 205.0));
		assert_eq!(view.content.title(), "Zabbix Server");
		assert_eq!(view.content.header_class(), "tooltip-header server");
	}
}
