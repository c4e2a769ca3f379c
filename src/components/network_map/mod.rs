mod actions;
mod component;
pub mod config;
mod layout;
mod layout_panel;
mod render;
mod state;
mod storage;
mod tooltip;
mod types;

pub use component::NetworkMapCanvas;
pub use types::{ProxyDescriptor, StatusCategory, parse_proxy_data};
